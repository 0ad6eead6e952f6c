//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno del servidor, la conexión
//! al API de contenidos y el cache.

pub mod environment;

pub use environment::*;
