//! Utilidades del sistema
//!
//! Este módulo contiene el manejo de errores común al cache y a la API.

pub mod errors;

pub use errors::{AppError, AppResult, ContentError, ContentResult};
