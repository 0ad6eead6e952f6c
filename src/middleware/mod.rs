//! Middleware
//!
//! Capas HTTP compartidas por todas las rutas.

pub mod cors;
