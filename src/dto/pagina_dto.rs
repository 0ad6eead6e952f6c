use serde::Serialize;

use crate::cache::CacheStats;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

// Resultado de limpiar el cache
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub before: CacheStats,
    pub after: CacheStats,
}
