//! Sistema de manejo de errores
//!
//! Este módulo define los errores del cache de contenidos y su conversión
//! a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::{EntityId, EntityKind};

/// Errores del cache y de la resolución de páginas
///
/// Es `Clone` porque un mismo fallo se entrega a todos los que esperan
/// una petición compartida.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transport error loading {kind} (parent {parent_id:?}): {message}")]
    Transport {
        kind: EntityKind,
        parent_id: Option<EntityId>,
        message: String,
    },
}

impl ContentError {
    pub fn transport(kind: EntityKind, parent_id: Option<EntityId>, message: impl Into<String>) -> Self {
        ContentError::Transport {
            kind,
            parent_id,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound(_))
    }
}

/// Resultado tipado para operaciones del cache
pub type ContentResult<T> = Result<T, ContentError>;

/// Errores principales de la aplicación HTTP
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::NotFound(slug) => AppError::NotFound(format!("No existe la página '{}'", slug)),
            transport @ ContentError::Transport { .. } => AppError::ExternalApi(transport.to_string()),
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::ExternalApi(msg) => {
                error!("External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "External API Error".to_string(),
                        message: "An error occurred while communicating with the content API".to_string(),
                        details: Some(json!({ "external_api_error": msg })),
                        code: Some("TRANSPORT_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para handlers HTTP
pub type AppResult<T> = Result<T, AppError>;
