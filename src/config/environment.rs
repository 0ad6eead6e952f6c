//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{anyhow, Context, Result};
use std::env;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::CacheConfig;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    // API REST de contenidos
    pub content_api_url: String,
    pub empresa_id: Option<Uuid>,
    pub http_timeout: Duration,
    pub cache: CacheConfig,
}

impl EnvironmentConfig {
    /// Leer la configuración del entorno; solo `CONTENT_API_URL` es obligatoria
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: parse_var("PORT", 3000)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
            content_api_url: env::var("CONTENT_API_URL")
                .map_err(|_| anyhow!("CONTENT_API_URL must be set"))?,
            empresa_id: match env::var("EMPRESA_ID") {
                Ok(raw) if !raw.trim().is_empty() => Some(
                    Uuid::parse_str(raw.trim())
                        .with_context(|| format!("EMPRESA_ID must be a valid UUID, got '{}'", raw))?,
                ),
                _ => None,
            },
            http_timeout: Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", 30)?),
            cache: CacheConfig::from_env()?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} must be a valid number, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
