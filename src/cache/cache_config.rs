//! Configuración de cache
//!
//! Este módulo contiene la configuración del cache de contenidos.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Configuración del cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Segundos que una lista cargada se considera vigente. 0 = sin expiración.
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600, // 1 hora
        }
    }
}

impl CacheConfig {
    /// Leer `CACHE_TTL_SECONDS`, con el valor por defecto si no existe
    pub fn from_env() -> Result<Self> {
        let ttl_seconds = match env::var("CACHE_TTL_SECONDS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("CACHE_TTL_SECONDS must be a valid number, got '{}'", raw))?,
            Err(_) => Self::default().ttl_seconds,
        };
        Ok(Self { ttl_seconds })
    }

    pub fn without_expiry() -> Self {
        Self { ttl_seconds: 0 }
    }

    pub fn ttl(&self) -> Option<chrono::Duration> {
        if self.ttl_seconds == 0 {
            return None;
        }
        i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
    }
}
