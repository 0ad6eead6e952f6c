//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Todas las vistas comparten un único cache.

use std::sync::Arc;

use anyhow::Result;

use crate::cache::ContentCache;
use crate::clients::{ContentApiClient, ContentSource};
use crate::config::environment::EnvironmentConfig;
use crate::services::HierarchyLoader;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub cache: Arc<ContentCache>,
    pub loader: HierarchyLoader,
}

impl AppState {
    /// Crear el estado con el cliente REST configurado
    pub fn new(config: EnvironmentConfig) -> Result<Self> {
        let client = ContentApiClient::new(
            config.content_api_url.clone(),
            config.empresa_id,
            config.http_timeout,
        )?;
        Ok(Self::with_source(config, Arc::new(client)))
    }

    /// Crear el estado sobre cualquier fuente de contenidos
    pub fn with_source(config: EnvironmentConfig, source: Arc<dyn ContentSource>) -> Self {
        let cache = Arc::new(ContentCache::new(source, config.cache.clone()));
        let loader = HierarchyLoader::new(Arc::clone(&cache));
        Self { config, cache, loader }
    }
}
