//! Cliente HTTP para el API REST de contenidos
//!
//! Implementa `ContentSource` con reqwest. El API puede responder con un
//! arreglo JSON directo o envuelto en `{ "data": [...] }`.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::ContentSource;
use crate::models::{Apartado, Categoria, Contenido, EntityId, EntityKind, Seccion};
use crate::utils::errors::{ContentError, ContentResult};

/// Cliente HTTP del API de contenidos de una empresa
pub struct ContentApiClient {
    client: Client,
    base_url: String,
    empresa_id: Option<Uuid>,
}

/// Respuesta de listado: arreglo directo o sobre `data`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

impl ContentApiClient {
    /// Crear nuevo cliente HTTP con timeout configurable
    pub fn new(base_url: String, empresa_id: Option<Uuid>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            empresa_id,
        })
    }

    pub fn apartados_url(&self) -> String {
        match self.empresa_id {
            Some(empresa_id) => format!("{}/apartados?empresa_id={}", self.base_url, empresa_id),
            None => format!("{}/apartados", self.base_url),
        }
    }

    pub fn children_url(&self, kind: EntityKind, parent_id: EntityId) -> String {
        let (collection, parent) = match kind {
            EntityKind::Categoria => ("categorias", "apartado"),
            EntityKind::Seccion => ("secciones", "categoria"),
            EntityKind::Contenido => ("contenidos", "seccion"),
            EntityKind::Apartado => ("apartados", "empresa"),
        };
        format!("{}/{}/{}/{}", self.base_url, collection, parent, parent_id)
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        url: &str,
        kind: EntityKind,
        parent_id: Option<EntityId>,
    ) -> ContentResult<Vec<T>> {
        debug!("🌐 GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("❌ Error de red cargando {}: {}", kind, e);
                ContentError::transport(kind, parent_id, format!("Error de red: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND && parent_id.is_some() {
            info!("📭 {} sin resultados para el padre {:?} (404)", kind, parent_id);
            return Ok(Vec::new());
        }

        if !status.is_success() {
            error!("❌ {} respondió HTTP {}", url, status);
            return Err(ContentError::transport(kind, parent_id, format!("Error HTTP: {}", status)));
        }

        let envelope: ListEnvelope<T> = response.json().await.map_err(|e| {
            ContentError::transport(kind, parent_id, format!("Error parsing JSON: {}", e))
        })?;

        Ok(envelope.into_items())
    }
}

#[async_trait]
impl ContentSource for ContentApiClient {
    async fn fetch_apartados(&self) -> ContentResult<Vec<Apartado>> {
        let url = self.apartados_url();
        self.get_list(&url, EntityKind::Apartado, None).await
    }

    async fn fetch_categorias(&self, apartado_id: EntityId) -> ContentResult<Vec<Categoria>> {
        let url = self.children_url(EntityKind::Categoria, apartado_id);
        self.get_list(&url, EntityKind::Categoria, Some(apartado_id)).await
    }

    async fn fetch_secciones(&self, categoria_id: EntityId) -> ContentResult<Vec<Seccion>> {
        let url = self.children_url(EntityKind::Seccion, categoria_id);
        self.get_list(&url, EntityKind::Seccion, Some(categoria_id)).await
    }

    async fn fetch_contenidos(&self, seccion_id: EntityId) -> ContentResult<Vec<Contenido>> {
        let url = self.children_url(EntityKind::Contenido, seccion_id);
        self.get_list(&url, EntityKind::Contenido, Some(seccion_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(empresa_id: Option<Uuid>) -> ContentApiClient {
        ContentApiClient::new("http://localhost:8080/api/".to_string(), empresa_id, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_children_urls() {
        let client = client(None);
        assert_eq!(
            client.children_url(EntityKind::Categoria, 4),
            "http://localhost:8080/api/categorias/apartado/4"
        );
        assert_eq!(
            client.children_url(EntityKind::Seccion, 9),
            "http://localhost:8080/api/secciones/categoria/9"
        );
        assert_eq!(
            client.children_url(EntityKind::Contenido, 2),
            "http://localhost:8080/api/contenidos/seccion/2"
        );
    }

    #[test]
    fn test_apartados_url_scoped_by_empresa() {
        let empresa = Uuid::new_v4();
        assert_eq!(client(Some(empresa)).apartados_url(), format!("http://localhost:8080/api/apartados?empresa_id={}", empresa));
        assert_eq!(client(None).apartados_url(), "http://localhost:8080/api/apartados");
    }

    #[test]
    fn test_list_envelope_accepts_both_shapes() {
        let bare: ListEnvelope<Contenido> =
            serde_json::from_str(r#"[{"id": 1, "seccion_id": 2, "titulo": "a"}]"#).unwrap();
        assert_eq!(bare.into_items().len(), 1);

        let wrapped: ListEnvelope<Contenido> =
            serde_json::from_str(r#"{"data": [{"id": 1, "seccion_id": 2}, {"id": 2, "seccion_id": 2}]}"#).unwrap();
        assert_eq!(wrapped.into_items().len(), 2);
    }
}
