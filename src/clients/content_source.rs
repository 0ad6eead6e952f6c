//! Fuente de contenidos
//!
//! Interfaz que el cache consume para traer entidades del API REST.
//! Un 404 para un padre concreto se devuelve como lista vacía; los fallos
//! de red o 5xx se devuelven como `ContentError::Transport`.

use async_trait::async_trait;

use crate::models::{Apartado, Categoria, Contenido, EntityId, Seccion};
use crate::utils::errors::ContentResult;

#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_apartados(&self) -> ContentResult<Vec<Apartado>>;

    async fn fetch_categorias(&self, apartado_id: EntityId) -> ContentResult<Vec<Categoria>>;

    async fn fetch_secciones(&self, categoria_id: EntityId) -> ContentResult<Vec<Seccion>>;

    async fn fetch_contenidos(&self, seccion_id: EntityId) -> ContentResult<Vec<Contenido>>;
}
