//! Fuente de contenidos en memoria para los tests de integración
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use portal_contenidos::cache::{CacheConfig, ContentCache};
use portal_contenidos::clients::ContentSource;
use portal_contenidos::models::plantilla;
use portal_contenidos::models::{Apartado, Categoria, Contenido, EntityId, EntityKind, Seccion};
use portal_contenidos::services::HierarchyLoader;
use portal_contenidos::utils::errors::{ContentError, ContentResult};

type Key = (EntityKind, Option<EntityId>);

#[derive(Default)]
pub struct MockSource {
    apartados: Mutex<Vec<Apartado>>,
    categorias: Mutex<HashMap<EntityId, Vec<Categoria>>>,
    secciones: Mutex<HashMap<EntityId, Vec<Seccion>>>,
    contenidos: Mutex<HashMap<EntityId, Vec<Contenido>>>,
    delays: Mutex<HashMap<Key, Duration>>,
    failing: Mutex<HashSet<Key>>,
    calls: Mutex<HashMap<Key, usize>>,
}

impl MockSource {
    pub fn set_apartados(&self, items: Vec<Apartado>) {
        *self.apartados.lock().unwrap() = items;
    }

    pub fn set_categorias(&self, apartado_id: EntityId, items: Vec<Categoria>) {
        self.categorias.lock().unwrap().insert(apartado_id, items);
    }

    pub fn set_secciones(&self, categoria_id: EntityId, items: Vec<Seccion>) {
        self.secciones.lock().unwrap().insert(categoria_id, items);
    }

    pub fn set_contenidos(&self, seccion_id: EntityId, items: Vec<Contenido>) {
        self.contenidos.lock().unwrap().insert(seccion_id, items);
    }

    pub fn delay(&self, kind: EntityKind, parent: Option<EntityId>, delay: Duration) {
        self.delays.lock().unwrap().insert((kind, parent), delay);
    }

    pub fn fail(&self, kind: EntityKind, parent: Option<EntityId>) {
        self.failing.lock().unwrap().insert((kind, parent));
    }

    pub fn recover(&self, kind: EntityKind, parent: Option<EntityId>) {
        self.failing.lock().unwrap().remove(&(kind, parent));
    }

    pub fn calls(&self, kind: EntityKind, parent: Option<EntityId>) -> usize {
        self.calls.lock().unwrap().get(&(kind, parent)).copied().unwrap_or(0)
    }

    async fn enter(&self, kind: EntityKind, parent: Option<EntityId>) -> ContentResult<()> {
        let key = (kind, parent);
        *self.calls.lock().unwrap().entry(key).or_insert(0) += 1;

        let delay = self.delays.lock().unwrap().get(&key).copied();
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        if self.failing.lock().unwrap().contains(&key) {
            return Err(ContentError::transport(kind, parent, "HTTP 503 Service Unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentSource for MockSource {
    async fn fetch_apartados(&self) -> ContentResult<Vec<Apartado>> {
        self.enter(EntityKind::Apartado, None).await?;
        Ok(self.apartados.lock().unwrap().clone())
    }

    async fn fetch_categorias(&self, apartado_id: EntityId) -> ContentResult<Vec<Categoria>> {
        self.enter(EntityKind::Categoria, Some(apartado_id)).await?;
        Ok(self.categorias.lock().unwrap().get(&apartado_id).cloned().unwrap_or_default())
    }

    async fn fetch_secciones(&self, categoria_id: EntityId) -> ContentResult<Vec<Seccion>> {
        self.enter(EntityKind::Seccion, Some(categoria_id)).await?;
        Ok(self.secciones.lock().unwrap().get(&categoria_id).cloned().unwrap_or_default())
    }

    async fn fetch_contenidos(&self, seccion_id: EntityId) -> ContentResult<Vec<Contenido>> {
        self.enter(EntityKind::Contenido, Some(seccion_id)).await?;
        Ok(self.contenidos.lock().unwrap().get(&seccion_id).cloned().unwrap_or_default())
    }
}

/// Portal de ejemplo:
/// - apartado 1 "Inicio" (plantilla de inicio) con categoria 10
/// - apartado 2 "Empresa" (plantilla nosotros) con categoria 20
/// - apartado 3 "Blog" con categorias 30 y 31; la 30 tiene secciones 300 y 301
pub fn portal_source() -> Arc<MockSource> {
    let source = Arc::new(MockSource::default());
    source.set_apartados(vec![
        Apartado::new(1, "Inicio", plantilla::INICIO.to_string()),
        Apartado::new(2, "Empresa", plantilla::NOSOTROS.to_string()),
        Apartado::new(3, "Blog", plantilla::BLOG.to_string()),
    ]);
    source.set_categorias(1, vec![Categoria::new(10, 1, "Bienvenida")]);
    source.set_categorias(2, vec![Categoria::new(20, 2, "Historia")]);
    source.set_categorias(
        3,
        vec![Categoria::new(30, 3, "Noticias"), Categoria::new(31, 3, "Eventos")],
    );
    source.set_secciones(
        30,
        vec![
            Seccion::new(300, 30, "Destacadas").with_tipo("cards"),
            Seccion::new(301, 30, "Galería").with_tipo("gallery-grid"),
        ],
    );
    source.set_contenidos(300, vec![Contenido::new(3000, 300, "Lanzamiento")]);
    source.set_contenidos(301, vec![Contenido::new(3010, 301, "Foto")]);
    source
}

pub fn cache_over(source: Arc<MockSource>) -> Arc<ContentCache> {
    Arc::new(ContentCache::new(source, CacheConfig::without_expiry()))
}

pub fn loader_over(source: Arc<MockSource>) -> HierarchyLoader {
    HierarchyLoader::new(cache_over(source))
}
