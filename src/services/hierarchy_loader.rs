//! Carga jerárquica de páginas
//!
//! Orquesta, para un slug: resolver el apartado, cargar sus categorias y
//! abrir en paralelo la carga de secciones (por categoria) y contenidos
//! (por seccion). La página solo se entrega cuando todas las ramas
//! terminaron, con éxito o degradadas a lista vacía.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::slug_resolver::{normalize_slug, resolve_slug};
use crate::cache::ContentCache;
use crate::models::{Apartado, Categoria, Contenido, EntityId, EntityKind, Seccion};
use crate::utils::errors::{ContentError, ContentResult};

/// Estados de una navegación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageStatus {
    /// Todavía no hubo ninguna navegación
    Idle,
    Resolving,
    LoadingChildren,
    LoadingGrandchildren,
    Ready,
    NotFound,
    Error,
}

impl PageStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PageStatus::Ready | PageStatus::NotFound | PageStatus::Error)
    }
}

/// Rama que no se pudo cargar y se entrega vacía
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Degradation {
    pub kind: EntityKind,
    pub parent_id: EntityId,
    pub message: String,
}

/// Subárbol completo de un apartado
#[derive(Debug, Clone, Serialize)]
pub struct FullyResolvedPage {
    pub apartado: Apartado,
    pub categorias: Vec<Categoria>,
    pub secciones_por_categoria: HashMap<EntityId, Vec<Seccion>>,
    pub contenidos_por_seccion: HashMap<EntityId, Vec<Contenido>>,
    pub degradaciones: Vec<Degradation>,
}

impl FullyResolvedPage {
    pub fn secciones_de(&self, categoria_id: EntityId) -> &[Seccion] {
        self.secciones_por_categoria
            .get(&categoria_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contenidos_de(&self, seccion_id: EntityId) -> &[Contenido] {
        self.contenidos_por_seccion
            .get(&seccion_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_degraded(&self) -> bool {
        !self.degradaciones.is_empty()
    }
}

/// Resultado de cargar una categoria con todo lo que cuelga de ella
struct Rama {
    categoria_id: EntityId,
    secciones: Vec<Seccion>,
    contenidos: Vec<(EntityId, Vec<Contenido>)>,
    degradaciones: Vec<Degradation>,
}

/// Cargador sin estado propio: cada llamada es una navegación independiente
#[derive(Clone)]
pub struct HierarchyLoader {
    cache: Arc<ContentCache>,
}

impl HierarchyLoader {
    pub fn new(cache: Arc<ContentCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    /// Carga la página de un slug, notificando cada transición de estado.
    /// `NotFound` y los fallos de transporte de apartados o categorias
    /// abortan la carga; los de secciones y contenidos se degradan.
    pub async fn load_page<F>(&self, slug: Option<&str>, mut on_status: F) -> ContentResult<FullyResolvedPage>
    where
        F: FnMut(PageStatus),
    {
        let slug = normalize_slug(slug);
        on_status(PageStatus::Resolving);

        let apartados = self.cache.ensure_apartados().await?;
        let apartado = resolve_slug(slug.as_deref(), &apartados)
            .map(|resolution| resolution.apartado.clone())
            .ok_or_else(|| ContentError::NotFound(slug.clone().unwrap_or_else(|| "inicio".to_string())))?;
        info!("📄 Slug {:?} resuelto -> apartado {} ({})", slug, apartado.id, apartado.nombre);

        on_status(PageStatus::LoadingChildren);
        let categorias = self.cache.ensure_children::<Categoria>(apartado.id).await?;

        on_status(PageStatus::LoadingGrandchildren);
        let ramas = join_all(categorias.iter().map(|categoria| self.load_rama(categoria.id))).await;

        let mut page = FullyResolvedPage {
            apartado,
            categorias,
            secciones_por_categoria: HashMap::new(),
            contenidos_por_seccion: HashMap::new(),
            degradaciones: Vec::new(),
        };
        for rama in ramas {
            page.secciones_por_categoria.insert(rama.categoria_id, rama.secciones);
            page.contenidos_por_seccion.extend(rama.contenidos);
            page.degradaciones.extend(rama.degradaciones);
        }

        if page.is_degraded() {
            warn!(
                "⚠️ Página '{}' lista con {} ramas degradadas",
                page.apartado.nombre,
                page.degradaciones.len()
            );
        } else {
            info!("✅ Página '{}' lista", page.apartado.nombre);
        }
        Ok(page)
    }

    async fn load_rama(&self, categoria_id: EntityId) -> Rama {
        let mut degradaciones = Vec::new();

        let secciones = match self.cache.ensure_children::<Seccion>(categoria_id).await {
            Ok(secciones) => secciones,
            Err(e) => {
                warn!("⚠️ Secciones de la categoria {} degradadas a vacío: {}", categoria_id, e);
                degradaciones.push(Degradation {
                    kind: EntityKind::Seccion,
                    parent_id: categoria_id,
                    message: e.to_string(),
                });
                Vec::new()
            }
        };

        let resultados = join_all(secciones.iter().map(|seccion| async move {
            (seccion.id, self.cache.ensure_children::<Contenido>(seccion.id).await)
        }))
        .await;

        let mut contenidos = Vec::with_capacity(resultados.len());
        for (seccion_id, resultado) in resultados {
            match resultado {
                Ok(items) => contenidos.push((seccion_id, items)),
                Err(e) => {
                    warn!("⚠️ Contenidos de la seccion {} degradados a vacío: {}", seccion_id, e);
                    degradaciones.push(Degradation {
                        kind: EntityKind::Contenido,
                        parent_id: seccion_id,
                        message: e.to_string(),
                    });
                    contenidos.push((seccion_id, Vec::new()));
                }
            }
        }

        Rama {
            categoria_id,
            secciones,
            contenidos,
            degradaciones,
        }
    }
}
