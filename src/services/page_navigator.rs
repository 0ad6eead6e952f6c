//! Navegación con estado visible
//!
//! Cada navegación recibe un número de generación. Solo la última puede
//! publicar estados en el canal visible: una navegación superada sigue
//! mezclando sus resultados en el cache, pero nunca devuelve la vista a una
//! página anterior.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::hierarchy_loader::{FullyResolvedPage, HierarchyLoader, PageStatus};
use super::slug_resolver::normalize_slug;
use crate::utils::errors::ContentError;

/// Estado visible de la sesión
#[derive(Debug, Clone)]
pub struct PageState {
    pub slug: Option<String>,
    pub generation: u64,
    pub status: PageStatus,
    pub page: Option<Arc<FullyResolvedPage>>,
    pub error: Option<ContentError>,
}

impl PageState {
    fn idle() -> Self {
        Self {
            slug: None,
            generation: 0,
            status: PageStatus::Idle,
            page: None,
            error: None,
        }
    }

    pub fn to_result(&self) -> ResolveResult {
        ResolveResult {
            status: self.status,
            data: self.page.clone(),
            error: self.error.clone(),
        }
    }
}

/// Lo que ve quien pidió resolver un slug
#[derive(Debug, Clone)]
pub struct ResolveResult {
    pub status: PageStatus,
    pub data: Option<Arc<FullyResolvedPage>>,
    pub error: Option<ContentError>,
}

/// Resultado de una navegación concreta
#[derive(Debug, Clone)]
pub enum NavigationOutcome {
    /// La navegación seguía vigente y su estado final es el visible
    Applied(ResolveResult),
    /// Otra navegación empezó después; su resultado no se publicó
    Superseded,
}

/// Sesión de navegación compartida por todas las vistas de un visitante
pub struct PageNavigator {
    loader: HierarchyLoader,
    generation: AtomicU64,
    state_tx: watch::Sender<PageState>,
}

impl PageNavigator {
    pub fn new(loader: HierarchyLoader) -> Self {
        let (state_tx, _) = watch::channel(PageState::idle());
        Self {
            loader,
            generation: AtomicU64::new(0),
            state_tx,
        }
    }

    /// Receptor del estado visible para cualquier vista interesada
    pub fn subscribe(&self) -> watch::Receiver<PageState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> PageState {
        self.state_tx.borrow().clone()
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Resolver un slug. Si esta navegación fue superada mientras cargaba,
    /// devuelve el estado visible actual, que pertenece a la más reciente.
    pub async fn resolve(&self, slug: Option<&str>) -> ResolveResult {
        match self.navigate(slug).await {
            NavigationOutcome::Applied(result) => result,
            NavigationOutcome::Superseded => self.state().to_result(),
        }
    }

    /// Ejecuta una navegación completa
    /// RESOLVING → LOADING_CHILDREN → LOADING_GRANDCHILDREN → READY,
    /// o NOT_FOUND / ERROR.
    pub async fn navigate(&self, slug: Option<&str>) -> NavigationOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let slug = normalize_slug(slug);
        info!("🧭 Navegación #{} hacia {:?}", generation, slug);

        self.publish(PageState {
            slug: slug.clone(),
            generation,
            status: PageStatus::Resolving,
            page: None,
            error: None,
        });

        let result = self
            .loader
            .load_page(slug.as_deref(), |status| {
                if status != PageStatus::Resolving {
                    self.publish_status(generation, status);
                }
            })
            .await;

        let final_state = match result {
            Ok(page) => PageState {
                slug: slug.clone(),
                generation,
                status: PageStatus::Ready,
                page: Some(Arc::new(page)),
                error: None,
            },
            Err(e) => PageState {
                slug: slug.clone(),
                generation,
                status: if e.is_not_found() { PageStatus::NotFound } else { PageStatus::Error },
                page: None,
                error: Some(e),
            },
        };

        let result = final_state.to_result();
        if self.publish(final_state) {
            NavigationOutcome::Applied(result)
        } else {
            warn!("⏭️ Navegación #{} hacia {:?} superada, no se publica", generation, slug);
            NavigationOutcome::Superseded
        }
    }

    /// Publica un estado completo si su generación sigue siendo la última
    fn publish(&self, next: PageState) -> bool {
        let mut next = Some(next);
        self.state_tx.send_if_modified(|state| {
            let Some(candidate) = next.take() else {
                return false;
            };
            if candidate.generation != self.current_generation() {
                return false;
            }
            debug!("📣 Estado visible #{}: {:?}", candidate.generation, candidate.status);
            *state = candidate;
            true
        })
    }

    /// Avanza el estado de la navegación vigente sin tocar slug ni datos
    fn publish_status(&self, generation: u64, status: PageStatus) -> bool {
        self.state_tx.send_if_modified(|state| {
            if generation != self.current_generation() || state.generation != generation {
                return false;
            }
            debug!("📣 Estado visible #{}: {:?}", generation, status);
            state.status = status;
            true
        })
    }
}
