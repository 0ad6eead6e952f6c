//! Cache compartido de contenidos
//!
//! Une el almacén de entidades con los caches de hijos por padre y con la
//! fuente REST. Garantiza:
//! - una sola petición en vuelo por `(tipo, padre)`: quien llega mientras
//!   otra carga está en curso espera esa misma carga;
//! - mezcla aditiva: cargar los hijos de un padre no toca los de otro;
//! - si una carga falla, el estado anterior se conserva.
//! - una carga que termina después de un olvido, una invalidación o un
//!   `clear()` de su clave se descarta en vez de resucitar lo borrado.
//!
//! Cada mezcla se hace dentro de una única sección de escritura sin `.await`.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use super::children_cache::ChildrenCache;
use super::entity_store::{EntityStore, StoredEntity};
use super::CacheConfig;
use crate::clients::ContentSource;
use crate::models::{Apartado, Categoria, ChildEntity, Contenido, EntityId, EntityKind, Seccion};
use crate::utils::errors::{ContentError, ContentResult};

/// Estado mutable del cache. Solo se escribe bajo el `RwLock` de `ContentCache`.
#[derive(Debug, Default)]
pub struct CacheState {
    pub store: EntityStore,
    pub categorias: ChildrenCache<Categoria>,
    pub secciones: ChildrenCache<Seccion>,
    pub contenidos: ChildrenCache<Contenido>,
    apartados_cargados_en: Option<DateTime<Utc>>,
    // Época por clave de carga: sube con cada mutación, olvido o invalidación
    epochs: HashMap<LoadKey, u64>,
    // Sube con cada `clear()`
    resets: u64,
}

/// Época observada por una carga antes de pedir datos a la fuente
type LoadEpoch = (u64, u64);

impl CacheState {
    pub fn apartados_loaded(&self) -> bool {
        self.apartados_cargados_en.is_some()
    }

    fn apartados_fresh(&self, ttl: Option<chrono::Duration>, now: DateTime<Utc>) -> bool {
        match (self.apartados_cargados_en, ttl) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(loaded), Some(ttl)) => now.signed_duration_since(loaded) <= ttl,
        }
    }

    fn epoch(&self, key: LoadKey) -> LoadEpoch {
        (self.resets, self.epochs.get(&key).copied().unwrap_or(0))
    }

    /// Descarta cualquier respuesta en vuelo para esa clave
    fn bump(&mut self, key: LoadKey) {
        *self.epochs.entry(key).or_insert(0) += 1;
    }

    /// Sube la época de la lista que contiene al hijo `id`, si se conoce
    fn bump_owner<T: CachedChild>(&mut self, id: EntityId) {
        let owner = self
            .store
            .get::<T>(id)
            .map(|item| item.parent_id())
            .or_else(|| T::slice(self).parent_of(id));
        if let Some(parent_id) = owner {
            self.bump(LoadKey::Children(T::KIND, parent_id));
        }
    }

    fn clear(&mut self) {
        self.store.clear();
        self.categorias.clear();
        self.secciones.clear();
        self.contenidos.clear();
        self.apartados_cargados_en = None;
        self.epochs.clear();
        self.resets += 1;
    }
}

/// Operaciones de mezcla y olvido por tipo de entidad
pub trait CachedEntity: StoredEntity {
    /// Aplica una entidad guardada con éxito en el API
    fn remember(state: &mut CacheState, item: Self);

    /// Olvida la entidad y, en cascada, los hijos que colgaban de ella
    fn forget(state: &mut CacheState, id: EntityId);
}

/// Entidad hija con su propio cache por padre y su llamada REST
pub trait CachedChild: CachedEntity + ChildEntity {
    fn slice(state: &CacheState) -> &ChildrenCache<Self>;

    fn slice_mut(state: &mut CacheState) -> &mut ChildrenCache<Self>;

    fn fetch(source: &dyn ContentSource, parent_id: EntityId) -> BoxFuture<'_, ContentResult<Vec<Self>>>;
}

impl CachedEntity for Apartado {
    fn remember(state: &mut CacheState, item: Self) {
        state.bump(LoadKey::Apartados);
        state.store.upsert_one(item);
    }

    fn forget(state: &mut CacheState, id: EntityId) {
        state.bump(LoadKey::Apartados);
        state.bump(LoadKey::Children(EntityKind::Categoria, id));
        state.store.remove::<Apartado>(id);
        for categoria in state.categorias.invalidate(id).unwrap_or_default() {
            Categoria::forget(state, categoria.id);
        }
    }
}

/// Alta o edición de un hijo: invalida las cargas en vuelo del padre
/// anterior y del nuevo antes de escribir.
fn remember_child<T: CachedChild>(state: &mut CacheState, item: T) {
    state.bump_owner::<T>(item.id());
    state.bump(LoadKey::Children(T::KIND, item.parent_id()));
    T::slice_mut(state).upsert_child(item.clone());
    state.store.upsert_one(item);
}

/// Baja de un hijo en el almacén y en la lista de su padre
fn forget_child<T: CachedChild>(state: &mut CacheState, id: EntityId) {
    state.bump_owner::<T>(id);
    state.store.remove::<T>(id);
    T::slice_mut(state).remove_child(id);
}

impl CachedEntity for Categoria {
    fn remember(state: &mut CacheState, item: Self) {
        remember_child(state, item);
    }

    fn forget(state: &mut CacheState, id: EntityId) {
        forget_child::<Categoria>(state, id);
        state.bump(LoadKey::Children(EntityKind::Seccion, id));
        for seccion in state.secciones.invalidate(id).unwrap_or_default() {
            Seccion::forget(state, seccion.id);
        }
    }
}

impl CachedEntity for Seccion {
    fn remember(state: &mut CacheState, item: Self) {
        remember_child(state, item);
    }

    fn forget(state: &mut CacheState, id: EntityId) {
        forget_child::<Seccion>(state, id);
        state.bump(LoadKey::Children(EntityKind::Contenido, id));
        for contenido in state.contenidos.invalidate(id).unwrap_or_default() {
            Contenido::forget(state, contenido.id);
        }
    }
}

impl CachedEntity for Contenido {
    fn remember(state: &mut CacheState, item: Self) {
        remember_child(state, item);
    }

    fn forget(state: &mut CacheState, id: EntityId) {
        forget_child::<Contenido>(state, id);
    }
}

impl CachedChild for Categoria {
    fn slice(state: &CacheState) -> &ChildrenCache<Self> {
        &state.categorias
    }

    fn slice_mut(state: &mut CacheState) -> &mut ChildrenCache<Self> {
        &mut state.categorias
    }

    fn fetch(source: &dyn ContentSource, parent_id: EntityId) -> BoxFuture<'_, ContentResult<Vec<Self>>> {
        source.fetch_categorias(parent_id)
    }
}

impl CachedChild for Seccion {
    fn slice(state: &CacheState) -> &ChildrenCache<Self> {
        &state.secciones
    }

    fn slice_mut(state: &mut CacheState) -> &mut ChildrenCache<Self> {
        &mut state.secciones
    }

    fn fetch(source: &dyn ContentSource, parent_id: EntityId) -> BoxFuture<'_, ContentResult<Vec<Self>>> {
        source.fetch_secciones(parent_id)
    }
}

impl CachedChild for Contenido {
    fn slice(state: &CacheState) -> &ChildrenCache<Self> {
        &state.contenidos
    }

    fn slice_mut(state: &mut CacheState) -> &mut ChildrenCache<Self> {
        &mut state.contenidos
    }

    fn fetch(source: &dyn ContentSource, parent_id: EntityId) -> BoxFuture<'_, ContentResult<Vec<Self>>> {
        source.fetch_contenidos(parent_id)
    }
}

/// Reemplaza el conjunto de apartados. Los que desaparecieron del API se
/// olvidan en cascada para que no sigan resolviendo slugs.
fn merge_apartados(state: &mut CacheState, apartados: Vec<Apartado>, now: DateTime<Utc>) {
    let fresh_ids: HashSet<EntityId> = apartados.iter().map(|apartado| apartado.id).collect();
    let gone: Vec<EntityId> = state
        .store
        .all::<Apartado>()
        .iter()
        .map(|apartado| apartado.id)
        .filter(|id| !fresh_ids.contains(id))
        .collect();
    for id in &gone {
        Apartado::forget(state, *id);
    }

    let added = state.store.upsert_many(apartados);
    state.apartados_cargados_en = Some(now);
    info!(
        "✅ Apartados mezclados ({} nuevos, {} retirados, {} en cache)",
        added,
        gone.len(),
        state.store.len::<Apartado>()
    );
}

/// Reemplaza la lista de un padre y sincroniza el almacén.
/// Los hijos que desaparecieron de la respuesta se olvidan, salvo que ya
/// figuren bajo otro padre.
fn merge_children<T: CachedChild>(state: &mut CacheState, parent_id: EntityId, items: Vec<T>, now: DateTime<Utc>) {
    let previous = T::slice_mut(state).replace(parent_id, items, now);
    let fresh: Vec<T> = T::slice(state).get(parent_id).map(<[T]>::to_vec).unwrap_or_default();
    let fresh_ids: HashSet<EntityId> = fresh.iter().map(|item| item.id()).collect();

    for gone in previous.iter().filter(|item| !fresh_ids.contains(&item.id())) {
        let still_here = state
            .store
            .get::<T>(gone.id())
            .map(|stored| stored.parent_id() == parent_id)
            .unwrap_or(false);
        if still_here {
            T::forget(state, gone.id());
        }
    }

    let added = state.store.upsert_many(fresh);
    debug!(
        "💾 {} del padre {} mezclados ({} nuevos, {} en cache)",
        T::KIND,
        parent_id,
        added,
        state.store.len::<T>()
    );
}

/// Clave de una carga en vuelo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LoadKey {
    Apartados,
    Children(EntityKind, EntityId),
}

impl LoadKey {
    fn transport_error(&self, message: impl Into<String>) -> ContentError {
        match *self {
            LoadKey::Apartados => ContentError::transport(EntityKind::Apartado, None, message),
            LoadKey::Children(kind, parent_id) => ContentError::transport(kind, Some(parent_id), message),
        }
    }
}

type SharedLoad = Shared<BoxFuture<'static, ContentResult<()>>>;

/// Contadores internos del cache
#[derive(Debug, Default)]
struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
    joined: AtomicU64,
    errors: AtomicU64,
}

/// Estadísticas del cache
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub fetches: u64,
    pub joined_in_flight: u64,
    pub fetch_errors: u64,
    pub in_flight: usize,
    pub apartados: usize,
    pub categorias: usize,
    pub secciones: usize,
    pub contenidos: usize,
    pub parents_cached: usize,
}

/// Cache de contenidos compartido por todas las vistas del portal
#[derive(Clone)]
pub struct ContentCache {
    source: Arc<dyn ContentSource>,
    state: Arc<RwLock<CacheState>>,
    in_flight: Arc<Mutex<HashMap<LoadKey, SharedLoad>>>,
    counters: Arc<CacheCounters>,
    config: CacheConfig,
}

impl ContentCache {
    pub fn new(source: Arc<dyn ContentSource>, config: CacheConfig) -> Self {
        Self {
            source,
            state: Arc::new(RwLock::new(CacheState::default())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            counters: Arc::new(CacheCounters::default()),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Proyección de solo lectura sobre el estado actual
    pub async fn read<R>(&self, f: impl FnOnce(&CacheState) -> R) -> R {
        let state = self.state.read().await;
        f(&state)
    }

    /// Trae los apartados del API y reemplaza el conjunto en cache: los que
    /// ya no vienen se olvidan junto con su subárbol
    pub async fn load_apartados(&self) -> ContentResult<Vec<Apartado>> {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let counters = Arc::clone(&self.counters);

        let load = async move {
            let epoch = state.read().await.epoch(LoadKey::Apartados);
            counters.fetches.fetch_add(1, Ordering::Relaxed);
            info!("🌐 Cargando apartados");
            match source.fetch_apartados().await {
                Ok(apartados) => {
                    let mut state = state.write().await;
                    if state.epoch(LoadKey::Apartados) != epoch {
                        debug!("⏭️ Apartados descartados: el cache cambió durante la carga");
                        return Ok(());
                    }
                    merge_apartados(&mut state, apartados, Utc::now());
                    Ok(())
                }
                Err(e) => {
                    counters.errors.fetch_add(1, Ordering::Relaxed);
                    error!("❌ Error cargando apartados: {}", e);
                    Err(e)
                }
            }
        }
        .boxed();

        self.run_load(LoadKey::Apartados, load).await?;
        Ok(self.read(|state| state.store.all::<Apartado>().to_vec()).await)
    }

    /// Devuelve los apartados en cache si están vigentes; si no, los carga
    pub async fn ensure_apartados(&self) -> ContentResult<Vec<Apartado>> {
        let ttl = self.config.ttl();
        let cached = self
            .read(|state| {
                state
                    .apartados_fresh(ttl, Utc::now())
                    .then(|| state.store.all::<Apartado>().to_vec())
            })
            .await;

        match cached {
            Some(apartados) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                debug!("📥 Cache HIT para apartados");
                Ok(apartados)
            }
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                debug!("❌ Cache MISS para apartados");
                self.load_apartados().await
            }
        }
    }

    /// Trae los hijos de un padre. Si ya hay una carga en vuelo para ese
    /// padre, espera esa misma en lugar de pedir otra.
    pub async fn load_children<T: CachedChild>(&self, parent_id: EntityId) -> ContentResult<Vec<T>> {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let counters = Arc::clone(&self.counters);

        let key = LoadKey::Children(T::KIND, parent_id);

        let load = async move {
            let epoch = state.read().await.epoch(key);
            counters.fetches.fetch_add(1, Ordering::Relaxed);
            info!("🌐 Cargando {} del padre {}", T::KIND, parent_id);
            match T::fetch(source.as_ref(), parent_id).await {
                Ok(items) => {
                    let mut state = state.write().await;
                    if state.epoch(key) != epoch {
                        debug!(
                            "⏭️ {} del padre {} descartados: el cache cambió durante la carga",
                            T::KIND,
                            parent_id
                        );
                        return Ok(());
                    }
                    merge_children::<T>(&mut state, parent_id, items, Utc::now());
                    Ok(())
                }
                Err(e) => {
                    counters.errors.fetch_add(1, Ordering::Relaxed);
                    error!("❌ Error cargando {} del padre {}: {}", T::KIND, parent_id, e);
                    Err(e)
                }
            }
        }
        .boxed();

        self.run_load(key, load).await?;
        Ok(self.cached_children::<T>(parent_id).await.unwrap_or_default())
    }

    /// Devuelve los hijos en cache si están vigentes; si no, los carga
    pub async fn ensure_children<T: CachedChild>(&self, parent_id: EntityId) -> ContentResult<Vec<T>> {
        let ttl = self.config.ttl();
        let cached = self
            .read(|state| {
                let slice = T::slice(state);
                slice
                    .is_fresh(parent_id, ttl, Utc::now())
                    .then(|| slice.get(parent_id).map(<[T]>::to_vec).unwrap_or_default())
            })
            .await;

        match cached {
            Some(items) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                debug!("📥 Cache HIT para {} del padre {}", T::KIND, parent_id);
                Ok(items)
            }
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                debug!("❌ Cache MISS para {} del padre {}", T::KIND, parent_id);
                self.load_children::<T>(parent_id).await
            }
        }
    }

    /// Hijos en cache de un padre, sin tocar la red
    pub async fn cached_children<T: CachedChild>(&self, parent_id: EntityId) -> Option<Vec<T>> {
        self.read(|state| T::slice(state).get(parent_id).map(<[T]>::to_vec)).await
    }

    /// Aplica la respuesta de un alta o edición exitosa
    pub async fn record_saved<T: CachedEntity>(&self, item: T) {
        let id = item.id();
        let mut state = self.state.write().await;
        T::remember(&mut state, item);
        debug!("💾 {} {} actualizado tras mutación", T::KIND, id);
    }

    /// Aplica la respuesta de un borrado exitoso
    pub async fn record_deleted<T: CachedEntity>(&self, id: EntityId) {
        let mut state = self.state.write().await;
        T::forget(&mut state, id);
        debug!("🗑️ {} {} eliminado del cache", T::KIND, id);
    }

    /// Olvida la lista de un padre para que la próxima lectura la recargue
    pub async fn invalidate_parent<T: CachedChild>(&self, parent_id: EntityId) -> bool {
        let mut state = self.state.write().await;
        state.bump(LoadKey::Children(T::KIND, parent_id));
        T::slice_mut(&mut state).invalidate(parent_id).is_some()
    }

    /// Limpiar todo el cache
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.clear();
        info!("🧹 Cache de contenidos limpiado completamente");
    }

    pub async fn stats(&self) -> CacheStats {
        let in_flight = self.in_flight.lock().await.len();
        let state = self.state.read().await;
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            fetches: self.counters.fetches.load(Ordering::Relaxed),
            joined_in_flight: self.counters.joined.load(Ordering::Relaxed),
            fetch_errors: self.counters.errors.load(Ordering::Relaxed),
            in_flight,
            apartados: state.store.len::<Apartado>(),
            categorias: state.store.len::<Categoria>(),
            secciones: state.store.len::<Seccion>(),
            contenidos: state.store.len::<Contenido>(),
            parents_cached: state.categorias.parent_count()
                + state.secciones.parent_count()
                + state.contenidos.parent_count(),
        }
    }

    /// Ejecuta la carga o se une a la que ya está en vuelo con la misma clave
    async fn run_load(&self, key: LoadKey, load: BoxFuture<'static, ContentResult<()>>) -> ContentResult<()> {
        let shared = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(&key) {
                Some(existing) => {
                    self.counters.joined.fetch_add(1, Ordering::Relaxed);
                    debug!("⏳ Carga {:?} ya en vuelo, esperando la existente", key);
                    existing.clone()
                }
                None => {
                    // La carga corre en su propia tarea: si todos los que esperan
                    // se cancelan, termina igual y sale del registro
                    let registry = Arc::clone(&self.in_flight);
                    let task = tokio::spawn(async move {
                        let result = load.await;
                        registry.lock().await.remove(&key);
                        result
                    });
                    let shared = async move {
                        match task.await {
                            Ok(result) => result,
                            Err(e) => {
                                error!("❌ La carga {:?} terminó de forma anómala: {}", key, e);
                                Err(key.transport_error(e.to_string()))
                            }
                        }
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(key, shared.clone());
                    shared
                }
            }
        };

        shared.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Fuente mínima: categorias por apartado, con retardo y fallos opcionales
    #[derive(Default)]
    struct FakeSource {
        categorias: std::sync::Mutex<HashMap<EntityId, Vec<Categoria>>>,
        failing: std::sync::Mutex<HashSet<EntityId>>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn set(&self, parent: EntityId, items: Vec<Categoria>) {
            self.categorias.lock().unwrap().insert(parent, items);
        }

        fn fail(&self, parent: EntityId, failing: bool) {
            let mut set = self.failing.lock().unwrap();
            if failing {
                set.insert(parent);
            } else {
                set.remove(&parent);
            }
        }
    }

    #[async_trait]
    impl ContentSource for FakeSource {
        async fn fetch_apartados(&self) -> ContentResult<Vec<Apartado>> {
            Ok(vec![Apartado::new(1, "blog", "T1")])
        }

        async fn fetch_categorias(&self, apartado_id: EntityId) -> ContentResult<Vec<Categoria>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if self.failing.lock().unwrap().contains(&apartado_id) {
                return Err(ContentError::transport(EntityKind::Categoria, Some(apartado_id), "HTTP 503"));
            }
            Ok(self.categorias.lock().unwrap().get(&apartado_id).cloned().unwrap_or_default())
        }

        async fn fetch_secciones(&self, _categoria_id: EntityId) -> ContentResult<Vec<Seccion>> {
            Ok(Vec::new())
        }

        async fn fetch_contenidos(&self, _seccion_id: EntityId) -> ContentResult<Vec<Contenido>> {
            Ok(Vec::new())
        }
    }

    fn cache_with(source: Arc<FakeSource>) -> ContentCache {
        ContentCache::new(source, CacheConfig::without_expiry())
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let source = Arc::new(FakeSource::default());
        source.set(1, vec![Categoria::new(10, 1, "a")]);
        let cache = cache_with(source.clone());

        let (first, second) = tokio::join!(
            cache.load_children::<Categoria>(1),
            cache.load_children::<Categoria>(1)
        );

        assert_eq!(first.unwrap().len(), 1);
        assert_eq!(second.unwrap().len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().await.joined_in_flight, 1);
        assert_eq!(cache.stats().await.in_flight, 0);
    }

    #[tokio::test]
    async fn test_cancelled_waiter_does_not_leak_in_flight_entry() {
        let source = Arc::new(FakeSource::default());
        source.set(1, vec![Categoria::new(10, 1, "a")]);
        let cache = cache_with(source.clone());

        let waited = tokio::time::timeout(Duration::from_millis(5), cache.load_children::<Categoria>(1)).await;
        assert!(waited.is_err());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.stats().await.in_flight, 0);
        assert_eq!(cache.cached_children::<Categoria>(1).await.unwrap().len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_slice() {
        let source = Arc::new(FakeSource::default());
        source.set(1, vec![Categoria::new(10, 1, "a")]);
        let cache = cache_with(source.clone());
        cache.load_children::<Categoria>(1).await.unwrap();

        source.fail(1, true);
        let err = cache.load_children::<Categoria>(1).await.unwrap_err();

        assert!(matches!(err, ContentError::Transport { .. }));
        assert_eq!(cache.cached_children::<Categoria>(1).await.unwrap().len(), 1);
        assert_eq!(cache.stats().await.fetch_errors, 1);
    }

    #[tokio::test]
    async fn test_refresh_forgets_vanished_children_and_their_subtree() {
        let source = Arc::new(FakeSource::default());
        source.set(1, vec![Categoria::new(10, 1, "a"), Categoria::new(11, 1, "b")]);
        let cache = cache_with(source.clone());
        cache.load_children::<Categoria>(1).await.unwrap();
        cache.record_saved(Seccion::new(100, 11, "s")).await;

        source.set(1, vec![Categoria::new(10, 1, "a")]);
        cache.load_children::<Categoria>(1).await.unwrap();

        let (categorias, has_11) = cache
            .read(|state| (state.store.len::<Categoria>(), state.store.contains::<Categoria>(11)))
            .await;
        assert_eq!(categorias, 1);
        assert!(!has_11);
    }

    #[tokio::test]
    async fn test_ensure_children_hits_cache_after_first_load() {
        let source = Arc::new(FakeSource::default());
        source.set(1, vec![Categoria::new(10, 1, "a")]);
        let cache = cache_with(source.clone());

        cache.ensure_children::<Categoria>(1).await.unwrap();
        cache.ensure_children::<Categoria>(1).await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_invalidate_parent_forces_refetch() {
        let source = Arc::new(FakeSource::default());
        source.set(1, vec![Categoria::new(10, 1, "a")]);
        let cache = cache_with(source.clone());

        cache.ensure_children::<Categoria>(1).await.unwrap();
        assert!(cache.invalidate_parent::<Categoria>(1).await);
        cache.ensure_children::<Categoria>(1).await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_record_deleted_apartado_cascades() {
        let source = Arc::new(FakeSource::default());
        source.set(1, vec![Categoria::new(10, 1, "a")]);
        let cache = cache_with(source.clone());
        cache.ensure_apartados().await.unwrap();
        cache.ensure_children::<Categoria>(1).await.unwrap();

        cache.record_deleted::<Apartado>(1).await;

        let (apartados, categorias, loaded) = cache
            .read(|state| {
                (
                    state.store.len::<Apartado>(),
                    state.store.len::<Categoria>(),
                    state.categorias.is_loaded(1),
                )
            })
            .await;
        assert_eq!((apartados, categorias, loaded), (0, 0, false));
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let source = Arc::new(FakeSource::default());
        let cache = cache_with(source);
        cache.ensure_apartados().await.unwrap();
        cache.clear().await;
        assert!(!cache.read(|state| state.apartados_loaded()).await);
        assert_eq!(cache.stats().await.apartados, 0);
    }
}
