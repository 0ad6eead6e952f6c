//! Cache
//!
//! Este módulo contiene el almacén de entidades, los caches de hijos por
//! padre y el cache compartido que los coordina con el API REST.

pub mod cache_config;
pub mod children_cache;
pub mod content_cache;
pub mod entity_store;

pub use cache_config::CacheConfig;
pub use children_cache::ChildrenCache;
pub use content_cache::{CacheState, CacheStats, CachedChild, CachedEntity, ContentCache};
pub use entity_store::{Collection, EntityStore, StoredEntity};
