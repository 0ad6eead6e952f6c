//! Cache de hijos por padre
//!
//! Guarda, por id de padre, la lista de hijos cargada (categorias por
//! apartado, secciones por categoria, contenidos por seccion). Cargar los
//! hijos de un padre nunca toca los de otro.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::models::{ChildEntity, EntityId};

#[derive(Debug, Clone)]
struct ChildSlice<T> {
    items: Vec<T>,
    cargado_en: DateTime<Utc>,
}

/// Hijos cargados de un tipo, indexados por el id del padre
#[derive(Debug, Clone)]
pub struct ChildrenCache<T> {
    slices: HashMap<EntityId, ChildSlice<T>>,
}

impl<T> Default for ChildrenCache<T> {
    fn default() -> Self {
        Self {
            slices: HashMap::new(),
        }
    }
}

impl<T: ChildEntity> ChildrenCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, parent_id: EntityId) -> Option<&[T]> {
        self.slices.get(&parent_id).map(|slice| slice.items.as_slice())
    }

    pub fn is_loaded(&self, parent_id: EntityId) -> bool {
        self.slices.contains_key(&parent_id)
    }

    /// `ttl = None` significa que las entradas no expiran
    pub fn is_fresh(&self, parent_id: EntityId, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
        match (self.slices.get(&parent_id), ttl) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(slice), Some(ttl)) => now.signed_duration_since(slice.cargado_en) <= ttl,
        }
    }

    /// Reemplaza por completo la lista de este padre y devuelve la anterior.
    /// Los elementos cuyo padre no coincide se descartan.
    pub fn replace(&mut self, parent_id: EntityId, items: Vec<T>, now: DateTime<Utc>) -> Vec<T> {
        let (items, foreign): (Vec<T>, Vec<T>) =
            items.into_iter().partition(|item| item.parent_id() == parent_id);
        if !foreign.is_empty() {
            warn!(
                "⚠️ {} {} recibidos bajo el padre {} pertenecen a otro padre, se descartan",
                foreign.len(),
                T::KIND,
                parent_id
            );
        }

        let previous = self.slices.insert(
            parent_id,
            ChildSlice {
                items: dedup_by_id(items),
                cargado_en: now,
            },
        );
        previous.map(|slice| slice.items).unwrap_or_default()
    }

    /// Inserta o actualiza un hijo tras una mutación. Si cambió de padre se
    /// retira de la lista anterior. Solo se escribe en listas ya cargadas,
    /// para no marcar como cargado un padre con datos parciales.
    pub fn upsert_child(&mut self, item: T) {
        let id = item.id();
        let parent_id = item.parent_id();

        for (owner, slice) in self.slices.iter_mut() {
            if *owner != parent_id {
                slice.items.retain(|existing| existing.id() != id);
            }
        }

        if let Some(slice) = self.slices.get_mut(&parent_id) {
            match slice.items.iter_mut().find(|existing| existing.id() == id) {
                Some(existing) => *existing = item,
                None => slice.items.push(item),
            }
        }
    }

    /// Padre bajo el que está cargado un hijo, si alguno lo tiene
    pub fn parent_of(&self, id: EntityId) -> Option<EntityId> {
        self.slices
            .iter()
            .find(|(_, slice)| slice.items.iter().any(|item| item.id() == id))
            .map(|(parent_id, _)| *parent_id)
    }

    pub fn remove_child(&mut self, id: EntityId) -> bool {
        let mut removed = false;
        for slice in self.slices.values_mut() {
            let before = slice.items.len();
            slice.items.retain(|existing| existing.id() != id);
            removed |= before != slice.items.len();
        }
        removed
    }

    /// Olvida la lista de un padre para forzar una nueva carga
    pub fn invalidate(&mut self, parent_id: EntityId) -> Option<Vec<T>> {
        self.slices.remove(&parent_id).map(|slice| slice.items)
    }

    pub fn parent_count(&self) -> usize {
        self.slices.len()
    }

    pub fn child_count(&self) -> usize {
        self.slices.values().map(|slice| slice.items.len()).sum()
    }

    pub fn clear(&mut self) {
        self.slices.clear();
    }
}

fn dedup_by_id<T: ChildEntity>(items: Vec<T>) -> Vec<T> {
    let mut positions: HashMap<EntityId, usize> = HashMap::new();
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        match positions.get(&item.id()) {
            Some(&index) => unique[index] = item,
            None => {
                positions.insert(item.id(), unique.len());
                unique.push(item);
            }
        }
    }
    unique
}
