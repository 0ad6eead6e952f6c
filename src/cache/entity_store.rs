//! Almacén de entidades
//!
//! Colecciones en memoria para los cuatro tipos de entidad, más una
//! selección "actual" por tipo. Todas las mezclas son por clave primaria,
//! nunca por posición. Ninguna operación falla.

use std::collections::HashMap;

use crate::models::{Apartado, Categoria, Contenido, Entity, EntityId, Seccion};

/// Colección masiva más la selección actual de un tipo de entidad
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    current: Option<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: None,
        }
    }
}

impl<T: Entity> Collection<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reemplaza los existentes en su sitio y agrega los nuevos al final,
    /// en el orden del lote. Devuelve cuántos eran nuevos.
    fn upsert_many(&mut self, incoming: Vec<T>) -> usize {
        let mut positions: HashMap<EntityId, usize> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| (item.id(), index))
            .collect();

        let mut added = 0;
        for item in incoming {
            self.refresh_current(&item);
            match positions.get(&item.id()) {
                Some(&index) => self.items[index] = item,
                None => {
                    positions.insert(item.id(), self.items.len());
                    self.items.push(item);
                    added += 1;
                }
            }
        }
        added
    }

    fn upsert_one(&mut self, item: T) {
        self.upsert_many(vec![item]);
    }

    /// Fija la selección actual y actualiza la entrada masiva si existe
    fn select(&mut self, item: T) {
        if let Some(existing) = self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            *existing = item.clone();
        }
        self.current = Some(item);
    }

    fn clear_current(&mut self) {
        self.current = None;
    }

    fn remove(&mut self, id: EntityId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        let removed_current = match &self.current {
            Some(current) if current.id() == id => {
                self.current = None;
                true
            }
            _ => false,
        };
        before != self.items.len() || removed_current
    }

    fn refresh_current(&mut self, item: &T) {
        if let Some(current) = self.current.as_mut() {
            if current.id() == item.id() {
                *current = item.clone();
            }
        }
    }

    fn clear(&mut self) {
        self.items.clear();
        self.current = None;
    }
}

/// Acceso tipado a la colección de cada tipo dentro del almacén
pub trait StoredEntity: Entity {
    fn collection(store: &EntityStore) -> &Collection<Self>;
    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self>;
}

/// Almacén con las cuatro colecciones
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    apartados: Collection<Apartado>,
    categorias: Collection<Categoria>,
    secciones: Collection<Seccion>,
    contenidos: Collection<Contenido>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_many<T: StoredEntity>(&mut self, items: Vec<T>) -> usize {
        T::collection_mut(self).upsert_many(items)
    }

    pub fn upsert_one<T: StoredEntity>(&mut self, item: T) {
        T::collection_mut(self).upsert_one(item)
    }

    pub fn select<T: StoredEntity>(&mut self, item: T) {
        T::collection_mut(self).select(item)
    }

    pub fn clear_current<T: StoredEntity>(&mut self) {
        T::collection_mut(self).clear_current()
    }

    /// Elimina de la colección masiva y de la selección actual
    pub fn remove<T: StoredEntity>(&mut self, id: EntityId) -> bool {
        T::collection_mut(self).remove(id)
    }

    pub fn get<T: StoredEntity>(&self, id: EntityId) -> Option<&T> {
        T::collection(self).get(id)
    }

    pub fn contains<T: StoredEntity>(&self, id: EntityId) -> bool {
        T::collection(self).contains(id)
    }

    pub fn all<T: StoredEntity>(&self) -> &[T] {
        T::collection(self).items()
    }

    pub fn current<T: StoredEntity>(&self) -> Option<&T> {
        T::collection(self).current()
    }

    pub fn len<T: StoredEntity>(&self) -> usize {
        T::collection(self).len()
    }

    pub fn clear(&mut self) {
        self.apartados.clear();
        self.categorias.clear();
        self.secciones.clear();
        self.contenidos.clear();
    }
}

impl StoredEntity for Apartado {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.apartados
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.apartados
    }
}

impl StoredEntity for Categoria {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.categorias
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.categorias
    }
}

impl StoredEntity for Seccion {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.secciones
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.secciones
    }
}

impl StoredEntity for Contenido {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.contenidos
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.contenidos
    }
}
