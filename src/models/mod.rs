//! Modelos del sistema
//!
//! Este módulo contiene las cuatro entidades del portal público y los traits
//! que describen su jerarquía: apartado → categoria → seccion → contenido.
//! Cada hija lleva únicamente el id de su padre.

pub mod apartado;
pub mod categoria;
pub mod seccion;
pub mod contenido;
pub mod plantilla;

pub use apartado::Apartado;
pub use categoria::Categoria;
pub use seccion::Seccion;
pub use contenido::Contenido;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identificador numérico asignado por el backend
pub type EntityId = i64;

/// Tipos de entidad manejados por el cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Apartado,
    Categoria,
    Seccion,
    Contenido,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Apartado => "apartado",
            EntityKind::Categoria => "categoria",
            EntityKind::Seccion => "seccion",
            EntityKind::Contenido => "contenido",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entidad identificada por clave primaria
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> EntityId;
}

/// Entidad que cuelga de un padre por clave foránea
pub trait ChildEntity: Entity {
    type Parent: Entity;

    fn parent_id(&self) -> EntityId;
}

pub(crate) fn default_activo() -> bool {
    true
}
