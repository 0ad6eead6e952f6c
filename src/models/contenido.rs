//! Modelo de Contenido - hoja del árbol

use serde::{Deserialize, Serialize};

use super::{ChildEntity, Entity, EntityId, EntityKind, Seccion};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contenido {
    pub id: EntityId,
    pub seccion_id: EntityId,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub texto: String,
    #[serde(default)]
    pub media_url: Option<String>,
}

impl Contenido {
    pub fn new(id: EntityId, seccion_id: EntityId, titulo: impl Into<String>) -> Self {
        Self {
            id,
            seccion_id,
            titulo: titulo.into(),
            texto: String::new(),
            media_url: None,
        }
    }
}

impl Entity for Contenido {
    const KIND: EntityKind = EntityKind::Contenido;

    fn id(&self) -> EntityId {
        self.id
    }
}

impl ChildEntity for Contenido {
    type Parent = Seccion;

    fn parent_id(&self) -> EntityId {
        self.seccion_id
    }
}
