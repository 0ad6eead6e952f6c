//! Modelo de Categoria

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{default_activo, Apartado, ChildEntity, Entity, EntityId, EntityKind};

/// Agrupación dentro de un apartado (por ejemplo una entrada de blog)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categoria {
    pub id: EntityId,
    pub apartado_id: EntityId,
    pub nombre: String,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub texto: String,
    #[serde(default)]
    pub imagen: Option<String>,
    #[serde(default = "default_activo")]
    pub activo: bool,
    #[serde(default = "Utc::now")]
    pub creado_en: DateTime<Utc>,
}

impl Categoria {
    pub fn new(id: EntityId, apartado_id: EntityId, nombre: impl Into<String>) -> Self {
        let nombre = nombre.into();
        Self {
            id,
            apartado_id,
            titulo: nombre.clone(),
            nombre,
            texto: String::new(),
            imagen: None,
            activo: true,
            creado_en: Utc::now(),
        }
    }
}

impl Entity for Categoria {
    const KIND: EntityKind = EntityKind::Categoria;

    fn id(&self) -> EntityId {
        self.id
    }
}

impl ChildEntity for Categoria {
    type Parent = Apartado;

    fn parent_id(&self) -> EntityId {
        self.apartado_id
    }
}
