//! Modelo de Seccion
//!
//! Bloque de contenido dentro de una categoria. `tipo_seccion` selecciona
//! el renderizado del bloque, independiente de la plantilla del apartado.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{default_activo, Categoria, ChildEntity, Entity, EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seccion {
    pub id: EntityId,
    pub categoria_id: EntityId,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub texto: String,
    #[serde(default)]
    pub imagen: Option<String>,
    #[serde(default = "default_activo")]
    pub activo: bool,
    #[serde(default)]
    pub tipo_seccion: Option<String>,
    #[serde(default = "Utc::now")]
    pub creado_en: DateTime<Utc>,
}

impl Seccion {
    pub fn new(id: EntityId, categoria_id: EntityId, titulo: impl Into<String>) -> Self {
        Self {
            id,
            categoria_id,
            titulo: titulo.into(),
            texto: String::new(),
            imagen: None,
            activo: true,
            tipo_seccion: None,
            creado_en: Utc::now(),
        }
    }

    pub fn with_tipo(mut self, tipo: impl Into<String>) -> Self {
        self.tipo_seccion = Some(tipo.into());
        self
    }
}

impl Entity for Seccion {
    const KIND: EntityKind = EntityKind::Seccion;

    fn id(&self) -> EntityId {
        self.id
    }
}

impl ChildEntity for Seccion {
    type Parent = Categoria;

    fn parent_id(&self) -> EntityId {
        self.categoria_id
    }
}
