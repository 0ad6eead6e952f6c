//! Modelo de Apartado
//!
//! Sección de primer nivel del sitio público. Su `plantilla_id` decide qué
//! variante de página se renderiza.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{default_activo, Entity, EntityId, EntityKind};

/// Apartado principal - pertenece a una empresa (tenant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apartado {
    pub id: EntityId,
    #[serde(default)]
    pub empresa_id: Option<Uuid>,
    pub nombre: String,
    pub plantilla_id: String,
    #[serde(default = "default_activo")]
    pub activo: bool,
    #[serde(default)]
    pub mostrar_hijos: bool,
}

impl Apartado {
    pub fn new(id: EntityId, nombre: impl Into<String>, plantilla_id: impl Into<String>) -> Self {
        Self {
            id,
            empresa_id: None,
            nombre: nombre.into(),
            plantilla_id: plantilla_id.into(),
            activo: true,
            mostrar_hijos: true,
        }
    }

    /// Comparación exacta sin distinguir mayúsculas
    pub fn matches_name(&self, slug: &str) -> bool {
        self.nombre.trim().to_lowercase() == slug.trim().to_lowercase()
    }
}

impl Entity for Apartado {
    const KIND: EntityKind = EntityKind::Apartado;

    fn id(&self) -> EntityId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_name_ignores_case_and_padding() {
        let apartado = Apartado::new(1, "Blog", "T1");
        assert!(apartado.matches_name("blog"));
        assert!(apartado.matches_name("  BLOG "));
        assert!(!apartado.matches_name("blogs"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let apartado: Apartado = serde_json::from_str(
            r#"{"id": 3, "nombre": "Precios", "plantilla_id": "abc"}"#,
        )
        .unwrap();
        assert!(apartado.activo);
        assert!(!apartado.mostrar_hijos);
        assert_eq!(apartado.empresa_id, None);
    }
}
