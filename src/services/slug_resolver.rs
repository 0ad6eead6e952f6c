//! Resolución de slugs
//!
//! Traduce el parámetro de ruta a un apartado concreto:
//! 1. coincidencia exacta (sin mayúsculas) con el `nombre`;
//! 2. si no hay, y el slug es un alias reservado, coincidencia por
//!    `plantilla_id` con la plantilla fija de ese alias;
//! 3. si tampoco, no existe.
//!
//! Sin slug se resuelve como el alias de inicio.

use serde::Serialize;
use tracing::debug;

use super::template_dispatcher::PageTemplate;
use crate::models::plantilla;
use crate::models::Apartado;

/// Alias reservados con semántica de plantilla
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservedAlias {
    Inicio,
    Nosotros,
    PreguntasFrecuentes,
    Terminos,
    Politicas,
}

impl ReservedAlias {
    pub const ALL: [ReservedAlias; 5] = [
        ReservedAlias::Inicio,
        ReservedAlias::Nosotros,
        ReservedAlias::PreguntasFrecuentes,
        ReservedAlias::Terminos,
        ReservedAlias::Politicas,
    ];

    /// Slugs aceptados para cada alias
    pub fn slugs(&self) -> &'static [&'static str] {
        match self {
            ReservedAlias::Inicio => &["inicio", "home"],
            ReservedAlias::Nosotros => &["nosotros", "about"],
            ReservedAlias::PreguntasFrecuentes => &["faq", "preguntas-frecuentes"],
            ReservedAlias::Terminos => &["terminos", "terms"],
            ReservedAlias::Politicas => &["politicas", "privacy"],
        }
    }

    pub fn template(&self) -> PageTemplate {
        match self {
            ReservedAlias::Inicio => PageTemplate::Inicio,
            ReservedAlias::Nosotros => PageTemplate::Nosotros,
            ReservedAlias::PreguntasFrecuentes => PageTemplate::PreguntasFrecuentes,
            ReservedAlias::Terminos => PageTemplate::Terminos,
            ReservedAlias::Politicas => PageTemplate::Politicas,
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|alias| alias.slugs().contains(&slug.as_str()))
    }

    fn matches(&self, apartado: &Apartado) -> bool {
        self.template()
            .plantilla_id()
            .map(|expected| plantilla::is_plantilla(&apartado.plantilla_id, expected))
            .unwrap_or(false)
    }
}

/// Cómo se encontró el apartado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "via", content = "alias")]
pub enum MatchKind {
    Nombre,
    Alias(ReservedAlias),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    pub apartado: &'a Apartado,
    pub via: MatchKind,
}

/// Normaliza el parámetro de ruta; vacío equivale a no tener slug
pub fn normalize_slug(slug: Option<&str>) -> Option<String> {
    slug.map(str::trim)
        .filter(|slug| !slug.is_empty())
        .map(str::to_string)
}

/// Resolver un slug contra los apartados conocidos
pub fn resolve_slug<'a>(slug: Option<&str>, apartados: &'a [Apartado]) -> Option<Resolution<'a>> {
    let slug = normalize_slug(slug).unwrap_or_else(|| ReservedAlias::Inicio.slugs()[0].to_string());

    if let Some(apartado) = apartados.iter().find(|apartado| apartado.matches_name(&slug)) {
        debug!("🔍 Slug '{}' resuelto por nombre -> apartado {}", slug, apartado.id);
        return Some(Resolution {
            apartado,
            via: MatchKind::Nombre,
        });
    }

    let alias = ReservedAlias::from_slug(&slug)?;
    let apartado = apartados.iter().find(|apartado| alias.matches(apartado))?;
    debug!("🔍 Slug '{}' resuelto por plantilla {:?} -> apartado {}", slug, alias, apartado.id);
    Some(Resolution {
        apartado,
        via: MatchKind::Alias(alias),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nosotros_id() -> String {
        plantilla::NOSOTROS.to_string()
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let apartados = vec![Apartado::new(1, "Blog", "T1")];
        let resolution = resolve_slug(Some("BLOG"), &apartados).unwrap();
        assert_eq!(resolution.apartado.id, 1);
        assert_eq!(resolution.via, MatchKind::Nombre);
    }

    #[test]
    fn test_alias_falls_back_to_template_id() {
        let apartados = vec![
            Apartado::new(1, "Blog", "T1"),
            Apartado::new(2, "Quiénes somos", nosotros_id()),
        ];
        let resolution = resolve_slug(Some("nosotros"), &apartados).unwrap();
        assert_eq!(resolution.apartado.id, 2);
        assert_eq!(resolution.via, MatchKind::Alias(ReservedAlias::Nosotros));

        let english = resolve_slug(Some("about"), &apartados).unwrap();
        assert_eq!(english.apartado.id, 2);
    }

    #[test]
    fn test_name_match_wins_over_alias() {
        let apartados = vec![
            Apartado::new(1, "Quiénes somos", nosotros_id()),
            Apartado::new(2, "Nosotros", "T9"),
        ];
        let resolution = resolve_slug(Some("nosotros"), &apartados).unwrap();
        assert_eq!(resolution.apartado.id, 2);
        assert_eq!(resolution.via, MatchKind::Nombre);
    }

    #[test]
    fn test_unknown_slug_without_alias_is_not_found() {
        let apartados = vec![Apartado::new(2, "faq", "T2")];
        assert!(resolve_slug(Some("preguntas"), &apartados).is_none());
        assert_eq!(resolve_slug(Some("faq"), &apartados).unwrap().apartado.id, 2);
    }

    #[test]
    fn test_alias_without_matching_template_is_not_found() {
        let apartados = vec![Apartado::new(1, "Blog", "T1")];
        assert!(resolve_slug(Some("terminos"), &apartados).is_none());
    }

    #[test]
    fn test_missing_slug_resolves_home() {
        let apartados = vec![
            Apartado::new(1, "Blog", "T1"),
            Apartado::new(5, "Portada", plantilla::INICIO.to_string()),
        ];
        assert_eq!(resolve_slug(None, &apartados).unwrap().apartado.id, 5);
        assert_eq!(resolve_slug(Some("  "), &apartados).unwrap().apartado.id, 5);
    }
}
