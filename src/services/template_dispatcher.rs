//! Despacho de plantillas
//!
//! Dos tablas independientes:
//! - página: `plantilla_id` del apartado → `PageTemplate`;
//! - sección: `tipo_seccion` de cada seccion → `SectionLayout`.
//!
//! Ambas son búsquedas puras con variante por defecto, de modo que un id o
//! un tipo desconocido se degrada en lugar de fallar.

use serde::Serialize;
use uuid::Uuid;

use super::hierarchy_loader::FullyResolvedPage;
use crate::models::{plantilla, Apartado, Categoria, Contenido, Seccion};

/// Variantes de página
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageTemplate {
    Inicio,
    Nosotros,
    PreguntasFrecuentes,
    Terminos,
    Politicas,
    Blog,
    Precios,
    Contacto,
    /// Lista genérica de características, usada para ids desconocidos
    ListaCaracteristicas,
}

impl PageTemplate {
    pub const ALL: [PageTemplate; 9] = [
        PageTemplate::Inicio,
        PageTemplate::Nosotros,
        PageTemplate::PreguntasFrecuentes,
        PageTemplate::Terminos,
        PageTemplate::Politicas,
        PageTemplate::Blog,
        PageTemplate::Precios,
        PageTemplate::Contacto,
        PageTemplate::ListaCaracteristicas,
    ];

    /// UUID fijo de la plantilla; la variante por defecto no tiene
    pub fn plantilla_id(&self) -> Option<Uuid> {
        match self {
            PageTemplate::Inicio => Some(plantilla::INICIO),
            PageTemplate::Nosotros => Some(plantilla::NOSOTROS),
            PageTemplate::PreguntasFrecuentes => Some(plantilla::PREGUNTAS_FRECUENTES),
            PageTemplate::Terminos => Some(plantilla::TERMINOS),
            PageTemplate::Politicas => Some(plantilla::POLITICAS),
            PageTemplate::Blog => Some(plantilla::BLOG),
            PageTemplate::Precios => Some(plantilla::PRECIOS),
            PageTemplate::Contacto => Some(plantilla::CONTACTO),
            PageTemplate::ListaCaracteristicas => None,
        }
    }

    pub fn from_plantilla_id(plantilla_id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|template| {
                template
                    .plantilla_id()
                    .map(|expected| plantilla::is_plantilla(plantilla_id, expected))
                    .unwrap_or(false)
            })
            .unwrap_or(PageTemplate::ListaCaracteristicas)
    }
}

/// Variantes de renderizado de una seccion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLayout {
    General,
    Cards,
    CardsWithMedia,
    Gallery,
    GalleryGrid,
    Tabs,
    InfoBoxes,
}

impl SectionLayout {
    /// Acepta guiones o guiones bajos y cualquier capitalización
    pub fn from_tipo(tipo: Option<&str>) -> Self {
        let Some(tipo) = tipo else {
            return SectionLayout::General;
        };
        match tipo.trim().to_lowercase().replace('-', "_").as_str() {
            "cards" => SectionLayout::Cards,
            "cards_media" | "cards_with_media" => SectionLayout::CardsWithMedia,
            "gallery" => SectionLayout::Gallery,
            "gallery_grid" => SectionLayout::GalleryGrid,
            "tabs" => SectionLayout::Tabs,
            "info_boxes" => SectionLayout::InfoBoxes,
            _ => SectionLayout::General,
        }
    }
}

/// Seccion lista para renderizar
#[derive(Debug, Clone, Serialize)]
pub struct SeccionPlan {
    pub seccion: Seccion,
    pub layout: SectionLayout,
    pub contenidos: Vec<Contenido>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriaPlan {
    pub categoria: Categoria,
    pub secciones: Vec<SeccionPlan>,
}

/// Árbol materializado que recibe la capa de presentación
#[derive(Debug, Clone, Serialize)]
pub struct RenderPlan {
    pub template: PageTemplate,
    pub apartado: Apartado,
    pub categorias: Vec<CategoriaPlan>,
}

/// Construye el plan de renderizado de una página lista.
/// Aquí, y solo aquí, se descartan las entidades inactivas.
pub fn render_plan(page: &FullyResolvedPage) -> RenderPlan {
    let categorias = page
        .categorias
        .iter()
        .filter(|categoria| categoria.activo)
        .map(|categoria| CategoriaPlan {
            categoria: categoria.clone(),
            secciones: page
                .secciones_de(categoria.id)
                .iter()
                .filter(|seccion| seccion.activo)
                .map(|seccion| SeccionPlan {
                    seccion: seccion.clone(),
                    layout: SectionLayout::from_tipo(seccion.tipo_seccion.as_deref()),
                    contenidos: page.contenidos_de(seccion.id).to_vec(),
                })
                .collect(),
        })
        .collect();

    RenderPlan {
        template: PageTemplate::from_plantilla_id(&page.apartado.plantilla_id),
        apartado: page.apartado.clone(),
        categorias,
    }
}
