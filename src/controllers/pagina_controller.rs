use tracing::debug;

use crate::dto::pagina_dto::ApiResponse;
use crate::services::{render_plan, HierarchyLoader, RenderPlan};
use crate::utils::errors::{AppError, AppResult};

const MAX_SLUG_LEN: usize = 200;

pub struct PaginaController {
    loader: HierarchyLoader,
}

impl PaginaController {
    pub fn new(loader: HierarchyLoader) -> Self {
        Self { loader }
    }

    /// Resolver un slug (o la página de inicio) y armar su plan de render
    pub async fn get_pagina(&self, slug: Option<&str>) -> AppResult<ApiResponse<RenderPlan>> {
        if let Some(slug) = slug {
            if slug.len() > MAX_SLUG_LEN || slug.chars().any(char::is_control) {
                return Err(AppError::BadRequest("Slug inválido".to_string()));
            }
        }

        let page = self
            .loader
            .load_page(slug, |status| debug!("🔄 {:?} -> {:?}", slug, status))
            .await?;

        // Un apartado inactivo no se publica
        if !page.apartado.activo {
            return Err(AppError::NotFound(format!(
                "La página '{}' no está activa",
                page.apartado.nombre
            )));
        }

        let plan = render_plan(&page);
        if page.is_degraded() {
            let message = format!(
                "Página incompleta: {} ramas no se pudieron cargar",
                page.degradaciones.len()
            );
            return Ok(ApiResponse::success_with_message(plan, message));
        }
        Ok(ApiResponse::success(plan))
    }
}
