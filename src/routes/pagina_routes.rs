use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use crate::controllers::pagina_controller::PaginaController;
use crate::dto::pagina_dto::ApiResponse;
use crate::services::RenderPlan;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_pagina_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_inicio))
        .route("/:slug", get(get_pagina))
}

async fn get_inicio(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RenderPlan>>, AppError> {
    let controller = PaginaController::new(state.loader.clone());
    let response = controller.get_pagina(None).await?;
    Ok(Json(response))
}

async fn get_pagina(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<RenderPlan>>, AppError> {
    let controller = PaginaController::new(state.loader.clone());
    let response = controller.get_pagina(Some(&slug)).await?;
    Ok(Json(response))
}
