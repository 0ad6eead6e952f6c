use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::cache::CacheStats;
use crate::dto::pagina_dto::{ApiResponse, InvalidateResponse};
use crate::state::AppState;

pub fn create_cache_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/invalidate", post(invalidate))
}

async fn get_stats(State(state): State<AppState>) -> Json<ApiResponse<CacheStats>> {
    Json(ApiResponse::success(state.cache.stats().await))
}

async fn invalidate(State(state): State<AppState>) -> Json<ApiResponse<InvalidateResponse>> {
    let before = state.cache.stats().await;
    state.cache.clear().await;
    let after = state.cache.stats().await;
    info!("🧹 Cache limpiado: {} padres descartados", before.parents_cached);

    Json(ApiResponse::success_with_message(
        InvalidateResponse { before, after },
        "Cache limpiado".to_string(),
    ))
}
