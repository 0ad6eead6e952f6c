//! Portal de contenidos
//!
//! Capa de resolución y cache de contenido jerárquico
//! (apartado → categoria → seccion → contenido) servida sobre HTTP.

pub mod cache;
pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use middleware::cors::cors_for;
use state::AppState;

/// Crear el router completo de la API
pub fn create_router(state: AppState) -> Router {
    let cors = cors_for(&state.config);

    Router::new()
        .route("/health", get(health))
        .nest("/api/paginas", routes::pagina_routes::create_pagina_router())
        .nest("/api/cache", routes::cache_routes::create_cache_router())
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "portal_contenidos",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
