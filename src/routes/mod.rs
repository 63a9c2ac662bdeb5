use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    catalog::{CatalogStore, DataSources},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::PosterProvider,
};

pub mod browse;
pub mod catalog;
pub mod posters;
pub mod recommendations;
pub mod titles;

/// Shared handles passed to every handler
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub posters: Arc<dyn PosterProvider>,
    /// Files read again on reload
    pub data_sources: DataSources,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogStore>,
        posters: Arc<dyn PosterProvider>,
        data_sources: DataSources,
    ) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            posters,
            data_sources,
        })
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/titles", get(titles::list))
        .route("/titles/search", get(titles::search))
        .route("/titles/details", get(titles::details))
        .route("/actors", get(browse::actors))
        .route("/directors", get(browse::directors))
        .route("/genres", get(browse::genres))
        .route("/moods", get(browse::moods))
        .route("/recommendations", post(recommendations::recommend))
        .route("/movies/:id/poster", get(posters::poster))
        .route("/catalog/stats", get(catalog::stats))
        .route("/catalog/reload", post(catalog::reload))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let catalog = state.catalog.snapshot().await;
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "ready": catalog.is_ready(),
            "movies": catalog.len(),
        })),
    )
}
