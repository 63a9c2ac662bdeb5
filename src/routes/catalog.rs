use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    catalog::{LoadOutcome, LoadStats},
    middleware::request_id::RequestId,
    routes::AppState,
};

/// Counters from the load behind the current catalog
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<LoadStats> {
    Json(state.catalog.snapshot().await.stats().clone())
}

/// Rebuilds the catalog from the data files and swaps it in, unless the
/// rebuild failed while a ready catalog is serving
pub async fn reload(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> Json<LoadOutcome> {
    tracing::info!(request_id = %request_id, "Catalog reload requested");
    Json(state.catalog.load(&state.data_sources).await)
}
