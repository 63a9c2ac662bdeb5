use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    catalog::DEFAULT_SEARCH_LIMIT,
    error::{AppError, AppResult},
    models::{LocalDetails, MovieId, TitleSummary},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    title: String,
}

/// Every title with its TMDb id
pub async fn list(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, MovieId>> {
    Json(state.catalog.snapshot().await.list_titles())
}

/// Handler for title search endpoint
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<TitleSummary>>> {
    if params.q.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let catalog = state.catalog.snapshot().await;
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    Ok(Json(catalog.search_titles(&params.q, limit)))
}

/// Corpus details of a title
pub async fn details(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DetailsQuery>,
) -> AppResult<Json<LocalDetails>> {
    state
        .catalog
        .snapshot()
        .await
        .local_details(&params.title)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Unknown title '{}'", params.title)))
}
