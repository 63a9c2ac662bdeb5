use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{models::Mood, routes::AppState};

pub async fn actors(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.snapshot().await.list_actors())
}

pub async fn directors(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.snapshot().await.list_directors())
}

pub async fn genres(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.snapshot().await.list_genres())
}

/// Moods accepted by the recommendations endpoint
pub async fn moods() -> Json<Vec<Mood>> {
    Json(Mood::ALL.to_vec())
}
