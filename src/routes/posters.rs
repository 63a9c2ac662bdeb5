use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{MovieId, PosterDetails},
    routes::AppState,
    services::posters,
};

/// Poster, rating and tagline for a title; placeholders when TMDb is unreachable
pub async fn poster(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<PosterDetails>> {
    let catalog = state.catalog.snapshot().await;
    let details = posters::poster_details(state.posters.as_ref(), &catalog, movie_id).await?;
    Ok(Json(details))
}
