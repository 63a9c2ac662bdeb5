use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Recommendation, RecommendationRequest},
    routes::AppState,
    services::recommendations::{self, DEFAULT_TOP_N},
};

/// Handler for recommendations endpoint
///
/// An unknown favorite is not an error: the response is an empty list.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let preferences = request.preferences();
    let top_n = request.top_n.unwrap_or(DEFAULT_TOP_N);
    let catalog = state.catalog.snapshot().await;

    let results = match (request.movie_id, request.favorite_title.as_deref()) {
        (Some(movie_id), _) => {
            recommendations::recommend_by_id(&catalog, movie_id, &preferences, top_n)
        }
        (None, Some(title)) if !title.trim().is_empty() => {
            recommendations::recommend(&catalog, title, &preferences, top_n)
        }
        _ => {
            return Err(AppError::InvalidInput(
                "Either favorite_title or movie_id is required".to_string(),
            ))
        }
    };

    tracing::info!(
        request_id = %request_id,
        favorite = ?request.favorite_title,
        movie_id = ?request.movie_id,
        results = results.len(),
        "Recommendations computed"
    );

    Ok(Json(results))
}
