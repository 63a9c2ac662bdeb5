use crate::{
    catalog::Catalog,
    error::{AppError, AppResult},
    models::{MovieId, PosterDetails},
    services::providers::PosterProvider,
};

/// Poster details for a title of the catalog
///
/// Ids outside the catalog are rejected before any network call. The provider
/// itself never fails, so a known id always gets details or the placeholder.
pub async fn poster_details(
    provider: &dyn PosterProvider,
    catalog: &Catalog,
    movie_id: MovieId,
) -> AppResult<PosterDetails> {
    if catalog.row_of_id(movie_id).is_none() {
        return Err(AppError::NotFound(format!("Unknown movie id {}", movie_id)));
    }

    tracing::debug!(movie_id, provider = provider.name(), "Looking up poster");
    Ok(provider.lookup(movie_id).await)
}
