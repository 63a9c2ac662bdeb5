/// Poster data provider abstraction
///
/// Poster, rating and tagline come from a third-party API keyed by the
/// corpus' TMDb id. Providers never fail: any network, HTTP or JSON problem is
/// logged and answered with [`PosterDetails::unavailable`], so callers never
/// depend on the lookup succeeding.
use crate::models::{MovieId, PosterDetails};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Poster, rating and tagline for a title, or the placeholder triple
    async fn lookup(&self, movie_id: MovieId) -> PosterDetails;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
