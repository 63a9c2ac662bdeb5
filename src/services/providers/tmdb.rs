/// TMDb API provider
///
/// API Flow:
/// 1. Details: /movie/{id}?api_key=…&language=en-US → poster path, vote average, tagline
/// 2. Poster URL: image base + poster path
///
/// Responses are cached in Redis when a cache is configured.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieId, PosterDetails, TmdbMovie},
    services::providers::PosterProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const POSTER_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    image_base: String,
    cache: Option<Cache>,
}

impl TmdbProvider {
    /// Creates a provider whose requests give up after `timeout`
    pub fn new(
        api_key: Option<String>,
        api_url: String,
        image_base: String,
        timeout: Duration,
        cache: Option<Cache>,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        let api_key = api_key.filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("TMDB_API_KEY not set, poster lookups will return placeholders");
        }

        Ok(Self {
            http_client,
            api_key,
            api_url,
            image_base,
            cache,
        })
    }

    async fn fetch(&self, api_key: &str, movie_id: MovieId) -> AppResult<PosterDetails> {
        match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::Poster(movie_id),
                POSTER_CACHE_TTL,
                self.fetch_from_api(api_key, movie_id)
            ),
            None => self.fetch_from_api(api_key, movie_id).await,
        }
    }

    async fn fetch_from_api(&self, api_key: &str, movie_id: MovieId) -> AppResult<PosterDetails> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key), ("language", "en-US")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb API returned status {}: {}",
                status, body
            )));
        }

        let movie: TmdbMovie = response.json().await?;
        tracing::debug!(movie_id, "Fetched poster details from TMDb");
        Ok(movie.into_details(&self.image_base))
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbProvider {
    async fn lookup(&self, movie_id: MovieId) -> PosterDetails {
        let Some(api_key) = self.api_key.as_deref() else {
            return PosterDetails::unavailable();
        };

        match self.fetch(api_key, movie_id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(movie_id, error = %e, "Poster lookup failed");
                PosterDetails::unavailable()
            }
        }
    }

    fn name(&self) -> &'static str {
        "TMDb"
    }
}
