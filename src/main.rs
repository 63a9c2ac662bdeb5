use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reel_api::{
    catalog::CatalogStore,
    config::Config,
    db::{create_redis_client, Cache},
    routes::{create_router, AppState},
    services::TmdbProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Build the catalog before accepting requests
    let data_sources = config.data_sources();
    let catalog = Arc::new(CatalogStore::new());
    let outcome = catalog.load(&data_sources).await;
    if outcome.stats.degraded {
        tracing::warn!(data_dir = %config.data_dir.display(), "Serving without a corpus");
    }

    let (cache, cache_handle) = match &config.redis_url {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?).await;
            (Some(cache), Some(handle))
        }
        None => (None, None),
    };

    let posters = Arc::new(TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_base.clone(),
        config.poster_timeout(),
        cache,
    )?);

    let app = create_router(AppState::new(catalog, posters, data_sources));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
