use std::sync::Arc;

use movie_discovery::{
    api::{create_router, AppState},
    config::Config,
    page::DiscoveryController,
    services::{
        providers::{HttpRecommender, OmdbProvider},
        Enricher, SearchPipeline, TrendingLoader,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_discovery=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Both upstream clients share one connection pool
    let http_client = reqwest::Client::new();
    let recommender = HttpRecommender::new(http_client.clone(), config.recommender_url.clone());
    let metadata = OmdbProvider::new(
        http_client,
        config.metadata_url.clone(),
        config.metadata_api_key.clone(),
    );

    let enricher = Enricher::new(Arc::new(metadata), config.lookup_concurrency());
    let controller = DiscoveryController::new(
        SearchPipeline::new(Arc::new(recommender), enricher.clone()),
        TrendingLoader::new(enricher),
    );

    // Trending loads in the background; the page is usable before it lands
    let mounting = controller.clone();
    tokio::spawn(async move {
        mounting.mount().await;
    });

    let app = create_router(AppState::new(controller));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        addr = %config.bind_addr(),
        recommender = %config.recommender_url,
        metadata = %config.metadata_url,
        "Movie discovery server listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
