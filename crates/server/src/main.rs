//! HTTP service binary backed by the live TMDB provider.
//!
//! Configuration comes from the environment (see `ServiceConfig`).

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pipeline::RankingConfig;
use server::{RecommendationOrchestrator, ServiceConfig};
use sources::TmdbProvider;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = ServiceConfig::from_env()?;
    let ranking = match &config.ranking_config {
        Some(path) => RankingConfig::from_json_file(path)?,
        None => RankingConfig::default(),
    };

    info!("Using TMDB at {}", config.tmdb_base_url);
    let provider = Arc::new(TmdbProvider::new(
        config.tmdb_base_url.clone(),
        config.tmdb_access_token.clone(),
        config.tmdb_api_key.clone(),
    ));

    let orchestrator = RecommendationOrchestrator::new(provider, ranking)
        .with_max_candidates(config.max_candidates)
        .with_filmography_limit(config.director_filmography_limit);

    server::serve(orchestrator, &config.api_bind, &config.cors_origin).await
}
