//! Server crate for the reel-match similarity service.
//!
//! This crate contains the orchestrator that coordinates metadata
//! fetching and ranking, the HTTP API in front of it, and the service
//! configuration.

pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;

pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use http::{build_router, AppState};
pub use orchestrator::{BaseMovie, RecommendationOrchestrator, RecommendationSet};

/// Bind `addr` and serve the HTTP API until the process is stopped.
pub async fn serve(orchestrator: RecommendationOrchestrator, addr: &str, cors_origin: &str) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("Invalid bind address {addr}"))?;
    let app = build_router(orchestrator, cors_origin);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("{} listening on http://{}", http::SERVICE_NAME, addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
