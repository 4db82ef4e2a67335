//! HTTP API.
//!
//! | route                                  | response |
//! |----------------------------------------|----------|
//! | `GET /api/health`                      | `{status, service}` |
//! | `GET /api/movies/search?query=`        | `{results: [MovieSummary]}` |
//! | `GET /api/movies/{id}`                 | details view |
//! | `GET /api/movies/{id}/recommendations` | `RecommendationSet` |

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, Method},
    routing::get,
};
use catalog::{Genre, MovieId, MovieMetadata, MovieSummary};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::{ServiceError, ServiceResult};
use crate::orchestrator::{RecommendationOrchestrator, RecommendationSet};

pub const SERVICE_NAME: &str = "reel-match";

const UNKNOWN: &str = "Unknown";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: RecommendationOrchestrator,
}

pub fn build_router(orchestrator: RecommendationOrchestrator, cors_origin: &str) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/movies/search", get(search_movies))
        .route("/api/movies/{id}", get(movie_details))
        .route("/api/movies/{id}/recommendations", get(movie_recommendations))
        .with_state(AppState { orchestrator })
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
}

/// GET-only CORS for the configured origin; any origin if it doesn't parse.
fn cors_layer(cors_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);
    match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!("Invalid CORS origin {:?}, allowing any origin", cors_origin);
            layer.allow_origin(Any)
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
    })
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    query: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    results: Vec<MovieSummary>,
}

async fn search_movies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ServiceResult<Json<SearchResponse>> {
    let title = query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .ok_or_else(ServiceError::invalid_query)?;

    let results = state.orchestrator.provider().search_movies(title).await?;
    Ok(Json(SearchResponse { results }))
}

/// Details view with display defaults filled in
#[derive(Debug, Serialize)]
struct MovieDetailsResponse {
    id: MovieId,
    title: String,
    overview: String,
    release_date: Option<String>,
    runtime: Option<u32>,
    genres: Vec<Genre>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: f64,
    director: String,
    cast: Vec<CastResponse>,
}

#[derive(Debug, Serialize)]
struct CastResponse {
    id: u64,
    name: String,
    character: String,
}

impl From<MovieMetadata> for MovieDetailsResponse {
    fn from(movie: MovieMetadata) -> Self {
        let director = movie
            .credits
            .director()
            .map(|member| member.name.clone())
            .unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            id: movie.id,
            title: movie.title,
            overview: movie.overview.unwrap_or_default(),
            release_date: movie.release_date,
            runtime: movie.runtime,
            genres: movie.genres,
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            vote_average: movie.vote_average.unwrap_or_default(),
            director,
            cast: movie
                .credits
                .cast
                .into_iter()
                .map(|member| CastResponse {
                    id: member.id,
                    name: member.name,
                    character: member.character.unwrap_or_else(|| UNKNOWN.to_string()),
                })
                .collect(),
        }
    }
}

async fn movie_details(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> ServiceResult<Json<MovieDetailsResponse>> {
    let details = state.orchestrator.provider().movie_details(movie_id).await?;
    Ok(Json(details.into()))
}

async fn movie_recommendations(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> ServiceResult<Json<RecommendationSet>> {
    let set = state.orchestrator.recommend(movie_id).await?;
    Ok(Json(set))
}
