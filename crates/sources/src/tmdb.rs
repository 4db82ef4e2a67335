//! TMDB-backed metadata provider.
//!
//! Authenticates with a v4 bearer token when one is configured, otherwise
//! with a v3 `api_key` query parameter. Status mapping:
//! - 404 -> `NotFound("MOVIE_NOT_FOUND")`
//! - 401 / 403 -> `Unauthorized("TMDB_UNAUTHORIZED")`
//! - anything else non-2xx, transport or decode failures -> `Upstream`
//!
//! One attempt per request; no retries.

use crate::error::{ProviderError, Result};
use crate::provider::{DISCOVER_MIN_VOTE_COUNT, MovieProvider};
use async_trait::async_trait;
use catalog::{
    CastMember, CollectionId, CollectionRef, Credits, CrewMember, Genre, Keyword, KeywordId,
    MovieId, MovieMetadata, MovieSummary, PersonId,
};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

const LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
    api_key: Option<String>,
}

impl TmdbProvider {
    pub fn new(base_url: impl Into<String>, access_token: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token: access_token.filter(|token| !token.trim().is_empty()),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// Reuse an existing client (connection pool, custom timeouts).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn ensure_auth_configured(&self) -> Result<()> {
        if self.access_token.is_none() && self.api_key.is_none() {
            return Err(ProviderError::unauthorized(
                "TMDB_AUTH_MISSING",
                "TMDB credentials are missing",
            ));
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(self.endpoint(path))
            .header("accept", "application/json");
        match (&self.access_token, &self.api_key) {
            (Some(token), _) => request = request.bearer_auth(token),
            (None, Some(api_key)) => request = request.query(&[("api_key", api_key)]),
            (None, None) => {}
        }
        request
    }

    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        self.ensure_auth_configured()?;

        let response = request.send().await.map_err(|e| {
            ProviderError::upstream(
                "TMDB_REQUEST_FAILED",
                format!("Failed to send request to TMDB: {e}"),
            )
        })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                ProviderError::upstream(
                    "TMDB_DECODE_FAILED",
                    format!("Failed to decode TMDB response: {e}"),
                )
            });
        }
        Err(status_error(status))
    }

    async fn movie_list(&self, path: &str) -> Result<Vec<MovieSummary>> {
        let response: TmdbListResponse = self
            .send_json(self.get(path).query(&[("language", LANGUAGE), ("page", "1")]))
            .await?;
        Ok(response.into_summaries())
    }
}

/// `with_keywords` value: pipe-separated ids match any of them.
fn keyword_filter(keyword_ids: &[KeywordId]) -> String {
    keyword_ids
        .iter()
        .map(KeywordId::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

/// Map a non-success status onto the provider error taxonomy.
fn status_error(status: StatusCode) -> ProviderError {
    match status {
        StatusCode::NOT_FOUND => ProviderError::not_found("MOVIE_NOT_FOUND", "Movie not found"),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::unauthorized("TMDB_UNAUTHORIZED", "TMDB credentials are invalid")
        }
        other => ProviderError::upstream(
            "TMDB_UPSTREAM_ERROR",
            format!("TMDB returned a non-success response ({other})"),
        ),
    }
}

#[async_trait]
impl MovieProvider for TmdbProvider {
    #[instrument(skip(self))]
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>> {
        let response: TmdbListResponse = self
            .send_json(self.get("/search/movie").query(&[
                ("query", query),
                ("include_adult", "false"),
                ("language", LANGUAGE),
            ]))
            .await?;
        let results = response.into_summaries();
        debug!("TMDB search returned {} results", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn movie_details(&self, movie_id: MovieId) -> Result<MovieMetadata> {
        let response: TmdbMovieDetails = self
            .send_json(self.get(&format!("/movie/{movie_id}")).query(&[
                ("append_to_response", "credits,keywords"),
                ("language", LANGUAGE),
            ]))
            .await?;
        Ok(response.into_metadata())
    }

    async fn similar_movies(&self, movie_id: MovieId) -> Result<Vec<MovieSummary>> {
        self.movie_list(&format!("/movie/{movie_id}/similar")).await
    }

    async fn recommended_movies(&self, movie_id: MovieId) -> Result<Vec<MovieSummary>> {
        self.movie_list(&format!("/movie/{movie_id}/recommendations"))
            .await
    }

    #[instrument(skip(self))]
    async fn director_filmography(&self, person_id: PersonId) -> Result<Vec<MovieSummary>> {
        let response: TmdbPersonCredits = self
            .send_json(
                self.get(&format!("/person/{person_id}/movie_credits"))
                    .query(&[("language", LANGUAGE)]),
            )
            .await?;
        let films = response.directed();
        debug!("Person {} directed {} films", person_id, films.len());
        Ok(films)
    }

    #[instrument(skip(self))]
    async fn collection_movies(&self, collection_id: CollectionId) -> Result<Vec<MovieSummary>> {
        let response: TmdbCollection = self
            .send_json(
                self.get(&format!("/collection/{collection_id}"))
                    .query(&[("language", LANGUAGE)]),
            )
            .await?;
        Ok(response
            .parts
            .into_iter()
            .map(TmdbListMovie::into_summary)
            .collect())
    }

    #[instrument(skip(self))]
    async fn discover_by_keywords(&self, keyword_ids: &[KeywordId]) -> Result<Vec<MovieSummary>> {
        if keyword_ids.is_empty() {
            return Ok(Vec::new());
        }
        let min_votes = DISCOVER_MIN_VOTE_COUNT.to_string();
        let response: TmdbListResponse = self
            .send_json(self.get("/discover/movie").query(&[
                ("with_keywords", keyword_filter(keyword_ids).as_str()),
                ("sort_by", "vote_count.desc"),
                ("vote_count.gte", min_votes.as_str()),
                ("include_adult", "false"),
                ("language", LANGUAGE),
                ("page", "1"),
            ]))
            .await?;
        let results = response.into_summaries();
        debug!("Keyword discovery returned {} results", results.len());
        Ok(results)
    }
}

// =============================================================================
// Wire Types
// =============================================================================
// TMDB omits or nulls many fields; everything optional is modelled as such
// and defaulted on conversion.

#[derive(Debug, Deserialize)]
struct TmdbListResponse {
    #[serde(default)]
    results: Vec<TmdbListMovie>,
}

impl TmdbListResponse {
    fn into_summaries(self) -> Vec<MovieSummary> {
        self.results.into_iter().map(TmdbListMovie::into_summary).collect()
    }
}

#[derive(Debug, Deserialize)]
struct TmdbListMovie {
    id: MovieId,
    #[serde(default)]
    title: String,
    release_date: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<u64>,
}

impl TmdbListMovie {
    fn into_summary(self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title,
            release_date: self.release_date,
            poster_path: self.poster_path,
            vote_average: self.vote_average.unwrap_or_default(),
            vote_count: self.vote_count.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetails {
    id: MovieId,
    #[serde(default)]
    title: String,
    overview: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    genres: Option<Vec<Genre>>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<u64>,
    credits: Option<TmdbCredits>,
    keywords: Option<TmdbKeywords>,
    belongs_to_collection: Option<CollectionRef>,
}

impl TmdbMovieDetails {
    fn into_metadata(self) -> MovieMetadata {
        let credits = self.credits.unwrap_or_default();
        MovieMetadata {
            id: self.id,
            title: self.title,
            overview: self.overview,
            release_date: self.release_date,
            runtime: self.runtime,
            genres: self.genres.unwrap_or_default(),
            keywords: self.keywords.map(|k| k.keywords).unwrap_or_default(),
            credits: Credits {
                cast: credits
                    .cast
                    .unwrap_or_default()
                    .into_iter()
                    .map(|member| CastMember {
                        id: member.id,
                        name: member.name,
                        character: member.character,
                    })
                    .collect(),
                crew: credits
                    .crew
                    .unwrap_or_default()
                    .into_iter()
                    .map(|member| CrewMember {
                        id: member.id,
                        name: member.name,
                        job: member.job,
                    })
                    .collect(),
            },
            belongs_to_collection: self.belongs_to_collection,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct TmdbCredits {
    cast: Option<Vec<TmdbCast>>,
    crew: Option<Vec<TmdbCrew>>,
}

#[derive(Debug, Deserialize)]
struct TmdbCast {
    id: PersonId,
    name: String,
    character: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbCrew {
    id: PersonId,
    name: String,
    job: Option<String>,
}

/// `append_to_response=keywords` nests the list one level down
#[derive(Debug, Deserialize)]
struct TmdbKeywords {
    #[serde(default)]
    keywords: Vec<Keyword>,
}

#[derive(Debug, Deserialize)]
struct TmdbCollection {
    #[serde(default)]
    parts: Vec<TmdbListMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbPersonCredits {
    #[serde(default)]
    crew: Vec<TmdbPersonCrewCredit>,
}

#[derive(Debug, Deserialize)]
struct TmdbPersonCrewCredit {
    #[serde(flatten)]
    movie: TmdbListMovie,
    job: Option<String>,
}

impl TmdbPersonCredits {
    /// Movies with a "Director" credit, first occurrence of each id.
    fn directed(self) -> Vec<MovieSummary> {
        let mut seen = HashSet::new();
        self.crew
            .into_iter()
            .filter(|credit| credit.job.as_deref() == Some("Director"))
            .filter(|credit| seen.insert(credit.movie.id))
            .map(|credit| credit.movie.into_summary())
            .collect()
    }
}
