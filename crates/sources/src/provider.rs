//! The metadata provider abstraction.
//!
//! A `MovieProvider` answers the questions the recommendation flow
//! asks of an external catalog. Implementations: [`crate::TmdbProvider`]
//! (live HTTP) and [`crate::SnapshotProvider`] (offline JSON snapshot).

use crate::error::Result;
use async_trait::async_trait;
use catalog::{CollectionId, KeywordId, MovieId, MovieMetadata, MovieSummary, PersonId};
use std::sync::Arc;

/// Keyword discovery only returns movies with at least this many votes
pub const DISCOVER_MIN_VOTE_COUNT: u64 = 500;

/// Shared, type-erased provider handle
pub type DynMovieProvider = Arc<dyn MovieProvider>;

#[async_trait]
pub trait MovieProvider: Send + Sync {
    /// Title search. The query is already trimmed and non-empty.
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>>;

    /// Full details including credits and keywords.
    async fn movie_details(&self, movie_id: MovieId) -> Result<MovieMetadata>;

    /// Titles the catalog considers similar to `movie_id`.
    async fn similar_movies(&self, movie_id: MovieId) -> Result<Vec<MovieSummary>>;

    /// Titles the catalog recommends alongside `movie_id`.
    async fn recommended_movies(&self, movie_id: MovieId) -> Result<Vec<MovieSummary>>;

    /// Films credited to `person_id` as director.
    async fn director_filmography(&self, person_id: PersonId) -> Result<Vec<MovieSummary>>;

    /// Every part of a collection (franchise), the queried movie included.
    async fn collection_movies(&self, collection_id: CollectionId) -> Result<Vec<MovieSummary>>;

    /// Well-known movies tagged with any of `keyword_ids`, most-voted first.
    ///
    /// Only movies with at least [`DISCOVER_MIN_VOTE_COUNT`] votes qualify.
    async fn discover_by_keywords(&self, keyword_ids: &[KeywordId]) -> Result<Vec<MovieSummary>>;
}
