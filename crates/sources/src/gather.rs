//! Candidate gathering for a reference movie.
//!
//! ## Algorithm
//! 1. Fetch every source concurrently:
//!    - collection (franchise) parts, when the reference belongs to one
//!    - the director's filmography, when the director is known; most-voted
//!      films only
//!    - the similar and recommended lists
//!    - keyword discovery on the reference's leading keywords
//! 2. Similar/recommended failures propagate; the other sources are
//!    logged and tolerated
//! 3. Concatenate in that order so franchise and director films keep
//!    their share under the cap; drop the reference itself
//! 4. Deduplicate by id, keeping the entry with the higher vote count
//!    at the position of the first occurrence
//! 5. Cap the pool size
//!
//! Unreleased films are removed later, once full details (and so release
//! dates) are known: see [`is_released`].

use crate::error::Result;
use crate::provider::DynMovieProvider;
use catalog::{KeywordId, MovieId, MovieMetadata, MovieSummary};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

pub const DEFAULT_MAX_CANDIDATES: usize = 45;
pub const DEFAULT_FILMOGRAPHY_LIMIT: usize = 10;
pub const DEFAULT_DISCOVERY_LIMIT: usize = 15;

/// Leading reference keywords used for discovery
pub const DISCOVERY_KEYWORDS: usize = 5;

#[derive(Clone)]
pub struct CandidateGatherer {
    provider: DynMovieProvider,
    max_candidates: usize,
    filmography_limit: usize,
    discovery_limit: usize,
}

impl CandidateGatherer {
    pub fn new(provider: DynMovieProvider) -> Self {
        Self {
            provider,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            filmography_limit: DEFAULT_FILMOGRAPHY_LIMIT,
            discovery_limit: DEFAULT_DISCOVERY_LIMIT,
        }
    }

    /// Configure the pool size cap (default: 45)
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    /// Configure how many director films join the pool (default: 10)
    pub fn with_filmography_limit(mut self, limit: usize) -> Self {
        self.filmography_limit = limit;
        self
    }

    /// Configure how many keyword-discovered films join the pool (default: 15)
    pub fn with_discovery_limit(mut self, limit: usize) -> Self {
        self.discovery_limit = limit;
        self
    }

    /// Candidate summaries for `reference`, deduplicated and capped.
    #[instrument(skip(self, reference), fields(movie_id = reference.id))]
    pub async fn gather(&self, reference: &MovieMetadata) -> Result<Vec<MovieSummary>> {
        let (similar, recommended, collection, filmography, discovered) = tokio::join!(
            self.provider.similar_movies(reference.id),
            self.provider.recommended_movies(reference.id),
            self.collection(reference),
            self.filmography(reference),
            self.discovered(reference),
        );
        let similar = similar?;
        let recommended = recommended?;

        debug!(
            "Sources: collection={}, filmography={}, similar={}, recommended={}, discovered={}",
            collection.len(),
            filmography.len(),
            similar.len(),
            recommended.len(),
            discovered.len()
        );

        let mut pool = merge_candidates(
            reference.id,
            collection
                .into_iter()
                .chain(filmography)
                .chain(similar)
                .chain(recommended)
                .chain(discovered),
        );
        pool.truncate(self.max_candidates);

        debug!("Gathered {} candidates", pool.len());
        Ok(pool)
    }

    async fn collection(&self, reference: &MovieMetadata) -> Vec<MovieSummary> {
        let Some(collection) = &reference.belongs_to_collection else {
            return Vec::new();
        };

        match self.provider.collection_movies(collection.id).await {
            Ok(parts) => parts,
            Err(e) => {
                warn!("Collection lookup failed for {}: {}", collection.id, e);
                Vec::new()
            }
        }
    }

    async fn filmography(&self, reference: &MovieMetadata) -> Vec<MovieSummary> {
        if self.filmography_limit == 0 {
            return Vec::new();
        }
        let Some(director) = reference.credits.director() else {
            return Vec::new();
        };

        match self.provider.director_filmography(director.id).await {
            Ok(films) => top_by_votes(reference.id, films, self.filmography_limit),
            Err(e) => {
                warn!(
                    "Director filmography lookup failed for person {}: {}",
                    director.id, e
                );
                Vec::new()
            }
        }
    }

    async fn discovered(&self, reference: &MovieMetadata) -> Vec<MovieSummary> {
        let keywords: Vec<KeywordId> = reference
            .keywords
            .iter()
            .take(DISCOVERY_KEYWORDS)
            .map(|keyword| keyword.id)
            .collect();
        if keywords.is_empty() || self.discovery_limit == 0 {
            return Vec::new();
        }

        match self.provider.discover_by_keywords(&keywords).await {
            Ok(mut films) => {
                films.retain(|film| film.id != reference.id);
                films.truncate(self.discovery_limit);
                films
            }
            Err(e) => {
                warn!("Keyword discovery failed for movie {}: {}", reference.id, e);
                Vec::new()
            }
        }
    }
}

/// Most-voted films first, excluding the reference; stable for equal counts.
fn top_by_votes(reference: MovieId, mut films: Vec<MovieSummary>, limit: usize) -> Vec<MovieSummary> {
    films.retain(|film| film.id != reference);
    films.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
    films.truncate(limit);
    films
}

/// Merge source lists in order, skipping the reference and collapsing
/// duplicate ids.
///
/// A later duplicate replaces the kept entry only if it has strictly more
/// votes; the entry keeps the position of the first occurrence.
pub fn merge_candidates(
    reference: MovieId,
    candidates: impl IntoIterator<Item = MovieSummary>,
) -> Vec<MovieSummary> {
    let mut merged: Vec<MovieSummary> = Vec::new();
    let mut positions: HashMap<MovieId, usize> = HashMap::new();

    for candidate in candidates {
        if candidate.id == reference {
            continue;
        }
        match positions.get(&candidate.id) {
            Some(&index) => {
                if candidate.vote_count > merged[index].vote_count {
                    merged[index] = candidate;
                }
            }
            None => {
                positions.insert(candidate.id, merged.len());
                merged.push(candidate);
            }
        }
    }

    merged
}

/// Whether the movie's release date is on or before `today`.
///
/// Movies with a missing or malformed date count as released.
pub fn is_released(movie: &MovieMetadata, today: NaiveDate) -> bool {
    movie
        .release_date
        .as_deref()
        .and_then(|date| NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok())
        .is_none_or(|release| release <= today)
}
