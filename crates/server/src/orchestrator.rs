//! # Recommendation Orchestrator
//!
//! This module coordinates one "more like this" request:
//! 1. Fetch the reference movie's details (errors propagate)
//! 2. Gather candidates (collection, director filmography, similar,
//!    recommended, keyword discovery)
//! 3. Fetch every candidate's details concurrently; a failure drops that
//!    candidate, but a pool where every fetch failed is an upstream error
//! 4. Drop unreleased films, extract feature records
//! 5. Rank on a blocking thread (scoring, calibration, MMR selection)
//! 6. Return the base movie and the ranked results

use std::time::Instant;

use catalog::{extract_movie, ExtractedMovie, MovieId, MovieMetadata, MovieSummary};
use chrono::Utc;
use futures::future::join_all;
use pipeline::{Ranker, RankingConfig, Recommendation};
use serde::{Deserialize, Serialize};
use sources::{is_released, CandidateGatherer, DynMovieProvider, ProviderError};
use tracing::{info, instrument, warn};

use crate::error::{ServiceError, ServiceResult};

/// Identity of the movie the results were ranked against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseMovie {
    pub id: MovieId,
    pub title: String,
}

/// Response body of the recommendations endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub base_movie: BaseMovie,
    pub results: Vec<Recommendation>,
}

/// Main orchestrator that coordinates the recommendation flow
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    provider: DynMovieProvider,
    gatherer: CandidateGatherer,
    ranker: Ranker,
}

impl RecommendationOrchestrator {
    pub fn new(provider: DynMovieProvider, ranking: RankingConfig) -> Self {
        Self {
            gatherer: CandidateGatherer::new(provider.clone()),
            provider,
            ranker: Ranker::new(ranking),
        }
    }

    /// Configure the candidate pool cap (default: 45)
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.gatherer = self.gatherer.with_max_candidates(max);
        self
    }

    /// Configure how many same-director films join the pool (default: 10)
    pub fn with_filmography_limit(mut self, limit: usize) -> Self {
        self.gatherer = self.gatherer.with_filmography_limit(limit);
        self
    }

    pub fn provider(&self) -> &DynMovieProvider {
        &self.provider
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Main entry point: ranked recommendations for a reference movie
    #[instrument(skip(self))]
    pub async fn recommend(&self, movie_id: MovieId) -> ServiceResult<RecommendationSet> {
        let start_time = Instant::now();

        let base = self.provider.movie_details(movie_id).await?;
        let summaries = self.gatherer.gather(&base).await?;
        info!("Gathered {} candidates for movie {}", summaries.len(), movie_id);

        let mut candidates = self.fetch_candidate_details(&summaries).await?;
        info!(
            "Fetched details for {} of {} candidates",
            candidates.len(),
            summaries.len()
        );

        let today = Utc::now().date_naive();
        let fetched = candidates.len();
        candidates.retain(|movie| is_released(movie, today));
        if candidates.len() < fetched {
            info!("Skipped {} unreleased candidates", fetched - candidates.len());
        }

        let results = self.rank(&base, candidates).await?;
        info!(
            "Ranked {} recommendations for movie {} in {:.2?}",
            results.len(),
            movie_id,
            start_time.elapsed()
        );

        Ok(RecommendationSet {
            base_movie: BaseMovie {
                id: base.id,
                title: base.title,
            },
            results,
        })
    }

    /// Fetch all candidate details concurrently, keeping pool order.
    ///
    /// A failed fetch drops that candidate only. If every fetch failed and
    /// at least one failure is not a plain "not found", the first such
    /// error is returned instead of an empty pool.
    async fn fetch_candidate_details(
        &self,
        summaries: &[MovieSummary],
    ) -> ServiceResult<Vec<MovieMetadata>> {
        let fetches = summaries
            .iter()
            .map(|summary| self.provider.movie_details(summary.id));
        let results = join_all(fetches).await;

        let mut candidates = Vec::with_capacity(summaries.len());
        let mut first_failure: Option<ProviderError> = None;
        for (summary, result) in summaries.iter().zip(results) {
            match result {
                Ok(details) => candidates.push(details),
                Err(e) => {
                    warn!("Dropping candidate {}: {}", summary.id, e);
                    if first_failure.is_none() && !e.is_not_found() {
                        first_failure = Some(e);
                    }
                }
            }
        }

        match first_failure {
            Some(e) if candidates.is_empty() => Err(e.into()),
            _ => Ok(candidates),
        }
    }

    /// Extract features and run the ranking core off the async runtime
    async fn rank(
        &self,
        base: &MovieMetadata,
        candidates: Vec<MovieMetadata>,
    ) -> ServiceResult<Vec<Recommendation>> {
        let reference = extract_movie(base);
        let pool: Vec<ExtractedMovie> = candidates.iter().map(extract_movie).collect();
        let ranker = self.ranker.clone();

        tokio::task::spawn_blocking(move || ranker.rank(&reference, &pool))
            .await
            .map_err(|e| ServiceError::internal("RANKING_FAILED", format!("Ranking task failed: {e}")))
    }
}
