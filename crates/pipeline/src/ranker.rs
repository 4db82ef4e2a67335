//! # Ranker
//!
//! Ties the ranking core together for one request:
//! 1. Score every candidate against the reference (`PairwiseScorer`)
//! 2. Select a diverse, director-capped subset (`DiversitySelector`)
//! 3. Project the picks onto the public `Recommendation` shape
//!
//! A single `rank` call is synchronous and single-threaded. `rank_batch`
//! runs independent requests in parallel with rayon; each request still
//! ranks on one thread.

use crate::config::RankingConfig;
use crate::diversity::DiversitySelector;
use crate::scorer::{PairwiseScorer, ScoredCandidate};
use catalog::{ExtractedMovie, MovieId, PersonId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

/// One ranked result. Field names are part of the public response contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    /// Calibrated percent match in [0, 99.4], one decimal
    pub similarity_score: f64,
    pub match_reason: String,
    pub director_id: Option<PersonId>,
}

impl From<ScoredCandidate<'_>> for Recommendation {
    fn from(candidate: ScoredCandidate<'_>) -> Self {
        let movie = candidate.movie;
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            release_date: movie.release_date.clone(),
            vote_average: movie.vote_average,
            similarity_score: candidate.similarity_score,
            match_reason: candidate.match_reason,
            director_id: movie.director_id(),
        }
    }
}

/// A reference movie and its candidate pool, ranked as one unit in batch mode.
#[derive(Debug, Clone)]
pub struct RankingJob {
    pub reference: ExtractedMovie,
    pub candidates: Vec<ExtractedMovie>,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub reference_id: MovieId,
    pub candidate_count: usize,
    pub results: Vec<Recommendation>,
}

#[derive(Clone)]
pub struct Ranker {
    scorer: Arc<PairwiseScorer>,
    selector: DiversitySelector,
}

impl Ranker {
    pub fn new(config: RankingConfig) -> Self {
        let config = Arc::new(config);
        let selector = DiversitySelector::new(config.selection.clone());
        Self {
            scorer: Arc::new(PairwiseScorer::new(config)),
            selector,
        }
    }

    pub fn config(&self) -> &RankingConfig {
        self.scorer.config()
    }

    /// Rank a candidate pool against a reference movie.
    ///
    /// Never fails: an empty result means nothing qualified.
    #[instrument(skip(self, reference, candidates), fields(movie_id = reference.id, pool = candidates.len()))]
    pub fn rank(&self, reference: &ExtractedMovie, candidates: &[ExtractedMovie]) -> Vec<Recommendation> {
        let start = Instant::now();

        let scored = self.scorer.score_pool(reference, candidates);
        let accepted = scored.len();
        let selected = self.selector.select(reference.id, scored);

        debug!(
            "Ranked {} candidates: {} accepted, {} selected in {:.2?}",
            candidates.len(),
            accepted,
            selected.len(),
            start.elapsed()
        );

        selected.into_iter().map(Recommendation::from).collect()
    }

    /// Rank many independent requests in parallel, preserving job order.
    pub fn rank_batch(&self, jobs: &[RankingJob]) -> Vec<BatchOutcome> {
        jobs.par_iter()
            .map(|job| BatchOutcome {
                reference_id: job.reference.id,
                candidate_count: job.candidates.len(),
                results: self.rank(&job.reference, &job.candidates),
            })
            .collect()
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}
