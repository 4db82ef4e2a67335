//! Pairwise scoring of candidates against a reference movie.
//!
//! ## Algorithm
//! 1. Compute `ScoringSignals` for the pair
//! 2. Run the hard filters (topical link, vote count floor)
//! 3. Weighted sum of signals, then bonuses/penalties, clamped to [0, 1]
//! 4. Reject below the raw score floor
//! 5. Calibrate to a percentage; reject below the director-dependent floor
//! 6. Build the match reason
//!
//! Scoring is deterministic and infallible: a candidate that doesn't
//! qualify yields `None`.

use crate::calibrate::Calibrator;
use crate::config::RankingConfig;
use crate::filter_pipeline::FilterPipeline;
use crate::reasons::build_reason;
use crate::signals::ScoringSignals;
use catalog::{ExtractedMovie, FeatureRecord, MovieId, PersonId};
use std::sync::Arc;
use tracing::{debug, trace};

/// Result of scoring one accepted pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    pub raw_score: f64,
    /// Calibrated percentage, one decimal
    pub similarity_score: f64,
    pub match_reason: String,
    pub signals: ScoringSignals,
}

/// An accepted candidate, borrowed from the request's candidate pool.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub movie: &'a ExtractedMovie,
    pub similarity_score: f64,
    pub match_reason: String,
    /// `similarity_score / 100`
    pub relevance: f64,
}

impl<'a> ScoredCandidate<'a> {
    pub fn new(movie: &'a ExtractedMovie, similarity_score: f64, match_reason: String) -> Self {
        Self {
            movie,
            similarity_score,
            match_reason,
            relevance: similarity_score / 100.0,
        }
    }

    pub fn id(&self) -> MovieId {
        self.movie.id
    }

    pub fn director_id(&self) -> Option<PersonId> {
        self.movie.features.director_id
    }

    pub fn features(&self) -> &FeatureRecord {
        &self.movie.features
    }
}

pub struct PairwiseScorer {
    config: Arc<RankingConfig>,
    filters: FilterPipeline,
    calibrator: Calibrator,
}

impl PairwiseScorer {
    pub fn new(config: Arc<RankingConfig>) -> Self {
        let filters = FilterPipeline::from_thresholds(&config.filters);
        let calibrator = Calibrator::new(config.calibration.clone());
        Self {
            config,
            filters,
            calibrator,
        }
    }

    /// Replace the standard hard filters.
    pub fn with_filters(mut self, filters: FilterPipeline) -> Self {
        self.filters = filters;
        self
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Score one candidate against the reference.
    pub fn score(&self, reference: &FeatureRecord, candidate: &FeatureRecord) -> Option<PairScore> {
        let signals = ScoringSignals::compute(reference, candidate, &self.config.signals);
        if !self.filters.accepts(&signals) {
            return None;
        }

        let raw_score = self.raw_score(&signals);
        if raw_score < self.config.filters.min_raw_score {
            trace!("Rejected: raw score {:.3} below floor", raw_score);
            return None;
        }

        let similarity_score = self.calibrator.calibrate(raw_score);
        let floor = if signals.same_director {
            self.config.filters.min_same_director_percent
        } else {
            self.config.filters.min_other_director_percent
        };
        if similarity_score < floor {
            trace!("Rejected: {:.1}% below {:.1}% floor", similarity_score, floor);
            return None;
        }

        Some(PairScore {
            raw_score,
            similarity_score,
            match_reason: build_reason(&signals, &self.config),
            signals,
        })
    }

    /// Weighted signal sum plus adjustments, clamped to [0, 1].
    pub fn raw_score(&self, signals: &ScoringSignals) -> f64 {
        let weights = &self.config.weights;
        let adjustments = &self.config.adjustments;

        let director = if signals.same_director { 1.0 } else { 0.0 };
        let mut raw = signals.genre * weights.genre
            + signals.keyword * weights.keyword
            + signals.cast * weights.cast
            + director * weights.director
            + signals.year * weights.year
            + signals.runtime * weights.runtime
            + signals.rating * weights.rating
            + signals.confidence * weights.confidence;

        if signals.same_director && signals.genre >= adjustments.director_bonus_min_genre {
            raw += adjustments.director_genre_bonus;
        }
        if signals.keyword >= adjustments.keyword_bonus_min {
            raw += adjustments.keyword_bonus;
        }
        if !signals.same_director && signals.genre == 0.0 {
            raw -= adjustments.no_genre_penalty;
        }
        if signals
            .year_gap
            .is_some_and(|gap| gap > adjustments.era_gap_years)
        {
            raw -= adjustments.era_gap_penalty;
        }

        raw.clamp(0.0, 1.0)
    }

    /// Score every candidate in the pool, keeping the accepted ones in pool order.
    ///
    /// A candidate sharing the reference's id is skipped before scoring.
    pub fn score_pool<'a>(
        &self,
        reference: &ExtractedMovie,
        candidates: &'a [ExtractedMovie],
    ) -> Vec<ScoredCandidate<'a>> {
        let scored: Vec<ScoredCandidate<'a>> = candidates
            .iter()
            .filter(|candidate| candidate.id != reference.id)
            .filter_map(|candidate| {
                self.score(&reference.features, &candidate.features)
                    .map(|pair| ScoredCandidate::new(candidate, pair.similarity_score, pair.match_reason))
            })
            .collect();

        debug!(
            "Scored pool for movie {}: {} of {} candidates accepted",
            reference.id,
            scored.len(),
            candidates.len()
        );
        scored
    }
}
