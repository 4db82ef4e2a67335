//! Ranking configuration.
//!
//! Every weight, threshold, cap and calibration constant used by the
//! ranking core lives in one `RankingConfig` value. It is built once,
//! wrapped in an `Arc`, and handed to the scorer, calibrator, reason
//! builder and selector. Tests override individual knobs with the
//! `with_*` builders instead of touching any global state.
//!
//! All sections are `#[serde(default)]`, so a JSON override file only
//! needs the keys it changes:
//!
//! ```json
//! { "selection": { "max_results": 10 }, "filters": { "min_vote_count": 50 } }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Weight of each signal in the raw score. Defaults sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub genre: f64,
    pub keyword: f64,
    pub cast: f64,
    pub director: f64,
    pub year: f64,
    pub runtime: f64,
    pub rating: f64,
    pub confidence: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            genre: 0.30,
            keyword: 0.20,
            cast: 0.14,
            director: 0.12,
            year: 0.09,
            runtime: 0.07,
            rating: 0.05,
            confidence: 0.03,
        }
    }
}

impl SignalWeights {
    pub fn total(&self) -> f64 {
        self.genre
            + self.keyword
            + self.cast
            + self.director
            + self.year
            + self.runtime
            + self.rating
            + self.confidence
    }
}

/// Shapes of the per-signal similarity functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    /// Weight of each billing slot of the reference cast, top billed first
    pub cast_slot_weights: Vec<f64>,
    /// Year difference at which year similarity reaches 0
    pub year_span: f64,
    /// Year similarity when either year is unknown
    pub year_neutral: f64,
    /// Runtime difference (minutes) at which runtime similarity reaches 0
    pub runtime_span: f64,
    pub runtime_neutral: f64,
    /// Vote average difference at which rating similarity reaches 0
    pub rating_span: f64,
    /// `log10(votes + 1)` value that maps to full confidence
    pub confidence_log_span: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            cast_slot_weights: vec![1.0, 0.8, 0.6, 0.45, 0.3],
            year_span: 18.0,
            year_neutral: 0.45,
            runtime_span: 70.0,
            runtime_neutral: 0.55,
            rating_span: 3.5,
            confidence_log_span: 4.0,
        }
    }
}

/// Hard filters applied before weighting, plus the post-score floors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterThresholds {
    /// Topical link: a different-director candidate needs at least one of these
    pub min_genre_link: f64,
    pub min_keyword_link: f64,
    pub min_cast_link: f64,
    /// Minimum votes for a different-director candidate
    pub min_vote_count: u64,
    /// Minimum raw score after adjustments
    pub min_raw_score: f64,
    /// Minimum calibrated percentage for same-director candidates
    pub min_same_director_percent: f64,
    /// Minimum calibrated percentage for everyone else
    pub min_other_director_percent: f64,
}

impl Default for FilterThresholds {
    fn default() -> Self {
        Self {
            min_genre_link: 0.1,
            min_keyword_link: 0.1,
            min_cast_link: 0.2,
            min_vote_count: 35,
            min_raw_score: 0.34,
            min_same_director_percent: 40.0,
            min_other_director_percent: 46.0,
        }
    }
}

/// Bonuses and penalties applied after the weighted sum, before clamping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub director_genre_bonus: f64,
    /// Genre score needed for the same-director bonus
    pub director_bonus_min_genre: f64,
    pub keyword_bonus: f64,
    pub keyword_bonus_min: f64,
    /// Subtracted when directors differ and genres are fully disjoint
    pub no_genre_penalty: f64,
    pub era_gap_penalty: f64,
    /// Known year gap above which `era_gap_penalty` applies
    pub era_gap_years: u32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            director_genre_bonus: 0.04,
            director_bonus_min_genre: 0.2,
            keyword_bonus: 0.03,
            keyword_bonus_min: 0.35,
            no_genre_penalty: 0.10,
            era_gap_penalty: 0.04,
            era_gap_years: 25,
        }
    }
}

/// Logistic raw score -> percentage mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationParams {
    pub center: f64,
    pub scale: f64,
    /// Percentage at logistic 0
    pub floor: f64,
    /// Percentage range covered by the logistic
    pub span: f64,
    pub ceiling: f64,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            center: 0.52,
            scale: 0.10,
            floor: 12.0,
            span: 86.0,
            ceiling: 99.4,
        }
    }
}

/// Minimum signal values for a reason label to qualify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonThresholds {
    pub keyword: f64,
    pub genre: f64,
    pub cast: f64,
    pub year: f64,
    pub runtime: f64,
}

impl Default for ReasonThresholds {
    fn default() -> Self {
        Self {
            keyword: 0.18,
            genre: 0.18,
            cast: 0.2,
            year: 0.55,
            runtime: 0.65,
        }
    }
}

/// Greedy MMR selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionParams {
    pub max_results: usize,
    /// Maximum selections sharing one (known) director
    pub director_cap: usize,
    pub relevance_weight: f64,
    pub redundancy_weight: f64,
    /// Candidate-candidate similarity mix
    pub same_director_similarity: f64,
    pub genre_similarity: f64,
    pub era_similarity: f64,
    pub era_span: f64,
    pub era_neutral: f64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            max_results: 18,
            director_cap: 2,
            relevance_weight: 0.78,
            redundancy_weight: 0.22,
            same_director_similarity: 0.5,
            genre_similarity: 0.35,
            era_similarity: 0.15,
            era_span: 20.0,
            era_neutral: 0.35,
        }
    }
}

/// Complete configuration of the ranking core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub weights: SignalWeights,
    pub signals: SignalParams,
    pub filters: FilterThresholds,
    pub adjustments: Adjustments,
    pub calibration: CalibrationParams,
    pub reasons: ReasonThresholds,
    pub selection: SelectionParams,
}

impl RankingConfig {
    /// Parse a (possibly partial) JSON override.
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Load a (possibly partial) JSON override from disk.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ranking config {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Failed to parse ranking config {}", path.display()))
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.selection.max_results = max_results;
        self
    }

    pub fn with_director_cap(mut self, cap: usize) -> Self {
        self.selection.director_cap = cap;
        self
    }

    pub fn with_min_vote_count(mut self, min_votes: u64) -> Self {
        self.filters.min_vote_count = min_votes;
        self
    }

    pub fn with_weights(mut self, weights: SignalWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_filters(mut self, filters: FilterThresholds) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_selection(mut self, selection: SelectionParams) -> Self {
        self.selection = selection;
        self
    }
}
