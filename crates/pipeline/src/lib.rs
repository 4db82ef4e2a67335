//! Ranking core: scores candidate movies against a reference movie and
//! selects a diverse, explainable top list.
//!
//! This crate provides:
//! - `RankingConfig` holding every weight, threshold and cap
//! - `ScoringSignals` computed per (reference, candidate) pair
//! - Filter trait and implementations for hard rejection rules
//! - FilterPipeline for composing filters
//! - `PairwiseScorer`, `Calibrator` and the reason builder
//! - `DiversitySelector` (greedy MMR with a per-director cap)
//! - `Ranker`, the single entry point used by the service and CLI
//!
//! ## Architecture
//! A ranking request flows through these stages:
//! 1. Signals are computed for each candidate
//! 2. Filters drop candidates with no topical link or too few votes
//! 3. Surviving pairs get a weighted raw score, calibrated to a percentage
//! 4. The selector orders accepted candidates by marginal relevance
//!
//! Nothing here performs I/O; feature records come from the `catalog` crate.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{Ranker, RankingConfig};
//! use catalog::extract_movie;
//!
//! let ranker = Ranker::new(RankingConfig::default().with_max_results(10));
//! let reference = extract_movie(&base_details);
//! let pool: Vec<_> = candidate_details.iter().map(extract_movie).collect();
//!
//! for rec in ranker.rank(&reference, &pool) {
//!     println!("{} {:.1}% {}", rec.title, rec.similarity_score, rec.match_reason);
//! }
//! ```

pub mod calibrate;
pub mod config;
pub mod diversity;
pub mod filter_pipeline;
pub mod filters;
pub mod ranker;
pub mod reasons;
pub mod scorer;
pub mod signals;
pub mod traits;

// Re-export main types
pub use calibrate::Calibrator;
pub use config::{
    Adjustments, CalibrationParams, FilterThresholds, RankingConfig, ReasonThresholds,
    SelectionParams, SignalParams, SignalWeights,
};
pub use diversity::DiversitySelector;
pub use filter_pipeline::FilterPipeline;
pub use ranker::{BatchOutcome, Ranker, RankingJob, Recommendation};
pub use reasons::{build_reason, ranked_reasons, Reason};
pub use scorer::{PairScore, PairwiseScorer, ScoredCandidate};
pub use signals::ScoringSignals;
pub use traits::Filter;
