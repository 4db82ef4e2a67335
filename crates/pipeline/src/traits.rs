//! Core traits for the scoring pipeline.
//!
//! This module defines the Filter trait that lets hard rejection rules
//! be composed and extended independently of the weighted scorer.

use crate::signals::ScoringSignals;

/// A hard rule that can reject a (reference, candidate) pair outright.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` lets a scorer holding filters be shared across threads
/// - Filters only read the precomputed signals, so they are pure and cheap
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether the pair may proceed to weighting.
    fn accepts(&self, signals: &ScoringSignals) -> bool;
}
