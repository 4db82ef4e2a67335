//! The FilterPipeline orchestrates multiple hard filters.
//!
//! This module provides the FilterPipeline struct that chains filters
//! together using the builder pattern. The scorer runs it on every pair
//! before computing the weighted score.

use crate::config::FilterThresholds;
use crate::filters::{MinimumVoteCountFilter, TopicalLinkFilter};
use crate::signals::ScoringSignals;
use crate::traits::Filter;
use tracing::trace;

/// Chains multiple filters together; a pair passes only if every filter accepts it.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(TopicalLinkFilter::new(0.1, 0.1, 0.2))
///     .add_filter(MinimumVoteCountFilter::new(35));
///
/// if pipeline.accepts(&signals) { /* weight it */ }
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The standard hard filters, in evaluation order.
    pub fn from_thresholds(thresholds: &FilterThresholds) -> Self {
        Self::new()
            .add_filter(TopicalLinkFilter::from_thresholds(thresholds))
            .add_filter(MinimumVoteCountFilter::new(thresholds.min_vote_count))
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Name of the first filter that rejects the pair, if any.
    ///
    /// Filters run in insertion order and evaluation stops at the first
    /// rejection.
    pub fn first_rejection(&self, signals: &ScoringSignals) -> Option<&str> {
        self.filters
            .iter()
            .find(|filter| !filter.accepts(signals))
            .map(|filter| filter.name())
    }

    /// Whether every filter accepts the pair.
    pub fn accepts(&self, signals: &ScoringSignals) -> bool {
        match self.first_rejection(signals) {
            Some(name) => {
                trace!("Rejected by filter: {}", name);
                false
            }
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
