//! Filter to drop obscure different-director candidates.
//!
//! Movies with very few votes have unreliable ratings and metadata.
//! Same-director candidates are exempt.

use crate::signals::ScoringSignals;
use crate::traits::Filter;

/// Removes different-director candidates below a vote count floor.
pub struct MinimumVoteCountFilter {
    min_votes: u64,
}

impl MinimumVoteCountFilter {
    /// Create a new MinimumVoteCountFilter.
    ///
    /// # Arguments
    /// * `min_votes` - Minimum candidate vote count (typically 35)
    pub fn new(min_votes: u64) -> Self {
        Self { min_votes }
    }
}

impl Filter for MinimumVoteCountFilter {
    fn name(&self) -> &str {
        "MinimumVoteCountFilter"
    }

    fn accepts(&self, signals: &ScoringSignals) -> bool {
        signals.same_director || signals.candidate_vote_count >= self.min_votes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_vote_count_filter() {
        let filter = MinimumVoteCountFilter::new(35);

        let obscure = ScoringSignals {
            genre: 1.0,
            keyword: 1.0,
            candidate_vote_count: 34,
            ..ScoringSignals::blank()
        };
        assert!(!filter.accepts(&obscure));

        let at_floor = ScoringSignals {
            candidate_vote_count: 35,
            ..ScoringSignals::blank()
        };
        assert!(filter.accepts(&at_floor));

        let same_director = ScoringSignals {
            same_director: true,
            candidate_vote_count: 0,
            ..ScoringSignals::blank()
        };
        assert!(filter.accepts(&same_director));
    }
}
