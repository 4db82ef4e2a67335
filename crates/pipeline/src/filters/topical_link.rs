//! Filter requiring a topical link between different-director pairs.
//!
//! A shared director is a strong enough prior on its own. Otherwise the
//! candidate must share at least a little genre, keyword or cast overlap.

use crate::config::FilterThresholds;
use crate::signals::ScoringSignals;
use crate::traits::Filter;

/// Rejects different-director candidates with no non-trivial topical overlap.
///
/// ## Algorithm
/// Accept if same director, or genre >= min_genre, or keyword >= min_keyword,
/// or cast >= min_cast.
pub struct TopicalLinkFilter {
    min_genre: f64,
    min_keyword: f64,
    min_cast: f64,
}

impl TopicalLinkFilter {
    /// Create a new TopicalLinkFilter.
    ///
    /// # Arguments
    /// * `min_genre` - Minimum genre Jaccard (typically 0.1)
    /// * `min_keyword` - Minimum keyword Jaccard (typically 0.1)
    /// * `min_cast` - Minimum weighted cast overlap (typically 0.2)
    pub fn new(min_genre: f64, min_keyword: f64, min_cast: f64) -> Self {
        Self {
            min_genre,
            min_keyword,
            min_cast,
        }
    }

    pub fn from_thresholds(thresholds: &FilterThresholds) -> Self {
        Self::new(
            thresholds.min_genre_link,
            thresholds.min_keyword_link,
            thresholds.min_cast_link,
        )
    }
}

impl Filter for TopicalLinkFilter {
    fn name(&self) -> &str {
        "TopicalLinkFilter"
    }

    fn accepts(&self, signals: &ScoringSignals) -> bool {
        signals.same_director
            || signals.genre >= self.min_genre
            || signals.keyword >= self.min_keyword
            || signals.cast >= self.min_cast
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topical_link_filter() {
        let filter = TopicalLinkFilter::from_thresholds(&FilterThresholds::default());

        // nothing in common
        assert!(!filter.accepts(&ScoringSignals::blank()));

        // director alone is enough
        let director_only = ScoringSignals {
            same_director: true,
            ..ScoringSignals::blank()
        };
        assert!(filter.accepts(&director_only));

        // any one topical link is enough
        for signals in [
            ScoringSignals { genre: 0.1, ..ScoringSignals::blank() },
            ScoringSignals { keyword: 0.25, ..ScoringSignals::blank() },
            ScoringSignals { cast: 0.2, ..ScoringSignals::blank() },
        ] {
            assert!(filter.accepts(&signals));
        }

        // weak cast overlap alone is not
        let weak_cast = ScoringSignals {
            cast: 0.19,
            genre: 0.09,
            ..ScoringSignals::blank()
        };
        assert!(!filter.accepts(&weak_cast));
    }
}
