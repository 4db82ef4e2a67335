//! Per-pair similarity signals.
//!
//! `ScoringSignals` is the ephemeral record computed for one
//! (reference, candidate) pair. Every sub-score is in [0, 1]; director
//! match is a boolean. Raw year/runtime gaps are kept for filter and
//! reason decisions.

use crate::config::SignalParams;
use catalog::{FeatureRecord, PersonId};
use std::collections::HashSet;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSignals {
    pub genre: f64,
    pub keyword: f64,
    pub cast: f64,
    pub same_director: bool,
    pub year: f64,
    pub runtime: f64,
    pub rating: f64,
    pub confidence: f64,
    /// `None` when either release year is unknown
    pub year_gap: Option<u32>,
    /// `None` when either runtime is unknown
    pub runtime_gap: Option<u32>,
    pub candidate_vote_count: u64,
}

impl ScoringSignals {
    /// Compute all signals for one pair.
    pub fn compute(
        reference: &FeatureRecord,
        candidate: &FeatureRecord,
        params: &SignalParams,
    ) -> Self {
        let (year, year_gap) = closeness(
            reference.release_year.map(i64::from),
            candidate.release_year.map(i64::from),
            params.year_span,
            params.year_neutral,
        );
        let (runtime, runtime_gap) = closeness(
            reference.runtime_minutes.map(i64::from),
            candidate.runtime_minutes.map(i64::from),
            params.runtime_span,
            params.runtime_neutral,
        );

        let rating_diff = (reference.vote_average - candidate.vote_average).abs();
        let confidence =
            ((candidate.vote_count as f64 + 1.0).log10() / params.confidence_log_span).clamp(0.0, 1.0);

        Self {
            genre: jaccard(&reference.genre_ids, &candidate.genre_ids),
            keyword: jaccard(&reference.keyword_ids, &candidate.keyword_ids),
            cast: position_weighted_overlap(
                &reference.cast_ids,
                &candidate.cast_ids,
                &params.cast_slot_weights,
            ),
            same_director: same_director(reference.director_id, candidate.director_id),
            year,
            runtime,
            rating: (1.0 - rating_diff / params.rating_span).clamp(0.0, 1.0),
            confidence,
            year_gap,
            runtime_gap,
            candidate_vote_count: candidate.vote_count,
        }
    }
}

#[cfg(test)]
impl ScoringSignals {
    /// All-zero signals for a different-director candidate with plenty of votes.
    pub(crate) fn blank() -> Self {
        Self {
            genre: 0.0,
            keyword: 0.0,
            cast: 0.0,
            same_director: false,
            year: 0.0,
            runtime: 0.0,
            rating: 0.0,
            confidence: 0.0,
            year_gap: None,
            runtime_gap: None,
            candidate_vote_count: 1000,
        }
    }
}

/// Jaccard similarity = |intersection| / |union|.
///
/// 0.0 if either set is empty.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    intersection / union
}

/// Billing-position weighted cast overlap.
///
/// Each reference slot `i` carries `slot_weights[i]`. The score is the
/// weight of reference members also in the candidate cast, divided by
/// the weight of all reference slots present. Slots beyond the weight
/// table don't count.
pub fn position_weighted_overlap(
    reference: &[PersonId],
    candidate: &[PersonId],
    slot_weights: &[f64],
) -> f64 {
    if reference.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let (shared, total) = reference
        .iter()
        .zip(slot_weights)
        .fold((0.0, 0.0), |(shared, total), (person, &weight)| {
            if candidate.contains(person) {
                (shared + weight, total + weight)
            } else {
                (shared, total + weight)
            }
        });

    if total == 0.0 { 0.0 } else { shared / total }
}

/// Both directors known and equal.
pub fn same_director(a: Option<PersonId>, b: Option<PersonId>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// Linear closeness `1 - |a - b| / span`, clamped to [0, 1].
///
/// Returns `(neutral, None)` when either side is unknown, otherwise the
/// score and the absolute gap.
pub fn closeness(a: Option<i64>, b: Option<i64>, span: f64, neutral: f64) -> (f64, Option<u32>) {
    match (a, b) {
        (Some(a), Some(b)) => {
            let gap = a.abs_diff(b);
            let score = (1.0 - gap as f64 / span).clamp(0.0, 1.0);
            (score, Some(u32::try_from(gap).unwrap_or(u32::MAX)))
        }
        _ => (neutral, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u64]) -> HashSet<u64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_jaccard() {
        assert_eq!(jaccard(&set(&[1, 2, 3]), &set(&[1, 2, 3])), 1.0);
        assert!((jaccard(&set(&[28, 878, 53]), &set(&[28, 878])) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(jaccard(&set(&[1]), &set(&[2])), 0.0);
        assert_eq!(jaccard(&set(&[]), &set(&[1])), 0.0);
        assert_eq!(jaccard::<u64>(&set(&[]), &set(&[])), 0.0);
    }

    #[test]
    fn test_cast_overlap_weights_billing_order() {
        let weights = SignalParams::default().cast_slot_weights;
        let reference = [1, 2, 3, 4, 5];

        assert_eq!(position_weighted_overlap(&reference, &[5, 4, 3, 2, 1], &weights), 1.0);
        // lead actor shared
        let lead = position_weighted_overlap(&reference, &[1, 99], &weights);
        assert!((lead - 1.0 / 3.15).abs() < 1e-12);
        // fifth-billed actor shared counts for less
        let fifth = position_weighted_overlap(&reference, &[5, 99], &weights);
        assert!((fifth - 0.3 / 3.15).abs() < 1e-12);
        assert!(lead > fifth);
    }

    #[test]
    fn test_cast_overlap_short_reference_cast() {
        let weights = SignalParams::default().cast_slot_weights;
        // denominator covers only the slots the reference fills
        let score = position_weighted_overlap(&[7, 8], &[8], &weights);
        assert!((score - 0.8 / 1.8).abs() < 1e-12);
        assert_eq!(position_weighted_overlap(&[], &[1], &weights), 0.0);
        assert_eq!(position_weighted_overlap(&[1], &[], &weights), 0.0);
    }

    #[test]
    fn test_same_director() {
        assert!(same_director(Some(9), Some(9)));
        assert!(!same_director(Some(9), Some(10)));
        assert!(!same_director(None, None));
        assert!(!same_director(Some(9), None));
    }

    #[test]
    fn test_closeness() {
        assert_eq!(closeness(Some(2010), Some(2010), 18.0, 0.45), (1.0, Some(0)));
        let (score, gap) = closeness(Some(2010), Some(2001), 18.0, 0.45);
        assert_eq!(gap, Some(9));
        assert!((score - 0.5).abs() < 1e-12);
        assert_eq!(closeness(Some(1950), Some(2010), 18.0, 0.45), (0.0, Some(60)));
        assert_eq!(closeness(None, Some(2010), 18.0, 0.45), (0.45, None));
    }

    #[test]
    fn test_compute_identical_records() {
        let record = FeatureRecord {
            genre_ids: set(&[28, 878]),
            director_id: Some(99),
            cast_ids: vec![1, 2, 3],
            vote_average: 8.0,
            vote_count: 9999,
            release_year: Some(2010),
            runtime_minutes: Some(120),
            keyword_ids: set(&[10]),
        };

        let signals = ScoringSignals::compute(&record, &record, &SignalParams::default());

        assert_eq!(signals.genre, 1.0);
        assert_eq!(signals.keyword, 1.0);
        assert_eq!(signals.cast, 1.0);
        assert!(signals.same_director);
        assert_eq!(signals.year, 1.0);
        assert_eq!(signals.runtime, 1.0);
        assert_eq!(signals.rating, 1.0);
        assert!((signals.confidence - 1.0).abs() < 1e-9);
        assert_eq!(signals.year_gap, Some(0));
        assert_eq!(signals.candidate_vote_count, 9999);
    }

    #[test]
    fn test_compute_unknown_year_and_runtime_use_neutral() {
        let reference = FeatureRecord {
            release_year: Some(2010),
            runtime_minutes: None,
            ..FeatureRecord::default()
        };
        let candidate = FeatureRecord::default();

        let signals = ScoringSignals::compute(&reference, &candidate, &SignalParams::default());

        assert_eq!(signals.year, 0.45);
        assert_eq!(signals.year_gap, None);
        assert_eq!(signals.runtime, 0.55);
        assert_eq!(signals.runtime_gap, None);
        assert_eq!(signals.confidence, 0.0);
    }
}
