//! Diversity-aware selection using greedy Maximal Marginal Relevance.
//!
//! MMR = relevance_weight × relevance - redundancy_weight × max(sim(candidate, selected))
//!
//! Pure score ordering clusters near-duplicates (five films by one
//! director, all in the same genres). MMR trades a little top-line
//! relevance for breadth, and the per-director cap bounds how many
//! picks any single director can take.

use crate::config::SelectionParams;
use crate::scorer::ScoredCandidate;
use crate::signals::{closeness, jaccard, same_director};
use catalog::{FeatureRecord, MovieId, PersonId};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DiversitySelector {
    params: SelectionParams,
}

impl DiversitySelector {
    pub fn new(params: SelectionParams) -> Self {
        Self { params }
    }

    /// Order and trim the scored pool.
    ///
    /// Returns at most `max_results` candidates, never more than
    /// `director_cap` for any known director. Candidates carrying the
    /// reference id are dropped. Output depends only on the input
    /// contents, not on hash iteration order.
    pub fn select<'a>(
        &self,
        reference: MovieId,
        scored: Vec<ScoredCandidate<'a>>,
    ) -> Vec<ScoredCandidate<'a>> {
        let mut remaining: Vec<ScoredCandidate<'a>> = scored
            .into_iter()
            .filter(|candidate| candidate.id() != reference)
            .collect();
        remaining.sort_by(initial_order);

        let pool_size = remaining.len();
        let mut selected: Vec<ScoredCandidate<'a>> = Vec::with_capacity(self.params.max_results);
        let mut director_counts: HashMap<PersonId, usize> = HashMap::new();

        while selected.len() < self.params.max_results {
            let mut best: Option<(usize, f64)> = None;

            for (index, candidate) in remaining.iter().enumerate() {
                if let Some(director) = candidate.director_id() {
                    if director_counts.get(&director).copied().unwrap_or(0) >= self.params.director_cap {
                        continue;
                    }
                }

                let redundancy = selected
                    .iter()
                    .map(|chosen| self.pairwise_similarity(candidate.features(), chosen.features()))
                    .fold(0.0, f64::max);
                let mmr = self.params.relevance_weight * candidate.relevance
                    - self.params.redundancy_weight * redundancy;

                let better = match best {
                    None => true,
                    Some((best_index, best_mmr)) => {
                        prefer(mmr, candidate, best_mmr, &remaining[best_index]) == Ordering::Less
                    }
                };
                if better {
                    best = Some((index, mmr));
                }
            }

            let Some((index, _)) = best else {
                break;
            };
            let picked = remaining.remove(index);
            if let Some(director) = picked.director_id() {
                *director_counts.entry(director).or_insert(0) += 1;
            }
            selected.push(picked);
        }

        debug!(
            "Selected {} of {} scored candidates for movie {}",
            selected.len(),
            pool_size,
            reference
        );
        selected
    }

    /// Candidate-to-candidate similarity used for redundancy.
    ///
    /// `same_director_similarity × director match + genre_similarity × genre
    /// Jaccard + era_similarity × era closeness`.
    pub fn pairwise_similarity(&self, a: &FeatureRecord, b: &FeatureRecord) -> f64 {
        let director = if same_director(a.director_id, b.director_id) {
            1.0
        } else {
            0.0
        };
        let (era, _) = closeness(
            a.release_year.map(i64::from),
            b.release_year.map(i64::from),
            self.params.era_span,
            self.params.era_neutral,
        );

        self.params.same_director_similarity * director
            + self.params.genre_similarity * jaccard(&a.genre_ids, &b.genre_ids)
            + self.params.era_similarity * era
    }
}

impl Default for DiversitySelector {
    fn default() -> Self {
        Self::new(SelectionParams::default())
    }
}

/// Score desc, vote average desc, id asc.
fn initial_order(a: &ScoredCandidate<'_>, b: &ScoredCandidate<'_>) -> Ordering {
    b.similarity_score
        .total_cmp(&a.similarity_score)
        .then_with(|| b.movie.vote_average.total_cmp(&a.movie.vote_average))
        .then_with(|| a.id().cmp(&b.id()))
}

/// `Ordering::Less` when `(mmr_a, a)` should be picked over `(mmr_b, b)`.
fn prefer(
    mmr_a: f64,
    a: &ScoredCandidate<'_>,
    mmr_b: f64,
    b: &ScoredCandidate<'_>,
) -> Ordering {
    mmr_b
        .total_cmp(&mmr_a)
        .then_with(|| b.similarity_score.total_cmp(&a.similarity_score))
        .then_with(|| a.id().cmp(&b.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::ExtractedMovie;
    use std::collections::HashSet;

    fn movie(id: u64, director: Option<u64>, genres: &[u64], year: Option<i32>) -> ExtractedMovie {
        ExtractedMovie {
            id,
            title: format!("Movie {id}"),
            poster_path: None,
            release_date: None,
            vote_average: 7.0,
            features: FeatureRecord {
                genre_ids: genres.iter().copied().collect::<HashSet<_>>(),
                director_id: director,
                release_year: year,
                ..FeatureRecord::default()
            },
        }
    }

    fn scored(movie: &ExtractedMovie, score: f64) -> ScoredCandidate<'_> {
        ScoredCandidate::new(movie, score, "Strong genre overlap".to_string())
    }

    fn ids(selected: &[ScoredCandidate<'_>]) -> Vec<u64> {
        selected.iter().map(|c| c.id()).collect()
    }

    #[test]
    fn test_pairwise_similarity() {
        let selector = DiversitySelector::default();
        let a = movie(1, Some(9), &[28, 878], Some(2010)).features;
        let b = movie(2, Some(9), &[28, 878], Some(2010)).features;
        assert!((selector.pairwise_similarity(&a, &b) - 1.0).abs() < 1e-12);

        // different director, half genre overlap, 10 years apart
        let c = movie(3, Some(4), &[28], Some(2000)).features;
        let expected = 0.35 * 0.5 + 0.15 * 0.5;
        assert!((selector.pairwise_similarity(&a, &c) - expected).abs() < 1e-12);

        // unknown year uses the neutral era score; unknown directors never match
        let d = movie(4, None, &[], None).features;
        let e = movie(5, None, &[], Some(1990)).features;
        assert!((selector.pairwise_similarity(&d, &e) - 0.15 * 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_director_cap() {
        let pool = vec![
            movie(1, Some(9), &[28], Some(2010)),
            movie(2, Some(9), &[28], Some(2011)),
            movie(3, Some(9), &[28], Some(2012)),
            movie(4, Some(9), &[28], Some(2013)),
            movie(5, Some(4), &[35], Some(1990)),
            movie(6, Some(5), &[18], Some(1980)),
        ];
        let scores = [90.0, 85.0, 80.0, 75.0, 60.0, 55.0];
        let input: Vec<_> = pool.iter().zip(scores).map(|(m, s)| scored(m, s)).collect();

        let selected = DiversitySelector::default().select(100, input);

        let same_director = selected
            .iter()
            .filter(|c| c.director_id() == Some(9))
            .count();
        assert_eq!(same_director, 2);
        assert_eq!(selected.len(), 4);
        assert_eq!(selected[0].id(), 1);
    }

    #[test]
    fn test_unknown_directors_are_uncapped() {
        let pool: Vec<_> = (1..=5).map(|id| movie(id, None, &[28], Some(2010))).collect();
        let input: Vec<_> = pool.iter().map(|m| scored(m, 70.0)).collect();

        let selected = DiversitySelector::default().select(100, input);
        assert_eq!(selected.len(), 5);
    }

    #[test]
    fn test_max_results() {
        let pool: Vec<_> = (1..=30)
            .map(|id| movie(id, Some(id), &[28], Some(2000 + id as i32)))
            .collect();
        let input: Vec<_> = pool.iter().map(|m| scored(m, 50.0 + m.id as f64)).collect();

        let selected = DiversitySelector::default().select(100, input);
        assert_eq!(selected.len(), 18);

        let two = DiversitySelector::new(SelectionParams {
            max_results: 2,
            ..SelectionParams::default()
        });
        let input: Vec<_> = pool.iter().map(|m| scored(m, 50.0 + m.id as f64)).collect();
        assert_eq!(ids(&two.select(100, input)), vec![30, 29]);
    }

    #[test]
    fn test_redundancy_promotes_variety() {
        // 2 and 3 score the same; 3 shares nothing with the first pick
        let pool = vec![
            movie(1, Some(9), &[28, 878], Some(2010)),
            movie(2, Some(4), &[28, 878], Some(2010)),
            movie(3, Some(5), &[35], Some(1980)),
        ];
        let input = vec![
            scored(&pool[0], 80.0),
            scored(&pool[1], 70.0),
            scored(&pool[2], 70.0),
        ];

        let selected = DiversitySelector::default().select(100, input);
        assert_eq!(ids(&selected), vec![1, 3, 2]);
    }

    #[test]
    fn test_ties_break_by_score_then_id() {
        let pool = vec![
            movie(7, Some(1), &[], None),
            movie(3, Some(2), &[], None),
            movie(5, Some(3), &[], None),
        ];
        let input: Vec<_> = pool.iter().map(|m| scored(m, 60.0)).collect();

        let selected = DiversitySelector::default().select(100, input);
        assert_eq!(ids(&selected), vec![3, 5, 7]);
    }

    #[test]
    fn test_reference_and_empty_pool() {
        let pool = vec![movie(1, Some(9), &[28], Some(2010)), movie(2, Some(4), &[28], None)];
        let input: Vec<_> = pool.iter().map(|m| scored(m, 60.0)).collect();

        assert_eq!(ids(&DiversitySelector::default().select(1, input)), vec![2]);
        assert!(DiversitySelector::default().select(1, Vec::new()).is_empty());
    }

    #[test]
    fn test_deterministic_regardless_of_input_order() {
        let pool: Vec<_> = (1..=12)
            .map(|id| movie(id, Some(id % 3), &[28, 10 + id % 4], Some(1995 + id as i32)))
            .collect();
        let forward: Vec<_> = pool.iter().map(|m| scored(m, 40.0 + (m.id % 5) as f64)).collect();
        let reversed: Vec<_> = pool
            .iter()
            .rev()
            .map(|m| scored(m, 40.0 + (m.id % 5) as f64))
            .collect();

        let selector = DiversitySelector::default();
        let a = selector.select(100, forward.clone());
        let b = selector.select(100, forward);
        let c = selector.select(100, reversed);

        assert_eq!(a, b);
        assert_eq!(ids(&a), ids(&c));
        assert_eq!(a.len(), 6);
    }
}
