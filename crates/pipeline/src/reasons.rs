//! Human-readable match explanations.
//!
//! Each qualifying signal becomes a labelled reason with a contribution
//! roughly equal to what it added to the raw score. The strongest one or
//! two are joined into the `match_reason` string.

use crate::config::RankingConfig;
use crate::signals::ScoringSignals;

pub const SAME_DIRECTOR: &str = "Same director";
pub const SHARED_THEMES: &str = "Shared themes";
pub const GENRE_OVERLAP: &str = "Strong genre overlap";
pub const SHARED_CAST: &str = "Shared cast";
pub const SAME_ERA: &str = "Same era";
pub const SIMILAR_PACING: &str = "Similar pacing";
pub const FALLBACK_REASON: &str = "Strong overall profile match";

const SEPARATOR: &str = " + ";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reason {
    pub label: &'static str,
    pub contribution: f64,
}

/// All qualifying reasons, strongest first.
///
/// The sort is stable, so equal contributions keep declaration order
/// (director, themes, genre, cast, era, pacing).
pub fn ranked_reasons(signals: &ScoringSignals, config: &RankingConfig) -> Vec<Reason> {
    let weights = &config.weights;
    let thresholds = &config.reasons;
    let adjustments = &config.adjustments;
    let mut reasons = Vec::with_capacity(6);

    if signals.same_director {
        let bonus = if signals.genre >= adjustments.director_bonus_min_genre {
            adjustments.director_genre_bonus
        } else {
            0.0
        };
        reasons.push(Reason {
            label: SAME_DIRECTOR,
            contribution: weights.director + bonus,
        });
    }
    if signals.keyword >= thresholds.keyword {
        let bonus = if signals.keyword >= adjustments.keyword_bonus_min {
            adjustments.keyword_bonus
        } else {
            0.0
        };
        reasons.push(Reason {
            label: SHARED_THEMES,
            contribution: signals.keyword * weights.keyword + bonus,
        });
    }
    if signals.genre >= thresholds.genre {
        reasons.push(Reason {
            label: GENRE_OVERLAP,
            contribution: signals.genre * weights.genre,
        });
    }
    if signals.cast >= thresholds.cast {
        reasons.push(Reason {
            label: SHARED_CAST,
            contribution: signals.cast * weights.cast,
        });
    }
    if signals.year_gap.is_some() && signals.year >= thresholds.year {
        reasons.push(Reason {
            label: SAME_ERA,
            contribution: signals.year * weights.year,
        });
    }
    if signals.runtime_gap.is_some() && signals.runtime >= thresholds.runtime {
        reasons.push(Reason {
            label: SIMILAR_PACING,
            contribution: signals.runtime * weights.runtime,
        });
    }

    reasons.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    reasons
}

/// Render the `match_reason` string for an accepted pair.
///
/// A shared director always leads; otherwise the top two reasons are
/// joined, with a generic fallback when nothing qualifies.
pub fn build_reason(signals: &ScoringSignals, config: &RankingConfig) -> String {
    let reasons = ranked_reasons(signals, config);
    let mut others = reasons.iter().filter(|reason| reason.label != SAME_DIRECTOR);

    if signals.same_director {
        return match others.next() {
            Some(next) => format!("{SAME_DIRECTOR}{SEPARATOR}{}", next.label),
            None => SAME_DIRECTOR.to_string(),
        };
    }

    let top: Vec<&str> = others.take(2).map(|reason| reason.label).collect();
    if top.is_empty() {
        FALLBACK_REASON.to_string()
    } else {
        top.join(SEPARATOR)
    }
}
