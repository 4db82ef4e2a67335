//! Feature extraction: raw provider metadata -> `FeatureRecord`.
//!
//! Extraction never fails. Missing numbers default predictably
//! (vote average and count to 0, year and runtime to `None`) so the
//! scorer can assume every field is present or explicitly optional.

use crate::types::{ExtractedMovie, FeatureRecord, MovieMetadata};

/// Number of billed cast members kept for comparison.
pub const PRINCIPAL_CAST: usize = 5;

/// Build the feature record for one movie.
///
/// Pure function of its input: identical metadata always yields an
/// identical record.
pub fn extract_features(movie: &MovieMetadata) -> FeatureRecord {
    FeatureRecord {
        genre_ids: movie.genres.iter().map(|genre| genre.id).collect(),
        director_id: movie.credits.director().map(|member| member.id),
        cast_ids: movie
            .credits
            .cast
            .iter()
            .take(PRINCIPAL_CAST)
            .map(|member| member.id)
            .collect(),
        vote_average: movie.vote_average.unwrap_or_default(),
        vote_count: movie.vote_count.unwrap_or_default(),
        release_year: movie.release_date.as_deref().and_then(parse_release_year),
        // The provider reports 0 when the runtime is unknown
        runtime_minutes: movie.runtime.filter(|&minutes| minutes > 0),
        keyword_ids: movie.keywords.iter().map(|keyword| keyword.id).collect(),
    }
}

/// Extract features and carry along the display fields the ranked output needs.
pub fn extract_movie(movie: &MovieMetadata) -> ExtractedMovie {
    ExtractedMovie {
        id: movie.id,
        title: movie.title.clone(),
        poster_path: movie.poster_path.clone(),
        release_date: movie.release_date.clone(),
        vote_average: movie.vote_average.unwrap_or_default(),
        features: extract_features(movie),
    }
}

/// Leading four-digit year of a `YYYY-MM-DD` date.
///
/// Returns `None` for empty or malformed dates.
pub fn parse_release_year(date: &str) -> Option<i32> {
    let year = date.trim().get(..4)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}
