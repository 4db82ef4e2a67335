//! Core domain types for movie metadata and extracted features.
//!
//! Two families of types live here:
//! - Raw metadata as the external catalog provider reports it (every field
//!   that the provider may omit is optional or defaulted)
//! - The normalized `FeatureRecord` that the ranking core compares

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// Type Aliases
// =============================================================================
// The provider uses independent id spaces for movies, people, genres and
// keywords. Aliases keep signatures readable.

/// Unique identifier for a movie in the metadata catalog
pub type MovieId = u64;

/// Unique identifier for a person (cast or crew)
pub type PersonId = u64;

/// Unique identifier for a genre
pub type GenreId = u64;

/// Unique identifier for a keyword
pub type KeywordId = u64;

/// Unique identifier for a collection (franchise)
pub type CollectionId = u64;

// =============================================================================
// Raw Metadata
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: KeywordId,
    pub name: String,
}

/// The franchise a movie belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: CollectionId,
    #[serde(default)]
    pub name: String,
}

/// A billed cast member. Order in `Credits::cast` is billing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl Credits {
    /// The first crew member credited with the "Director" job.
    pub fn director(&self) -> Option<&CrewMember> {
        self.crew
            .iter()
            .find(|member| member.job.as_deref() == Some("Director"))
    }
}

/// Full metadata for one movie.
///
/// Missing fields deserialize to empty/`None` so a partial provider payload
/// still produces a usable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieMetadata {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    /// `YYYY-MM-DD`, possibly empty
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub credits: Credits,
    #[serde(default)]
    pub belongs_to_collection: Option<CollectionRef>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
}

impl MovieMetadata {
    /// Lightweight list entry for this movie.
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            release_date: self.release_date.clone(),
            poster_path: self.poster_path.clone(),
            vote_average: self.vote_average.unwrap_or_default(),
            vote_count: self.vote_count.unwrap_or_default(),
        }
    }
}

/// A movie as it appears in search results and similar/recommended lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
}

// =============================================================================
// Extracted Features
// =============================================================================

/// Normalized per-movie attributes used for pairwise comparison.
///
/// Built once per movie per request by [`crate::extract::extract_features`]
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureRecord {
    pub genre_ids: HashSet<GenreId>,
    pub director_id: Option<PersonId>,
    /// Principal cast in billing order, at most five entries
    pub cast_ids: Vec<PersonId>,
    /// 0.0 to 10.0
    pub vote_average: f64,
    pub vote_count: u64,
    pub release_year: Option<i32>,
    pub runtime_minutes: Option<u32>,
    pub keyword_ids: HashSet<KeywordId>,
}

/// A movie ready for ranking: display metadata plus its feature record.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedMovie {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub features: FeatureRecord,
}

impl ExtractedMovie {
    pub fn director_id(&self) -> Option<PersonId> {
        self.features.director_id
    }
}
