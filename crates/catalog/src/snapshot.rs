//! Offline catalog snapshots.
//!
//! A snapshot is a JSON document holding full metadata for a set of movies
//! plus, per movie, the ids the provider listed as "similar" and
//! "recommended". It lets the whole ranking flow run without network access.
//!
//! ```json
//! {
//!   "movies": [ { "id": 1, "title": "...", "genres": [...], ... } ],
//!   "similar": { "1": [2, 3] },
//!   "recommended": { "1": [4] }
//! }
//! ```

use crate::error::{CatalogError, Result};
use crate::types::{CollectionId, KeywordId, MovieId, MovieMetadata, MovieSummary, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Serialized form of a snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub movies: Vec<MovieMetadata>,
    #[serde(default)]
    pub similar: HashMap<MovieId, Vec<MovieId>>,
    #[serde(default)]
    pub recommended: HashMap<MovieId, Vec<MovieId>>,
}

/// Indexed, read-only view of a snapshot.
///
/// All lookups return borrowed data; the snapshot owns everything.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    movies: HashMap<MovieId, MovieMetadata>,
    /// Insertion order of `movies`, so iteration is stable
    order: Vec<MovieId>,
    similar: HashMap<MovieId, Vec<MovieId>>,
    recommended: HashMap<MovieId, Vec<MovieId>>,
    /// Movies grouped by their director
    director_index: HashMap<PersonId, Vec<MovieId>>,
    collection_index: HashMap<CollectionId, Vec<MovieId>>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and index a snapshot file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CatalogError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw, &path.display().to_string())
    }

    /// Parse and index a snapshot from a JSON string.
    pub fn from_json_str(raw: &str, source_name: &str) -> Result<Self> {
        let file: SnapshotFile =
            serde_json::from_str(raw).map_err(|e| CatalogError::DecodeError {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_file(file)
    }

    /// Index an already-deserialized snapshot, validating list references.
    pub fn from_file(file: SnapshotFile) -> Result<Self> {
        let mut snapshot = Self::new();
        for movie in file.movies {
            snapshot.insert_movie(movie);
        }

        for (lists, target) in [
            (file.similar, &mut snapshot.similar),
            (file.recommended, &mut snapshot.recommended),
        ] {
            for (owner, ids) in lists {
                if let Some(&missing) = ids.iter().find(|&&id| !snapshot.movies.contains_key(&id)) {
                    return Err(CatalogError::MissingReference {
                        id: missing,
                        listed_by: owner,
                    });
                }
                target.insert(owner, ids);
            }
        }

        debug!(
            "Indexed snapshot: {} movies, {} directors",
            snapshot.movies.len(),
            snapshot.director_index.len()
        );
        Ok(snapshot)
    }

    /// Insert a movie and update the director index.
    ///
    /// Re-inserting an id replaces the stored metadata.
    pub fn insert_movie(&mut self, movie: MovieMetadata) {
        let id = movie.id;
        if let Some(previous) = self.movies.get(&id) {
            if let Some(director) = previous.credits.director() {
                if let Some(ids) = self.director_index.get_mut(&director.id) {
                    ids.retain(|&other| other != id);
                }
            }
            if let Some(collection) = &previous.belongs_to_collection {
                if let Some(ids) = self.collection_index.get_mut(&collection.id) {
                    ids.retain(|&other| other != id);
                }
            }
        } else {
            self.order.push(id);
        }
        if let Some(director) = movie.credits.director() {
            self.director_index.entry(director.id).or_default().push(id);
        }
        if let Some(collection) = &movie.belongs_to_collection {
            self.collection_index.entry(collection.id).or_default().push(id);
        }
        self.movies.insert(id, movie);
    }

    pub fn set_similar(&mut self, id: MovieId, similar: Vec<MovieId>) {
        self.similar.insert(id, similar);
    }

    pub fn set_recommended(&mut self, id: MovieId, recommended: Vec<MovieId>) {
        self.recommended.insert(id, recommended);
    }

    pub fn get_movie(&self, id: MovieId) -> Option<&MovieMetadata> {
        self.movies.get(&id)
    }

    /// Like [`Self::get_movie`] but as an error for `?` chains.
    pub fn require_movie(&self, id: MovieId) -> Result<&MovieMetadata> {
        self.get_movie(id).ok_or(CatalogError::UnknownMovie(id))
    }

    /// All movie ids in insertion order.
    pub fn movie_ids(&self) -> &[MovieId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn similar_to(&self, id: MovieId) -> Vec<MovieSummary> {
        self.summaries(self.similar.get(&id))
    }

    pub fn recommended_for(&self, id: MovieId) -> Vec<MovieSummary> {
        self.summaries(self.recommended.get(&id))
    }

    /// Movies directed by `director`, in insertion order.
    pub fn directed_by(&self, director: PersonId) -> Vec<MovieSummary> {
        self.summaries(self.director_index.get(&director))
    }

    /// Every part of a collection, in insertion order.
    pub fn collection_parts(&self, collection: CollectionId) -> Vec<MovieSummary> {
        self.summaries(self.collection_index.get(&collection))
    }

    /// Movies tagged with any of `keywords` and at least `min_votes` votes,
    /// most-voted first.
    pub fn discover_by_keywords(&self, keywords: &[KeywordId], min_votes: u64) -> Vec<MovieSummary> {
        if keywords.is_empty() {
            return Vec::new();
        }

        let mut found: Vec<MovieSummary> = self
            .order
            .iter()
            .filter_map(|id| self.movies.get(id))
            .filter(|movie| movie.vote_count.unwrap_or_default() >= min_votes)
            .filter(|movie| movie.keywords.iter().any(|k| keywords.contains(&k.id)))
            .map(MovieMetadata::summary)
            .collect();
        found.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
        found
    }

    /// Case-insensitive title search: exact matches first, then substring
    /// matches, each group ordered by vote count descending.
    pub fn search(&self, query: &str) -> Vec<MovieSummary> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(u8, &MovieMetadata)> = self
            .order
            .iter()
            .filter_map(|id| self.movies.get(id))
            .filter_map(|movie| {
                let title = movie.title.to_lowercase();
                if title == needle {
                    Some((0, movie))
                } else if title.contains(&needle) {
                    Some((1, movie))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| {
            a.0.cmp(&b.0).then_with(|| {
                b.1.vote_count
                    .unwrap_or_default()
                    .cmp(&a.1.vote_count.unwrap_or_default())
            })
        });
        matches.into_iter().map(|(_, movie)| movie.summary()).collect()
    }

    fn summaries(&self, ids: Option<&Vec<MovieId>>) -> Vec<MovieSummary> {
        ids.map(|ids| {
            ids.iter()
                .filter_map(|id| self.movies.get(id))
                .map(MovieMetadata::summary)
                .collect()
        })
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "movies": [
            {
                "id": 1, "title": "Heat", "vote_count": 7000,
                "credits": { "crew": [ { "id": 9, "name": "Michael Mann", "job": "Director" } ] }
            },
            {
                "id": 2, "title": "Collateral", "vote_count": 6000,
                "credits": { "crew": [ { "id": 9, "name": "Michael Mann", "job": "Director" } ] }
            },
            { "id": 3, "title": "Heat Wave", "vote_count": 40 },
            { "id": 4, "title": "The Heat", "vote_count": 9000 }
        ],
        "similar": { "1": [2, 3] },
        "recommended": { "1": [4] }
    }"#;

    #[test]
    fn test_load_and_lookup() {
        let snapshot = CatalogSnapshot::from_json_str(SNAPSHOT, "inline").unwrap();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.movie_ids(), &[1, 2, 3, 4]);
        assert_eq!(snapshot.get_movie(2).unwrap().title, "Collateral");
        assert!(snapshot.get_movie(99).is_none());
        assert!(matches!(
            snapshot.require_movie(99),
            Err(CatalogError::UnknownMovie(99))
        ));
    }

    #[test]
    fn test_lists_and_director_index() {
        let snapshot = CatalogSnapshot::from_json_str(SNAPSHOT, "inline").unwrap();

        let similar: Vec<_> = snapshot.similar_to(1).iter().map(|m| m.id).collect();
        assert_eq!(similar, vec![2, 3]);
        assert_eq!(snapshot.recommended_for(1)[0].id, 4);
        assert!(snapshot.similar_to(4).is_empty());

        let directed: Vec<_> = snapshot.directed_by(9).iter().map(|m| m.id).collect();
        assert_eq!(directed, vec![1, 2]);
    }

    #[test]
    fn test_search_orders_exact_first() {
        let snapshot = CatalogSnapshot::from_json_str(SNAPSHOT, "inline").unwrap();

        let results: Vec<_> = snapshot.search("  HEAT ").iter().map(|m| m.id).collect();
        // exact "Heat" first, then substring matches by vote count
        assert_eq!(results, vec![1, 4, 3]);
        assert!(snapshot.search("   ").is_empty());
    }

    #[test]
    fn test_missing_reference_is_rejected() {
        let raw = r#"{ "movies": [ { "id": 1, "title": "Solo" } ], "similar": { "1": [42] } }"#;
        let err = CatalogSnapshot::from_json_str(raw, "inline").unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingReference { id: 42, listed_by: 1 }
        ));
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = CatalogSnapshot::from_json_str("{ not json", "broken.json").unwrap_err();
        assert!(matches!(err, CatalogError::DecodeError { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = CatalogSnapshot::load_from_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound { .. }));
    }

    #[test]
    fn test_collection_parts() {
        let raw = r#"{
            "movies": [
                { "id": 1, "title": "Alien", "belongs_to_collection": { "id": 8091, "name": "Alien Collection" } },
                { "id": 2, "title": "Aliens", "belongs_to_collection": { "id": 8091 } },
                { "id": 3, "title": "Heat" }
            ]
        }"#;
        let mut snapshot = CatalogSnapshot::from_json_str(raw, "inline").unwrap();

        let parts: Vec<_> = snapshot.collection_parts(8091).iter().map(|m| m.id).collect();
        assert_eq!(parts, vec![1, 2]);
        assert!(snapshot.collection_parts(1).is_empty());

        let mut movie = snapshot.get_movie(2).unwrap().clone();
        movie.belongs_to_collection = None;
        snapshot.insert_movie(movie);
        let parts: Vec<_> = snapshot.collection_parts(8091).iter().map(|m| m.id).collect();
        assert_eq!(parts, vec![1]);
    }

    #[test]
    fn test_discover_by_keywords() {
        let raw = r#"{
            "movies": [
                { "id": 1, "title": "Heat", "vote_count": 7000, "keywords": [ { "id": 10, "name": "heist" } ] },
                { "id": 2, "title": "Thief", "vote_count": 900, "keywords": [ { "id": 10, "name": "heist" } ] },
                { "id": 3, "title": "Inside Man", "vote_count": 9000, "keywords": [ { "id": 20, "name": "bank" } ] },
                { "id": 4, "title": "Obscure Caper", "vote_count": 40, "keywords": [ { "id": 10, "name": "heist" } ] },
                { "id": 5, "title": "Drive", "vote_count": 8000 }
            ]
        }"#;
        let snapshot = CatalogSnapshot::from_json_str(raw, "inline").unwrap();

        let found: Vec<_> = snapshot
            .discover_by_keywords(&[10, 20], 500)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(found, vec![3, 1, 2]);
        assert!(snapshot.discover_by_keywords(&[], 0).is_empty());
    }

    #[test]
    fn test_reinsert_replaces_movie() {
        let mut snapshot = CatalogSnapshot::from_json_str(SNAPSHOT, "inline").unwrap();
        let mut movie = snapshot.get_movie(2).unwrap().clone();
        movie.credits.crew.clear();
        snapshot.insert_movie(movie);

        assert_eq!(snapshot.len(), 4);
        let directed: Vec<_> = snapshot.directed_by(9).iter().map(|m| m.id).collect();
        assert_eq!(directed, vec![1]);
    }
}
