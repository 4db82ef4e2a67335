//! Offline provider over a JSON catalog snapshot.
//!
//! Answers every `MovieProvider` call from memory. Used by the CLI's
//! `--snapshot` mode, batch runs and tests.

use crate::error::{ProviderError, Result};
use crate::provider::{DISCOVER_MIN_VOTE_COUNT, MovieProvider};
use async_trait::async_trait;
use catalog::{
    CatalogSnapshot, CollectionId, KeywordId, MovieId, MovieMetadata, MovieSummary, PersonId,
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct SnapshotProvider {
    snapshot: Arc<CatalogSnapshot>,
}

impl SnapshotProvider {
    pub fn new(snapshot: Arc<CatalogSnapshot>) -> Self {
        Self { snapshot }
    }

    pub fn load_from_file(path: &Path) -> catalog::Result<Self> {
        let snapshot = CatalogSnapshot::load_from_file(path)?;
        debug!("Loaded snapshot with {} movies", snapshot.len());
        Ok(Self::new(Arc::new(snapshot)))
    }

    pub fn snapshot(&self) -> &Arc<CatalogSnapshot> {
        &self.snapshot
    }

    fn require(&self, movie_id: MovieId) -> Result<&MovieMetadata> {
        self.snapshot
            .get_movie(movie_id)
            .ok_or_else(|| ProviderError::not_found("MOVIE_NOT_FOUND", "Movie not found"))
    }
}

#[async_trait]
impl MovieProvider for SnapshotProvider {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>> {
        Ok(self.snapshot.search(query))
    }

    async fn movie_details(&self, movie_id: MovieId) -> Result<MovieMetadata> {
        self.require(movie_id).cloned()
    }

    async fn similar_movies(&self, movie_id: MovieId) -> Result<Vec<MovieSummary>> {
        self.require(movie_id)?;
        Ok(self.snapshot.similar_to(movie_id))
    }

    async fn recommended_movies(&self, movie_id: MovieId) -> Result<Vec<MovieSummary>> {
        self.require(movie_id)?;
        Ok(self.snapshot.recommended_for(movie_id))
    }

    async fn director_filmography(&self, person_id: PersonId) -> Result<Vec<MovieSummary>> {
        Ok(self.snapshot.directed_by(person_id))
    }

    async fn collection_movies(&self, collection_id: CollectionId) -> Result<Vec<MovieSummary>> {
        Ok(self.snapshot.collection_parts(collection_id))
    }

    async fn discover_by_keywords(&self, keyword_ids: &[KeywordId]) -> Result<Vec<MovieSummary>> {
        Ok(self
            .snapshot
            .discover_by_keywords(keyword_ids, DISCOVER_MIN_VOTE_COUNT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SnapshotProvider {
        let raw = r#"{
            "movies": [
                { "id": 1, "title": "Alien", "vote_count": 900,
                  "belongs_to_collection": { "id": 8091, "name": "Alien Collection" },
                  "keywords": [ { "id": 10, "name": "space" } ],
                  "credits": { "crew": [ { "id": 5, "name": "Ridley Scott", "job": "Director" } ] } },
                { "id": 2, "title": "Aliens", "vote_count": 800,
                  "belongs_to_collection": { "id": 8091, "name": "Alien Collection" } },
                { "id": 3, "title": "Blade Runner", "vote_count": 700,
                  "keywords": [ { "id": 10, "name": "space" }, { "id": 11, "name": "android" } ],
                  "credits": { "crew": [ { "id": 5, "name": "Ridley Scott", "job": "Director" } ] } },
                { "id": 4, "title": "Low Budget Clone", "vote_count": 12,
                  "keywords": [ { "id": 11, "name": "android" } ] }
            ],
            "similar": { "1": [2] },
            "recommended": { "1": [3] }
        }"#;
        let snapshot = CatalogSnapshot::from_json_str(raw, "inline").unwrap();
        SnapshotProvider::new(Arc::new(snapshot))
    }

    #[tokio::test]
    async fn test_details_and_lists() {
        let provider = provider();

        assert_eq!(provider.movie_details(3).await.unwrap().title, "Blade Runner");
        assert_eq!(provider.similar_movies(1).await.unwrap()[0].id, 2);
        assert_eq!(provider.recommended_movies(1).await.unwrap()[0].id, 3);
        assert!(provider.similar_movies(2).await.unwrap().is_empty());

        let films: Vec<_> = provider
            .director_filmography(5)
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(films, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_collection_and_keyword_discovery() {
        let provider = provider();

        let parts: Vec<_> = provider
            .collection_movies(8091)
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(parts, vec![1, 2]);
        assert!(provider.collection_movies(1).await.unwrap().is_empty());

        // the 12-vote clone is below the discovery floor
        let found: Vec<_> = provider
            .discover_by_keywords(&[10, 11])
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(found, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_unknown_movie_is_not_found() {
        let provider = provider();

        let err = provider.movie_details(404).await.unwrap_err();
        assert_eq!(err.code(), "MOVIE_NOT_FOUND");
        assert!(provider.similar_movies(404).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_search() {
        let results = provider().search_movies("alien").await.unwrap();
        let ids: Vec<_> = results.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
