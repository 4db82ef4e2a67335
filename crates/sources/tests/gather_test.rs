//! Integration tests for candidate gathering against in-memory providers.

use async_trait::async_trait;
use catalog::{
    CollectionId, CollectionRef, Credits, CrewMember, Keyword, KeywordId, MovieId, MovieMetadata,
    MovieSummary, PersonId,
};
use sources::{CandidateGatherer, MovieProvider, ProviderError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockProvider {
    similar: HashMap<MovieId, Vec<MovieSummary>>,
    recommended: HashMap<MovieId, Vec<MovieSummary>>,
    filmography: HashMap<PersonId, Vec<MovieSummary>>,
    collections: HashMap<CollectionId, Vec<MovieSummary>>,
    discovery: Vec<MovieSummary>,
    discovery_queries: Mutex<Vec<Vec<KeywordId>>>,
    fail_filmography: bool,
    fail_recommended: bool,
    fail_collection: bool,
    fail_discovery: bool,
}

#[async_trait]
impl MovieProvider for MockProvider {
    async fn search_movies(&self, _query: &str) -> Result<Vec<MovieSummary>> {
        Ok(Vec::new())
    }

    async fn movie_details(&self, _movie_id: MovieId) -> Result<MovieMetadata> {
        Err(ProviderError::not_found("MOVIE_NOT_FOUND", "Movie not found"))
    }

    async fn similar_movies(&self, movie_id: MovieId) -> Result<Vec<MovieSummary>> {
        Ok(self.similar.get(&movie_id).cloned().unwrap_or_default())
    }

    async fn recommended_movies(&self, movie_id: MovieId) -> Result<Vec<MovieSummary>> {
        if self.fail_recommended {
            return Err(ProviderError::upstream("TMDB_UPSTREAM_ERROR", "down"));
        }
        Ok(self.recommended.get(&movie_id).cloned().unwrap_or_default())
    }

    async fn director_filmography(&self, person_id: PersonId) -> Result<Vec<MovieSummary>> {
        if self.fail_filmography {
            return Err(ProviderError::upstream("TMDB_REQUEST_FAILED", "timeout"));
        }
        Ok(self.filmography.get(&person_id).cloned().unwrap_or_default())
    }

    async fn collection_movies(&self, collection_id: CollectionId) -> Result<Vec<MovieSummary>> {
        if self.fail_collection {
            return Err(ProviderError::upstream("TMDB_REQUEST_FAILED", "timeout"));
        }
        Ok(self.collections.get(&collection_id).cloned().unwrap_or_default())
    }

    async fn discover_by_keywords(&self, keyword_ids: &[KeywordId]) -> Result<Vec<MovieSummary>> {
        self.discovery_queries.lock().unwrap().push(keyword_ids.to_vec());
        if self.fail_discovery {
            return Err(ProviderError::upstream("TMDB_UPSTREAM_ERROR", "down"));
        }
        Ok(self.discovery.clone())
    }
}

fn summary(id: MovieId, vote_count: u64) -> MovieSummary {
    MovieSummary {
        id,
        title: format!("Movie {id}"),
        release_date: None,
        poster_path: None,
        vote_average: 7.0,
        vote_count,
    }
}

fn reference() -> MovieMetadata {
    MovieMetadata {
        id: 1,
        title: "Reference".to_string(),
        overview: None,
        release_date: Some("2010-07-15".to_string()),
        runtime: Some(148),
        genres: Vec::new(),
        keywords: Vec::new(),
        credits: Credits {
            cast: Vec::new(),
            crew: vec![CrewMember {
                id: 77,
                name: "Director".to_string(),
                job: Some("Director".to_string()),
            }],
        },
        belongs_to_collection: None,
        poster_path: None,
        backdrop_path: None,
        vote_average: Some(8.0),
        vote_count: Some(20_000),
    }
}

/// Reference in collection 5 with seven keywords
fn franchise_reference() -> MovieMetadata {
    MovieMetadata {
        belongs_to_collection: Some(CollectionRef {
            id: 5,
            name: "Saga".to_string(),
        }),
        keywords: (1..=7)
            .map(|id| Keyword {
                id,
                name: format!("keyword {id}"),
            })
            .collect(),
        ..reference()
    }
}

fn provider() -> MockProvider {
    MockProvider {
        similar: HashMap::from([(1, vec![summary(10, 100), summary(11, 100), summary(1, 5)])]),
        recommended: HashMap::from([(1, vec![summary(11, 400), summary(12, 50)])]),
        filmography: HashMap::from([(
            77,
            vec![
                summary(1, 20_000),
                summary(30, 10),
                summary(31, 9_000),
                summary(10, 100),
                summary(32, 800),
            ],
        )]),
        collections: HashMap::from([(5, vec![summary(40, 3_000), summary(1, 20_000), summary(41, 2_000)])]),
        discovery: vec![summary(1, 20_000), summary(50, 5_000), summary(12, 900), summary(51, 700)],
        ..MockProvider::default()
    }
}

fn ids(pool: &[MovieSummary]) -> Vec<MovieId> {
    pool.iter().map(|m| m.id).collect()
}

#[tokio::test]
async fn test_gather_merges_all_sources() {
    let gatherer = CandidateGatherer::new(Arc::new(provider()));

    let pool = gatherer.gather(&reference()).await.unwrap();

    // filmography sorted by votes first (31, 32, 10, 30), then the lists
    assert_eq!(ids(&pool), vec![31, 32, 10, 30, 11, 12]);
    // the recommended copy of 11 had more votes
    assert_eq!(pool[4].vote_count, 400);
}

#[tokio::test]
async fn test_collection_and_discovery_join_the_pool() {
    let provider = Arc::new(provider());
    let gatherer = CandidateGatherer::new(provider.clone());

    let pool = gatherer.gather(&franchise_reference()).await.unwrap();

    // collection, filmography, similar, recommended, discovery; reference dropped
    assert_eq!(ids(&pool), vec![40, 41, 31, 32, 10, 30, 11, 12, 50, 51]);
    // discovery's copy of 12 had more votes than the recommended one
    assert_eq!(pool[7].vote_count, 900);

    // only the leading five keywords are used
    let queries = provider.discovery_queries.lock().unwrap();
    assert_eq!(queries.as_slice(), &[vec![1, 2, 3, 4, 5]]);
}

#[tokio::test]
async fn test_discovery_limit() {
    let gatherer = CandidateGatherer::new(Arc::new(provider())).with_discovery_limit(1);

    let pool = gatherer.gather(&franchise_reference()).await.unwrap();
    assert!(pool.iter().any(|m| m.id == 50));
    assert!(!pool.iter().any(|m| m.id == 51));
}

#[tokio::test]
async fn test_no_keywords_skips_discovery() {
    let provider = Arc::new(provider());
    let gatherer = CandidateGatherer::new(provider.clone());

    gatherer.gather(&reference()).await.unwrap();
    assert!(provider.discovery_queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_collection_and_discovery_failures_are_tolerated() {
    let gatherer = CandidateGatherer::new(Arc::new(MockProvider {
        fail_collection: true,
        fail_discovery: true,
        ..provider()
    }));

    let pool = gatherer.gather(&franchise_reference()).await.unwrap();
    assert_eq!(ids(&pool), vec![31, 32, 10, 30, 11, 12]);
}

#[tokio::test]
async fn test_filmography_limit_and_cap() {
    let gatherer = CandidateGatherer::new(Arc::new(provider()))
        .with_filmography_limit(1)
        .with_max_candidates(4);

    let pool = gatherer.gather(&reference()).await.unwrap();
    assert_eq!(ids(&pool), vec![31, 10, 11, 12]);

    let capped = CandidateGatherer::new(Arc::new(provider()))
        .with_max_candidates(2)
        .gather(&reference())
        .await
        .unwrap();
    assert_eq!(ids(&capped), vec![31, 32]);
}

#[tokio::test]
async fn test_full_lists_do_not_crowd_out_director_films() {
    let gatherer = CandidateGatherer::new(Arc::new(MockProvider {
        similar: HashMap::from([(1, (100..120).map(|id| summary(id, 50)).collect())]),
        recommended: HashMap::from([(1, (200..220).map(|id| summary(id, 50)).collect())]),
        discovery: (300..315).map(|id| summary(id, 600)).collect(),
        ..provider()
    }));

    let pool = gatherer.gather(&franchise_reference()).await.unwrap();

    assert_eq!(pool.len(), 45);
    for id in [40, 41, 31, 32, 10, 30] {
        assert!(pool.iter().any(|m| m.id == id), "missing {id}");
    }
}

#[tokio::test]
async fn test_filmography_failure_is_tolerated() {
    let gatherer = CandidateGatherer::new(Arc::new(MockProvider {
        fail_filmography: true,
        ..provider()
    }));

    let pool = gatherer.gather(&reference()).await.unwrap();
    assert_eq!(ids(&pool), vec![10, 11, 12]);
}

#[tokio::test]
async fn test_list_failure_propagates() {
    let gatherer = CandidateGatherer::new(Arc::new(MockProvider {
        fail_recommended: true,
        ..provider()
    }));

    let err = gatherer.gather(&reference()).await.unwrap_err();
    assert_eq!(err.code(), "TMDB_UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_unknown_director_skips_filmography() {
    let mut reference = reference();
    reference.credits.crew.clear();

    let pool = CandidateGatherer::new(Arc::new(provider()))
        .gather(&reference)
        .await
        .unwrap();
    assert_eq!(ids(&pool), vec![10, 11, 12]);
}
