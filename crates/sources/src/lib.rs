//! # Sources Crate
//!
//! Where candidate movies come from.
//!
//! ## Components
//!
//! ### MovieProvider
//! Async abstraction over an external metadata catalog: search, details,
//! similar titles, recommended titles, director filmography, collection
//! parts and keyword discovery.
//!
//! ### TmdbProvider (Live)
//! HTTP provider for The Movie Database. Bearer-token or api-key auth,
//! errors mapped to stable codes (`MOVIE_NOT_FOUND`, `TMDB_UNAUTHORIZED`, ...).
//!
//! ### SnapshotProvider (Offline)
//! The same trait answered from a JSON `CatalogSnapshot`.
//!
//! ### CandidateGatherer
//! Builds the candidate pool for a reference movie from its franchise,
//! its director's filmography, the similar and recommended lists and
//! keyword discovery, deduplicated and capped at 45.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{CandidateGatherer, MovieProvider, TmdbProvider};
//! use std::sync::Arc;
//!
//! let provider = Arc::new(TmdbProvider::new(sources::tmdb::DEFAULT_BASE_URL, Some(token), None));
//! let reference = provider.movie_details(27205).await?;
//!
//! let gatherer = CandidateGatherer::new(provider.clone()).with_max_candidates(45);
//! let pool = gatherer.gather(&reference).await?;
//! ```

pub mod error;
pub mod gather;
pub mod provider;
pub mod snapshot;
pub mod tmdb;

// Re-export commonly used types
pub use error::{ProviderError, Result};
pub use gather::{is_released, merge_candidates, CandidateGatherer};
pub use provider::{DynMovieProvider, MovieProvider, DISCOVER_MIN_VOTE_COUNT};
pub use snapshot::SnapshotProvider;
pub use tmdb::TmdbProvider;
