//! # Catalog Crate
//!
//! Movie metadata as the external catalog reports it, and the feature
//! extraction that turns it into comparable records.
//!
//! ## Main Components
//!
//! - **types**: Raw metadata (`MovieMetadata`, `Credits`, ...) and the
//!   normalized `FeatureRecord` / `ExtractedMovie`
//! - **extract**: Pure, infallible metadata -> features conversion
//! - **snapshot**: JSON catalog snapshots for offline ranking
//! - **error**: Error types for snapshot loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogSnapshot, extract_movie};
//! use std::path::Path;
//!
//! let snapshot = CatalogSnapshot::load_from_file(Path::new("data/snapshot.json"))?;
//! let reference = extract_movie(snapshot.require_movie(27205)?);
//! println!("{} has {} genres", reference.title, reference.features.genre_ids.len());
//! ```

pub mod error;
pub mod extract;
pub mod snapshot;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use extract::{extract_features, extract_movie, parse_release_year};
pub use snapshot::{CatalogSnapshot, SnapshotFile};
pub use types::{
    // Type aliases
    CollectionId,
    GenreId,
    KeywordId,
    MovieId,
    PersonId,
    // Raw metadata
    CastMember,
    CollectionRef,
    Credits,
    CrewMember,
    Genre,
    Keyword,
    MovieMetadata,
    MovieSummary,
    // Extracted features
    ExtractedMovie,
    FeatureRecord,
};
