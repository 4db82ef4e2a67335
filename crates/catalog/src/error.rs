//! Error types for the catalog crate.

use thiserror::Error;

use crate::types::MovieId;

/// Errors that can occur while loading or querying a catalog snapshot
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Snapshot file could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a snapshot
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Snapshot contents were not valid JSON for the expected shape
    #[error("Failed to decode snapshot {source_name}: {reason}")]
    DecodeError { source_name: String, reason: String },

    /// A similar/recommended list references a movie missing from the snapshot
    #[error("Missing reference: movie {id} listed by {listed_by}")]
    MissingReference { id: MovieId, listed_by: MovieId },

    /// Lookup of a movie that isn't in the snapshot
    #[error("Unknown movie id {0}")]
    UnknownMovie(MovieId),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
