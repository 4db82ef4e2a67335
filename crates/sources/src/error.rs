//! Error types for metadata providers.
//!
//! Every variant carries a stable machine-readable `code` (for example
//! `MOVIE_NOT_FOUND`) alongside a human message, so callers can map
//! failures onto their own surface without string matching.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The request was malformed (empty query, bad id)
    #[error("{code}: {message}")]
    BadRequest { code: String, message: String },

    /// The requested movie or person does not exist
    #[error("{code}: {message}")]
    NotFound { code: String, message: String },

    /// Credentials are missing or were rejected
    #[error("{code}: {message}")]
    Unauthorized { code: String, message: String },

    /// Transport failure, unexpected status or undecodable payload
    #[error("{code}: {message}")]
    Upstream { code: String, message: String },
}

impl ProviderError {
    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(code: &str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: &str, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn upstream(code: &str, message: impl Into<String>) -> Self {
        Self::Upstream {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::BadRequest { code, .. }
            | Self::NotFound { code, .. }
            | Self::Unauthorized { code, .. }
            | Self::Upstream { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::NotFound { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::Upstream { message, .. } => message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ProviderError>;
