//! Service-level errors and their HTTP representation.
//!
//! Every error renders as `{"error": {"code": "...", "message": "..."}}`
//! with a status derived from the variant.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sources::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{code}: {message}")]
    BadRequest { code: String, message: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("{code}: {message}")]
    Internal { code: String, message: String },
}

impl ServiceError {
    pub fn invalid_query() -> Self {
        Self::BadRequest {
            code: "INVALID_QUERY".to_string(),
            message: "Query parameter is required".to_string(),
        }
    }

    pub fn internal(code: &str, message: impl Into<String>) -> Self {
        Self::Internal {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Provider(ProviderError::BadRequest { .. }) => StatusCode::BAD_REQUEST,
            Self::Provider(ProviderError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Provider(ProviderError::Unauthorized { .. }) => StatusCode::UNAUTHORIZED,
            Self::Provider(ProviderError::Upstream { .. }) => StatusCode::BAD_GATEWAY,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::BadRequest { code, .. } | Self::Internal { code, .. } => code,
            Self::Provider(err) => err.code(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. } | Self::Internal { message, .. } => message,
            Self::Provider(err) => err.message(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = Json(ErrorEnvelope {
            error: ErrorBody {
                code: self.code(),
                message: self.message(),
            },
        });
        (self.status(), body).into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
