use std::convert::Infallible;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Response, StatusCode};
use thiserror::Error;

use crate::database::StoreError;
use crate::handlers::http::utils::json_response::deliver_error_json;
use crate::scoring::ScoringError;

/// Every failure a client can observe.  Each variant maps to one status code
/// and a stable machine-readable code in the JSON error body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required fields.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Missing, invalid or expired token.
    #[error("authentication required")]
    Unauthenticated,

    /// Unknown email or wrong password.  Deliberately does not say which.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email is already registered")]
    Conflict,

    /// Scoring service unreachable, timed out, non-2xx or unparseable.
    /// No answer was obtained.
    #[error("scoring service unavailable: {0}")]
    PeerUnavailable(#[from] ScoringError),

    /// A verdict was computed but the scan record could not be written.
    #[error("verdict computed but not recorded: {0}")]
    VerdictNotRecorded(StoreError),

    /// Any other store read/write failure.
    #[error("persistence failure: {0}")]
    Persistence(StoreError),

    /// Hashing, signing and other local failures.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => ApiError::Conflict,
            other => ApiError::Persistence(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Conflict => StatusCode::CONFLICT,
            Self::PeerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::VerdictNotRecorded(_) | Self::Persistence(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthenticated => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Conflict => "EMAIL_TAKEN",
            Self::PeerUnavailable(_) => "PEER_UNAVAILABLE",
            Self::VerdictNotRecorded(_) => "VERDICT_NOT_RECORDED",
            Self::Persistence(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-facing message.  Store internals are never echoed back.
    pub fn to_message(&self) -> String {
        match self {
            Self::Validation(detail) => detail.clone(),
            Self::Unauthenticated => "Authentication required".to_string(),
            Self::InvalidCredentials => "Invalid email or password".to_string(),
            Self::Conflict => "Email is already registered".to_string(),
            Self::PeerUnavailable(_) => "Intelligence layer unreachable".to_string(),
            Self::VerdictNotRecorded(_) => {
                "Analysis completed but the result could not be recorded".to_string()
            }
            Self::Persistence(_) => "Database error occurred".to_string(),
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    pub fn into_response(self) -> Result<Response<BoxBody<Bytes, Infallible>>> {
        deliver_error_json(self.to_code(), &self.to_message(), self.status())
    }
}
