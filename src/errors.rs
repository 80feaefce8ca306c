//! Error taxonomy for the HTTP surface.
//!
//! Handlers return `ApiError` and the `IntoResponse` impl maps each variant
//! to its status code. Responses carry an empty body except for validation
//! failures, which include a short JSON message. Ownership-scoped lookups
//! never surface 401: a bad id and someone else's id are both `NotFound`,
//! so callers cannot probe for the existence of other users' records.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::fmt;

/// Failure modes surfaced by the API handlers.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Malformed or missing required fields, or a violated store constraint
    /// (e.g. duplicate email).
    Validation(String),
    /// No credentials, or credentials that resolve to no active session.
    Unauthenticated,
    /// Token failed signature validation or carried the wrong access purpose.
    InvalidToken,
    /// No record matching (id, owner), or a syntactically invalid id.
    NotFound,
    /// Backing-store failure unrelated to the request input.
    Persistence(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Validation failed: {}", msg),
            Self::Unauthenticated => write!(f, "Authentication required"),
            Self::InvalidToken => write!(f, "Invalid token"),
            Self::NotFound => write!(f, "Not found"),
            Self::Persistence(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Status code this error maps to on the wire.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            // Handlers conservatively map store failures to 400, matching
            // the behavior callers already depend on.
            Self::Persistence(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(msg) => (
                self.status(),
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
            ApiError::Persistence(msg) => {
                tracing::error!("store failure surfaced to client: {}", msg);
                self.status().into_response()
            }
            _ => self.status().into_response(),
        }
    }
}
