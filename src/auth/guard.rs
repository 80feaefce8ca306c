//! Request guard for protected routes.
//!
//! `AuthUser` is an axum extractor: adding it as a handler argument makes
//! the route protected. It reads the `x-auth` header, verifies the token
//! through the [`TokenService`](super::TokenService), and resolves the
//! caller. Any failure (missing header, bad signature, revoked session,
//! or a store error) rejects the request with an empty 401 before the
//! handler runs.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{request::Parts, HeaderMap, StatusCode};
use tracing::warn;

use crate::api::AppState;
use crate::db::schema::UserRecord;
use crate::types::AuthToken;

/// Header carrying the authentication token.
pub const AUTH_HEADER: &str = "x-auth";

/// The authenticated caller, extracted from the `x-auth` header.
///
/// Handlers get the user record for ownership scoping and the raw token so
/// logout can revoke exactly the session that made the request.
pub struct AuthUser {
    pub user: UserRecord,
    pub token: AuthToken,
}

/// Pull the token string out of the request headers, if present.
fn token_from_headers(headers: &HeaderMap) -> Option<AuthToken> {
    headers
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(AuthToken::new)
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = token_from_headers(&parts.headers).ok_or(StatusCode::UNAUTHORIZED)?;

        match state.tokens.verify(&state.db, &token).await {
            Ok(user) => Ok(AuthUser { user, token }),
            Err(err) => {
                // Fail closed: every verification failure is the same 401.
                warn!("request rejected: {}", err);
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }
}
