//! User registration, login, identity and logout handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::api::AppState;
use crate::auth::{AuthUser, AUTH_HEADER};
use crate::db::schema::{UserBody, UserCreate};
use crate::db::QueryBuilder;
use crate::errors::ApiError;
use crate::types::Email;

const MIN_PASSWORD_LEN: usize = 6;

/// Body for POST /users and POST /users/login.
///
/// Fields default to empty so a missing field reads as a validation
/// failure (400) rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Minimal email shape check: one `@`, a non-empty local part, and a
/// domain with an interior dot.
fn is_valid_email(raw: &str) -> bool {
    if raw.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.split_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// POST /users: register, returning the user body plus a fresh session
/// token in the `x-auth` header.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    let email = body.email.trim().to_string();
    if !is_valid_email(&email) {
        return Err(ApiError::Validation("email is not valid".to_string()));
    }
    if body.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let email = Email::new(email);
    let existing = QueryBuilder::find_user_by_email(&state.db, &email)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;
    if existing.is_some() {
        return Err(ApiError::Validation("email already in use".to_string()));
    }

    // Hashing is blocking work, keep it off the async workers.
    let password = body.password;
    let hash = tokio::task::spawn_blocking(move || password_auth::generate_hash(password))
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

    // The unique index still backstops the email pre-check above.
    let user = QueryBuilder::create_user(
        &state.db,
        &UserCreate {
            email,
            password: hash,
        },
    )
    .await
    .map_err(|e| ApiError::Persistence(e.to_string()))?;

    let token = state
        .tokens
        .issue(&state.db, &user.id)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

    info!(user_id = %user.id, "user registered");
    Ok((
        [(AUTH_HEADER, token.into_inner())],
        Json(UserBody::from(&user)),
    ))
}

/// POST /users/login: verify credentials and issue an additional session
/// token. Existing sessions are untouched.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    let bad_credentials = || ApiError::Validation("invalid email or password".to_string());

    let email = Email::new(body.email.trim());
    let user = QueryBuilder::find_user_by_email(&state.db, &email)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?
        .ok_or_else(bad_credentials)?;

    // `password_auth::verify_password()` is blocking, hence
    // `tokio::task::spawn_blocking()`.
    let password = body.password;
    let hash = user.password.clone();
    let verified = tokio::task::spawn_blocking(move || {
        password_auth::verify_password(password, &hash).is_ok()
    })
    .await
    .map_err(|e| ApiError::Persistence(e.to_string()))?;

    if !verified {
        return Err(bad_credentials());
    }

    let token = state
        .tokens
        .issue(&state.db, &user.id)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

    info!(user_id = %user.id, "user logged in");
    Ok((
        [(AUTH_HEADER, token.into_inner())],
        Json(UserBody::from(&user)),
    ))
}

/// GET /users/me: identity of the authenticated caller.
pub async fn me(auth: AuthUser) -> Json<UserBody> {
    Json(UserBody::from(&auth.user))
}

/// DELETE /users/me/token: revoke exactly the session token that made this
/// request. Other sessions of the same user stay valid.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, ApiError> {
    state
        .tokens
        .revoke(&state.db, &auth.user.id, &auth.token)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

    info!(user_id = %auth.user.id, "session revoked");
    Ok(StatusCode::OK)
}
