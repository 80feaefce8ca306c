//! Token issuance, verification and revocation.
//!
//! Tokens are HS256-signed claims binding a user id to the fixed "auth"
//! access purpose. Signature validity alone is not enough to authenticate:
//! every issued token is also appended to the owning user record, and
//! verification requires finding it there. That makes single-token
//! revocation (logout) possible without a denylist and without invalidating
//! the user's other sessions.
//!
//! Tokens carry no expiration claim; a session lives until it is revoked.

use std::fmt;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use tracing::debug;

use crate::db::schema::{TokenEntry, UserRecord};
use crate::db::{Db, QueryBuilder};
use crate::types::{AuthToken, ACCESS_AUTH};

/// Authentication errors.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// Signature check failed, payload malformed, or wrong access purpose.
    InvalidToken(String),
    /// Structurally valid token that resolves to no active session.
    Unauthenticated,
    /// Store failure while resolving or persisting a token.
    Database(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            Self::Unauthenticated => write!(f, "Authentication required"),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Signed token payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user's record key.
    pub sub: String,
    /// Access purpose; must be "auth".
    pub access: String,
    /// Issued-at, epoch seconds.
    pub iat: i64,
    /// Unique token id, so two logins in the same second produce distinct
    /// token strings and can be revoked independently.
    pub jti: String,
}

/// Issues and verifies signed authentication tokens.
///
/// Holds the process-wide signing secret, injected at construction. The
/// service itself is immutable after startup; all mutable session state
/// lives on the user records.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Sessions never expire, so tokens carry no `exp` claim.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `user_id` and persist it on the user record.
    ///
    /// The append is part of issuance: if it fails, no token is returned,
    /// so a token the client holds is always one the store knows about.
    pub async fn issue(&self, db: &Db, user_id: &RecordId) -> Result<AuthToken, AuthError> {
        let claims = TokenClaims {
            sub: user_id.key().to_string(),
            access: ACCESS_AUTH.to_string(),
            iat: chrono::Utc::now().timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let signed = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Database(e.to_string()))?;
        let token = AuthToken::new(signed);

        QueryBuilder::append_token(db, user_id, &TokenEntry::auth(&token))
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?;

        Ok(token)
    }

    /// Validate a token and resolve it to its user.
    ///
    /// Signature and payload problems are `InvalidToken`; a well-formed
    /// token whose user is gone or whose entry was revoked is
    /// `Unauthenticated`.
    pub async fn verify(&self, db: &Db, token: &AuthToken) -> Result<UserRecord, AuthError> {
        let data = decode::<TokenClaims>(token.as_str(), &self.decoding, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let claims = data.claims;
        if claims.access != ACCESS_AUTH {
            return Err(AuthError::InvalidToken(format!(
                "unexpected access purpose: {}",
                claims.access
            )));
        }

        let user_id = RecordId::from_table_key("user", claims.sub.clone());
        let user = QueryBuilder::find_user_by_id(db, &user_id)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?
            .ok_or(AuthError::Unauthenticated)?;

        // The record must hold this exact token string under "auth". A
        // revoked token still has a valid signature but fails here.
        if !user.holds_token(token) {
            return Err(AuthError::Unauthenticated);
        }

        debug!(user_id = %user.id, "token verified");
        Ok(user)
    }

    /// Remove the exact token string from the user's session list.
    /// Idempotent; other sessions are untouched.
    pub async fn revoke(
        &self,
        db: &Db,
        user_id: &RecordId,
        token: &AuthToken,
    ) -> Result<(), AuthError> {
        QueryBuilder::remove_token(db, user_id, token)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))
    }
}
