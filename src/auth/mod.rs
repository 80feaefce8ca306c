//! Authentication: token service and request guard.
//!
//! Tokens are signed, tamper-evident strings binding a user identity to the
//! fixed "auth" access purpose. Issued tokens are stored on the user record
//! so individual sessions can be revoked (logout) without invalidating the
//! user's other sessions.
//!
//! ## Security model
//!
//! - Identity is established once per request by the [`AuthUser`] extractor,
//!   before any handler runs (fail-closed).
//! - Every resource operation downstream is scoped by the resolved user's
//!   id; ids alone never grant access.
//! - Passwords are stored only as argon2id hashes.

mod guard;
mod token;

pub use guard::{AuthUser, AUTH_HEADER};
pub use token::{AuthError, TokenClaims, TokenService};
