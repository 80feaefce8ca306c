//! NewType wrappers for strong typing throughout the API.
//!
//! These types prevent accidental mixing of semantically different strings
//! (e.g., passing a raw password where a signed token is expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a NewType wrapper with standard trait implementations.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(
    /// A user's email address.
    ///
    /// Unique across the `user` table (enforced by the store). Format
    /// validation happens at registration time; an `Email` that reaches the
    /// database has already passed it.
    Email
);

newtype_string!(
    /// A signed authentication token.
    ///
    /// Asserts a user identity and the fixed "auth" access purpose. Every
    /// issued token is also stored on the owning user record so that a
    /// single session can be revoked without invalidating the others.
    AuthToken
);

/// The only access purpose issued by this API.
pub const ACCESS_AUTH: &str = "auth";
