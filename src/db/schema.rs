use serde::{Deserialize, Serialize};
use surrealdb::{sql::Datetime, RecordId};

use crate::types::{AuthToken, Email, ACCESS_AUTH};

/// Length of the record keys SurrealDB generates for new records.
const RECORD_KEY_LEN: usize = 20;

/// Persisted representation of a user in SurrealDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable database identifier for this user (table: `user`).
    pub id: RecordId,
    /// Unique email address.
    pub email: Email,
    /// One-way argon2id hash of the password. Never the plaintext.
    pub password: String,
    /// Active sessions, in issuance order. A user may hold several tokens
    /// at once (one per logged-in client).
    pub tokens: Vec<TokenEntry>,
    /// When this record was first created.
    pub created_at: Option<Datetime>,
}

impl UserRecord {
    /// Whether this record holds the given token under the "auth" purpose.
    pub fn holds_token(&self, token: &AuthToken) -> bool {
        self.tokens
            .iter()
            .any(|entry| entry.access == ACCESS_AUTH && entry.token == token.as_str())
    }
}

/// One issued session token stored on a user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEntry {
    /// Fixed access purpose; always "auth" in this API.
    pub access: String,
    /// The signed token string exactly as handed to the client.
    pub token: String,
}

impl TokenEntry {
    pub fn auth(token: &AuthToken) -> Self {
        Self {
            access: ACCESS_AUTH.to_string(),
            token: token.as_str().to_string(),
        }
    }
}

/// Payload used when inserting a new user into the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: Email,
    /// Already hashed by the caller.
    pub password: String,
}

/// Public projection of a user, safe to serialize in responses.
///
/// Deliberately omits `password` and `tokens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBody {
    pub id: String,
    pub email: Email,
}

impl From<&UserRecord> for UserBody {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.key().to_string(),
            email: user.email.clone(),
        }
    }
}

/// Persisted representation of a to-do item in SurrealDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoRecord {
    /// Stable database identifier for this todo (table: `todo`).
    pub id: RecordId,
    /// Trimmed, non-empty text.
    pub text: String,
    /// Completion flag; defaults to false on creation.
    pub completed: bool,
    /// Completion time as epoch milliseconds. Present iff `completed`.
    #[serde(rename = "completedAt")]
    pub completed_at: Option<i64>,
    /// The creating user. Immutable after creation; every lookup is
    /// constrained by this field.
    pub owner: RecordId,
    /// When this record was first created.
    pub created_at: Option<Datetime>,
}

/// Public projection of a todo, as sent in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoBody {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "completedAt")]
    pub completed_at: Option<i64>,
}

impl From<&TodoRecord> for TodoBody {
    fn from(todo: &TodoRecord) -> Self {
        Self {
            id: todo.id.key().to_string(),
            text: todo.text.clone(),
            completed: todo.completed,
            completed_at: todo.completed_at,
        }
    }
}

/// Request body for POST /todos.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoCreate {
    #[serde(default)]
    pub text: String,
}

/// Request body for PATCH /todos/{id}.
///
/// Only these two fields are mutable. Anything else in the request body is
/// ignored by construction rather than filtered at runtime.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoUpdate {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Parse a path segment into a `todo` record id.
///
/// Returns `None` when the segment cannot be a key the store ever generated
/// (wrong length or non-alphanumeric characters), so handlers can answer 404
/// without a store round-trip. An absent-but-well-formed key still parses and
/// resolves to 404 through the query path, keeping the two cases
/// indistinguishable to the caller.
pub fn parse_todo_id(raw: &str) -> Option<RecordId> {
    if raw.len() != RECORD_KEY_LEN {
        return None;
    }
    if !raw
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return None;
    }
    Some(RecordId::from_table_key("todo", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_todo_id_valid() {
        let id = parse_todo_id("abcdefghij0123456789").unwrap();
        assert_eq!(id.table(), "todo");
        assert_eq!(id.key().to_string(), "abcdefghij0123456789");
    }

    #[test]
    fn test_parse_todo_id_rejects_malformed() {
        assert!(parse_todo_id("123").is_none());
        assert!(parse_todo_id("").is_none());
        assert!(parse_todo_id("ABCDEFGHIJ0123456789").is_none());
        assert!(parse_todo_id("abcdefghij012345678!").is_none());
        assert!(parse_todo_id("abcdefghij01234567890").is_none());
    }

    #[test]
    fn test_user_body_omits_secrets() {
        let user = UserRecord {
            id: RecordId::from_table_key("user", "abc123"),
            email: Email::new("user@example.com"),
            password: "$argon2id$hash".to_string(),
            tokens: vec![TokenEntry {
                access: ACCESS_AUTH.to_string(),
                token: "tok".to_string(),
            }],
            created_at: None,
        };

        let body = UserBody::from(&user);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["email"], "user@example.com");
        assert_eq!(json["id"], "abc123");
        assert!(json.get("password").is_none());
        assert!(json.get("tokens").is_none());
    }

    #[test]
    fn test_holds_token_requires_auth_access() {
        let mut user = UserRecord {
            id: RecordId::from_table_key("user", "abc123"),
            email: Email::new("user@example.com"),
            password: "hash".to_string(),
            tokens: vec![TokenEntry {
                access: "other".to_string(),
                token: "tok".to_string(),
            }],
            created_at: None,
        };

        assert!(!user.holds_token(&AuthToken::new("tok")));

        user.tokens.push(TokenEntry::auth(&AuthToken::new("tok")));
        assert!(user.holds_token(&AuthToken::new("tok")));
        assert!(!user.holds_token(&AuthToken::new("missing")));
    }

    #[test]
    fn test_todo_body_wire_format() {
        let todo = TodoRecord {
            id: RecordId::from_table_key("todo", "xyz789"),
            text: "walk the dog".to_string(),
            completed: true,
            completed_at: Some(333),
            owner: RecordId::from_table_key("user", "abc123"),
            created_at: None,
        };

        let json = serde_json::to_value(TodoBody::from(&todo)).unwrap();
        assert_eq!(json["completedAt"], 333);
        assert_eq!(json["completed"], true);
        assert_eq!(json["text"], "walk the dog");
    }
}
