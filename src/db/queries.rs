// Database query helpers for SurrealDB.
//
// Every todo query that takes an id also takes the owner and constrains on
// both, so a caller can never reach another user's record through this
// layer. Token list edits are single statements that mutate the stored
// array in place, so a concurrent login and logout on the same user can
// never clobber each other's entries.

use crate::db::schema::*;
use crate::types::{AuthToken, Email};
use anyhow::{anyhow, Result};
use surrealdb::RecordId;

use super::connection::Db;

pub struct QueryBuilder;

impl QueryBuilder {
    /// Insert a new user. The password in `data` must already be hashed.
    ///
    /// Fails if the email is already taken (unique index on `user.email`).
    pub async fn create_user(db: &Db, data: &UserCreate) -> Result<UserRecord> {
        let mut res = db
            .query(
                r#"
                CREATE user SET
                    email = $email,
                    password = $password,
                    tokens = [],
                    created_at = time::now()
                "#,
            )
            .bind(("email", data.email.clone()))
            .bind(("password", data.password.clone()))
            .await?;

        let created: Option<UserRecord> = res.take(0)?;
        created.ok_or_else(|| anyhow!("failed to create user record"))
    }

    pub async fn find_user_by_email(db: &Db, email: &Email) -> Result<Option<UserRecord>> {
        let mut res = db
            .query(
                r#"
                SELECT * FROM user
                WHERE email = $email
                LIMIT 1
                "#,
            )
            .bind(("email", email.clone()))
            .await?;

        let users: Vec<UserRecord> = res.take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_user_by_id(db: &Db, user_id: &RecordId) -> Result<Option<UserRecord>> {
        let mut res = db
            .query("SELECT * FROM user WHERE id = $id LIMIT 1")
            .bind(("id", user_id.clone()))
            .await?;

        let users: Vec<UserRecord> = res.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Append an issued token to the user's session list.
    ///
    /// Errors when the user no longer exists, so token issuance cannot
    /// succeed without the token being persisted.
    pub async fn append_token(db: &Db, user_id: &RecordId, entry: &TokenEntry) -> Result<()> {
        let mut res = db
            .query(
                r#"
                UPDATE user SET tokens += $entry
                WHERE id = $id
                "#,
            )
            .bind(("id", user_id.clone()))
            .bind(("entry", entry.clone()))
            .await?;

        let updated: Vec<UserRecord> = res.take(0)?;
        if updated.is_empty() {
            return Err(anyhow!("no user record to append token to"));
        }
        Ok(())
    }

    /// Remove the exact token string from the user's session list.
    ///
    /// A single statement filtering the stored array in place: an append
    /// that lands while this runs is never overwritten by a stale list.
    /// Idempotent: removing an absent token, or a token from an absent
    /// user, is not an error.
    pub async fn remove_token(db: &Db, user_id: &RecordId, token: &AuthToken) -> Result<()> {
        db.query(
            r#"
            UPDATE user
            SET tokens = array::filter(tokens, |$entry| $entry.token != $tok)
            WHERE id = $id
            "#,
        )
        .bind(("id", user_id.clone()))
        .bind(("tok", token.as_str().to_string()))
        .await?;

        Ok(())
    }

    /// Insert a new todo owned by `owner`. Text must already be validated.
    pub async fn create_todo(db: &Db, owner: &RecordId, text: String) -> Result<TodoRecord> {
        let mut res = db
            .query(
                r#"
                CREATE todo SET
                    text = $text,
                    completed = false,
                    owner = $owner,
                    created_at = time::now()
                "#,
            )
            .bind(("text", text))
            .bind(("owner", owner.clone()))
            .await?;

        let created: Option<TodoRecord> = res.take(0)?;
        created.ok_or_else(|| anyhow!("failed to create todo record"))
    }

    pub async fn list_todos_by_owner(db: &Db, owner: &RecordId) -> Result<Vec<TodoRecord>> {
        let mut res = db
            .query(
                r#"
                SELECT * FROM todo
                WHERE owner = $owner
                ORDER BY created_at ASC
                "#,
            )
            .bind(("owner", owner.clone()))
            .await?;

        let todos: Vec<TodoRecord> = res.take(0)?;
        Ok(todos)
    }

    pub async fn find_todo_for_owner(
        db: &Db,
        todo_id: &RecordId,
        owner: &RecordId,
    ) -> Result<Option<TodoRecord>> {
        let mut res = db
            .query(
                r#"
                SELECT * FROM todo
                WHERE id = $id AND owner = $owner
                LIMIT 1
                "#,
            )
            .bind(("id", todo_id.clone()))
            .bind(("owner", owner.clone()))
            .await?;

        let todo: Option<TodoRecord> = res.take(0)?;
        Ok(todo)
    }

    /// Physically delete the todo and return the removed document, or `None`
    /// when no record matches (id, owner).
    pub async fn delete_todo_for_owner(
        db: &Db,
        todo_id: &RecordId,
        owner: &RecordId,
    ) -> Result<Option<TodoRecord>> {
        let mut res = db
            .query(
                r#"
                DELETE todo
                WHERE id = $id AND owner = $owner
                RETURN BEFORE
                "#,
            )
            .bind(("id", todo_id.clone()))
            .bind(("owner", owner.clone()))
            .await?;

        let removed: Vec<TodoRecord> = res.take(0)?;
        Ok(removed.into_iter().next())
    }

    /// Apply an already-normalized update and return the new document, or
    /// `None` when no record matches (id, owner).
    ///
    /// `completed_at` is written as `NONE` rather than null so the
    /// `option<number>` field definition holds.
    pub async fn update_todo_for_owner(
        db: &Db,
        todo_id: &RecordId,
        owner: &RecordId,
        text: Option<String>,
        completed: bool,
        completed_at: Option<i64>,
    ) -> Result<Option<TodoRecord>> {
        let mut sets = vec!["completed = $completed"];
        if text.is_some() {
            sets.push("text = $text");
        }
        match completed_at {
            Some(_) => sets.push("completedAt = $completed_at"),
            None => sets.push("completedAt = NONE"),
        }

        let query = format!(
            "UPDATE todo SET {} WHERE id = $id AND owner = $owner RETURN AFTER",
            sets.join(", ")
        );

        let mut query = db
            .query(query)
            .bind(("id", todo_id.clone()))
            .bind(("owner", owner.clone()))
            .bind(("completed", completed));

        if let Some(text) = text {
            query = query.bind(("text", text));
        }
        if let Some(at) = completed_at {
            query = query.bind(("completed_at", at));
        }

        let mut res = query.await?;
        let updated: Vec<TodoRecord> = res.take(0)?;
        Ok(updated.into_iter().next())
    }
}
