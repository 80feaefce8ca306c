//! To-do CRUD handlers, all scoped to the authenticated owner.
//!
//! Every by-id operation resolves under the compound constraint
//! (id, owner): an id that exists but belongs to another user is answered
//! exactly like an id that does not exist (404), so callers cannot probe
//! for other users' records. Ids that cannot be a store-generated key are
//! rejected without touching the store at all.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::db::schema::{parse_todo_id, TodoBody, TodoCreate, TodoUpdate};
use crate::db::QueryBuilder;
use crate::errors::ApiError;

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub todos: Vec<TodoBody>,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub todo: TodoBody,
}

/// POST /todos: create a todo owned by the caller. Responds with the
/// created document.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<TodoCreate>,
) -> Result<Json<TodoBody>, ApiError> {
    let text = body.text.trim();
    if text.is_empty() {
        return Err(ApiError::Validation("text is required".to_string()));
    }

    let todo = QueryBuilder::create_todo(&state.db, &auth.user.id, text.to_string())
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

    Ok(Json(TodoBody::from(&todo)))
}

/// GET /todos: list the caller's todos.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<TodoListResponse>, ApiError> {
    let todos = QueryBuilder::list_todos_by_owner(&state.db, &auth.user.id)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

    Ok(Json(TodoListResponse {
        todos: todos.iter().map(TodoBody::from).collect(),
    }))
}

/// GET /todos/{id}: fetch one of the caller's todos.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo_id = parse_todo_id(&id).ok_or(ApiError::NotFound)?;

    let todo = QueryBuilder::find_todo_for_owner(&state.db, &todo_id, &auth.user.id)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(TodoResponse {
        todo: TodoBody::from(&todo),
    }))
}

/// DELETE /todos/{id}: physically remove one of the caller's todos,
/// responding with the removed document.
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo_id = parse_todo_id(&id).ok_or(ApiError::NotFound)?;

    let todo = QueryBuilder::delete_todo_for_owner(&state.db, &todo_id, &auth.user.id)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(TodoResponse {
        todo: TodoBody::from(&todo),
    }))
}

/// PATCH /todos/{id}: update text and/or completion state.
///
/// `completed: true` stamps `completedAt` with the current time; anything
/// else (false, or simply omitted) forces the pair back to (false, null).
/// Inconsistent input is normalized, not rejected.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<TodoUpdate>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo_id = parse_todo_id(&id).ok_or(ApiError::NotFound)?;

    let text = match body.text {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ApiError::Validation("text must not be empty".to_string()));
            }
            Some(trimmed.to_string())
        }
        None => None,
    };

    let (completed, completed_at) = match body.completed {
        Some(true) => (true, Some(chrono::Utc::now().timestamp_millis())),
        _ => (false, None),
    };

    let todo = QueryBuilder::update_todo_for_owner(
        &state.db,
        &todo_id,
        &auth.user.id,
        text,
        completed,
        completed_at,
    )
    .await
    .map_err(|e| ApiError::Persistence(e.to_string()))?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(TodoResponse {
        todo: TodoBody::from(&todo),
    }))
}
