// REST API surface: router assembly and request handlers.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::TokenService;
use crate::db::Db;

pub mod todos;
pub mod users;

/// Shared state handed to every handler.
///
/// Both fields are cheap to clone and read-only after startup; all mutable
/// state lives in the store.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: Db, tokens: TokenService) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
        }
    }
}

/// Build the application router.
///
/// Routes taking an `AuthUser` argument are protected; registration and
/// login are the only open endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/todos", post(todos::create).get(todos::list))
        .route(
            "/todos/{id}",
            get(todos::get_by_id)
                .delete(todos::remove)
                .patch(todos::update),
        )
        .route("/users", post(users::register))
        .route("/users/me", get(users::me))
        .route("/users/login", post(users::login))
        .route("/users/me/token", delete(users::logout))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
