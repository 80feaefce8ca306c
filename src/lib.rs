// Core modules
pub mod api;
pub mod auth;
pub mod db;
pub mod errors;
pub mod types;

// Re-export key types and functions
pub use api::{create_router, AppState};
pub use auth::{AuthUser, TokenService, AUTH_HEADER};
pub use db::{create_connection, ensure_schema, DatabaseConfig, Db};
pub use errors::ApiError;

use anyhow::Result;
use axum::Router;

/// Convenience function to create a fully configured application router.
///
/// This connects to the store, ensures the schema, and wires the token
/// service with the given signing secret.
pub async fn create_app(config: DatabaseConfig, jwt_secret: &str) -> Result<Router> {
    let db = create_connection(config).await?;
    ensure_schema(&db).await?;

    let state = AppState::new(db, TokenService::new(jwt_secret));
    Ok(create_router(state))
}
