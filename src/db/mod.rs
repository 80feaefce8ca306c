mod connection;
pub mod queries;
pub mod schema;

pub use connection::{create_connection, ensure_schema, DatabaseConfig, Db};
pub use queries::QueryBuilder;
