use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;

pub type Db = Surreal<Any>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: env::var("SURREALDB_URL").unwrap_or_else(|_| "memory".to_string()),
            namespace: env::var("SURREALDB_NAMESPACE").unwrap_or_else(|_| "todo".to_string()),
            database: env::var("SURREALDB_DATABASE").unwrap_or_else(|_| "api".to_string()),
            username: env::var("SURREALDB_USERNAME").ok(),
            password: env::var("SURREALDB_PASSWORD").ok(),
        }
    }
}

pub async fn create_connection(config: DatabaseConfig) -> Result<Db> {
    let db = surrealdb::engine::any::connect(config.url).await?;

    // Sign in if credentials are provided
    if let (Some(username), Some(password)) = (config.username, config.password) {
        db.signin(Root {
            username: &username,
            password: &password,
        })
        .await?;
    }

    // Use the specified namespace and database
    db.use_ns(config.namespace).use_db(config.database).await?;

    Ok(db)
}

pub async fn ensure_schema(db: &Db) -> Result<()> {
    // Define schema for each table
    let schema_queries = vec![
        // User table: the password field holds an argon2id hash, never the
        // plaintext. Tokens are an append log of active sessions.
        "DEFINE TABLE user SCHEMAFULL;
         DEFINE FIELD email ON TABLE user TYPE string;
         DEFINE FIELD password ON TABLE user TYPE string;
         DEFINE FIELD tokens ON TABLE user TYPE array<object> DEFAULT [];
         DEFINE FIELD tokens.*.access ON TABLE user TYPE string;
         DEFINE FIELD tokens.*.token ON TABLE user TYPE string;
         DEFINE FIELD created_at ON TABLE user TYPE datetime DEFAULT time::now();",

        // Todo table: completedAt is epoch milliseconds and is present
        // exactly when completed is true.
        "DEFINE TABLE todo SCHEMAFULL;
         DEFINE FIELD text ON TABLE todo TYPE string;
         DEFINE FIELD completed ON TABLE todo TYPE bool DEFAULT false;
         DEFINE FIELD completedAt ON TABLE todo TYPE option<number>;
         DEFINE FIELD owner ON TABLE todo TYPE record<user>;
         DEFINE FIELD created_at ON TABLE todo TYPE datetime DEFAULT time::now();",

        // Email uniqueness is the store's job, not the handlers'.
        "DEFINE INDEX user_email ON TABLE user COLUMNS email UNIQUE;
         DEFINE INDEX todo_owner ON TABLE todo COLUMNS owner;",
    ];

    for query in schema_queries {
        db.query(query).await?;
    }

    Ok(())
}
