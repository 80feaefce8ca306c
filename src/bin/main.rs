use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use todo_api::DatabaseConfig;

#[derive(Parser)]
#[command(name = "todo-api")]
#[command(about = "Multi-user to-do list REST API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(short, long, env = "PORT", default_value = "3000")]
        port: u16,
        #[arg(long, env = "SURREALDB_URL", default_value = "memory")]
        db_url: String,
        /// Process-wide token signing secret
        #[arg(long, env = "JWT_SECRET")]
        jwt_secret: String,
    },
    /// Initialize the database schema
    Init {
        #[arg(long, env = "SURREALDB_URL", default_value = "memory")]
        db_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("todo_api=info".parse()?),
        )
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            db_url,
            jwt_secret,
        } => {
            let db_config = DatabaseConfig {
                url: db_url,
                ..Default::default()
            };
            info!("Using database url: {}", db_config.url);

            let app = todo_api::create_app(db_config, &jwt_secret).await?;

            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
            info!("Server listening on http://0.0.0.0:{}", port);

            axum::serve(listener, app).await?;
        }
        Commands::Init { db_url } => {
            let db_config = DatabaseConfig {
                url: db_url,
                ..Default::default()
            };
            info!("Using database url for initialization: {}", db_config.url);

            info!("Initializing database...");
            let db = todo_api::create_connection(db_config).await?;
            todo_api::ensure_schema(&db).await?;
            info!("Database initialized successfully");
        }
    }

    Ok(())
}
