use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use pizzeria_service::{Database, DatabaseConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod handlers;
mod models;
mod serializer;

use handlers::{AppState, router};

#[derive(Parser)]
#[command(version)]
struct Cli {
    /// SQLite database path or `sqlite:///` URL; defaults to `app.db`
    #[arg(long, env = "DB_URI", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations and serve the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0:5555")]
        bind: String,
    },
    /// Apply pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli
        .database_url
        .filter(|url| !url.trim().is_empty())
        .map(DatabaseConfig::new)
        .unwrap_or_default();

    let db = Database::connect(&config)?;
    let applied = db.run_pending_migrations()?;
    info!(count = applied.len(), "database schema up to date");

    match cli.command {
        Commands::Migrate => Ok(()),
        Commands::Serve { bind } => {
            let app = router(AppState::new(db));

            let listener = tokio::net::TcpListener::bind(&bind).await?;
            info!("Pizzeria API listening on {}", listener.local_addr()?);

            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    tokio::signal::ctrl_c().await.ok();
                })
                .await?;

            Ok(())
        }
    }
}
