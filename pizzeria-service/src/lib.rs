use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

pub mod config;
pub mod error;
pub mod models;
pub mod schema;
pub mod store;

pub use config::DatabaseConfig;
pub use error::StoreError;
pub use store::RestaurantStore;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Name of a foreign key constraint: `fk_<table>_<column>_<referred_table>`.
pub fn foreign_key_name(table: &str, column: &str, referred_table: &str) -> String {
    format!("fk_{table}_{column}_{referred_table}")
}

/// Per-connection pragmas. Pooled writers wait on each other for up to five
/// seconds instead of failing with `database is locked`.
#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(
            "PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;",
        )
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Handle to the relational store: the connection pool plus the migrations
/// that define its schema. Built once at startup and shared by cloning.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    pub fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<SqliteConnection>::new(config.database_path());
        let pool = Pool::builder()
            .max_size(config.pool_size())
            .connection_customizer(Box::new(ConnectionOptions))
            .build(manager)?;

        info!(
            database = config.database_path(),
            pool_size = config.pool_size(),
            "connected to database"
        );

        Ok(Self { pool })
    }

    pub fn connection(&self) -> Result<DbConnection, StoreError> {
        Ok(self.pool.get()?)
    }

    /// Applies every embedded migration not yet recorded in the database and
    /// returns the versions that ran.
    pub fn run_pending_migrations(&self) -> Result<Vec<String>, StoreError> {
        let mut pooled = self.connection()?;
        let conn: &mut SqliteConnection = &mut pooled;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::Migration(e.to_string()))?
            .into_iter()
            .map(|version| version.to_string())
            .collect::<Vec<_>>();

        for version in &applied {
            info!(%version, "applied migration");
        }

        Ok(applied)
    }
}
