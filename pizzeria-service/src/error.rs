#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Price must be between 1 and 30, got {0}")]
    InvalidPrice(i32),
    #[error("{table} row {id} does not exist")]
    MissingReference { table: &'static str, id: i32 },
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("Migration failed: {0}")]
    Migration(String),
}
