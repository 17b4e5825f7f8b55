pub const DEFAULT_DATABASE_URL: &str = "app.db";
pub const IN_MEMORY_DATABASE_URL: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 8,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_DATABASE_URL)
    }

    /// Path handed to SQLite. Plain paths pass through; SQLAlchemy-style URLs
    /// follow its rules: `sqlite:///app.db` is relative, `sqlite:////abs/app.db`
    /// is absolute and a bare `sqlite://` is in-memory.
    pub fn database_path(&self) -> &str {
        match self.url.strip_prefix("sqlite://") {
            Some("") => IN_MEMORY_DATABASE_URL,
            Some(rest) => rest.strip_prefix('/').unwrap_or(rest),
            None => &self.url,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path() == IN_MEMORY_DATABASE_URL
    }

    /// An in-memory database lives and dies with its connection, so the pool
    /// must hold exactly one.
    pub fn pool_size(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections.max(1)
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}
