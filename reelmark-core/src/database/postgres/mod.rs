//! PostgreSQL adapters implementing the database ports.

mod bookmarks;
mod progress;
mod sessions;
mod settings;
mod watch_history;

pub use bookmarks::PostgresBookmarkRepository;
pub use progress::PostgresProgressRepository;
pub use sessions::PostgresSessionRepository;
pub use settings::PostgresSettingsRepository;
pub use watch_history::PostgresWatchHistoryRepository;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::domain::keys::KeySlot;
use crate::error::{CoreError, Result};

/// Owns the connection pool shared by every Postgres repository.
#[derive(Debug, Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(url)
            .await?;

        info!(max_connections, "Database pool initialized");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        crate::MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| CoreError::Internal(format!("Migration failed: {e}")))?;
        info!("Database migrations applied");
        Ok(())
    }
}

/// Rebuilds a slot from its stored `(tag, value)` columns.
pub(crate) fn decode_slot(column: &str, tag: i16, value: String) -> Result<KeySlot> {
    KeySlot::from_columns(tag, value).ok_or_else(|| {
        CoreError::InvalidRecord(format!("unknown {column} tag {tag}"))
    })
}
