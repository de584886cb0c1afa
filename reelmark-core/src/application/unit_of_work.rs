use std::fmt;
use std::sync::Arc;

use crate::database::memory::{
    InMemoryBookmarkRepository, InMemoryProgressRepository,
    InMemorySessionRepository, InMemorySettingsRepository,
    InMemoryWatchHistoryRepository,
};
use crate::database::ports::{
    bookmarks::BookmarkRepository, progress::ProgressRepository,
    sessions::SessionRepository, settings::SettingsRepository,
    watch_history::WatchHistoryRepository,
};
#[cfg(feature = "database")]
use crate::database::postgres::{
    PostgresBookmarkRepository, PostgresDatabase, PostgresProgressRepository,
    PostgresSessionRepository, PostgresSettingsRepository,
    PostgresWatchHistoryRepository,
};

/// Which family of adapters a unit of work was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    InMemory,
    Postgres,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::InMemory => f.write_str("in-memory"),
            StorageBackend::Postgres => f.write_str("postgres"),
        }
    }
}

/// Aggregates the repository ports used by application services.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub backend: StorageBackend,
    pub progress: Arc<dyn ProgressRepository>,
    pub watch_history: Arc<dyn WatchHistoryRepository>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl AppUnitOfWork {
    /// Process-local adapters. Nothing survives a restart.
    pub fn in_memory() -> Self {
        Self {
            backend: StorageBackend::InMemory,
            progress: Arc::new(InMemoryProgressRepository::new()),
            watch_history: Arc::new(InMemoryWatchHistoryRepository::new()),
            bookmarks: Arc::new(InMemoryBookmarkRepository::new()),
            settings: Arc::new(InMemorySettingsRepository::new()),
            sessions: Arc::new(InMemorySessionRepository::new()),
        }
    }

    #[cfg(feature = "database")]
    pub fn postgres(db: &PostgresDatabase) -> Self {
        let pool = db.pool().clone();
        Self {
            backend: StorageBackend::Postgres,
            progress: Arc::new(PostgresProgressRepository::new(pool.clone())),
            watch_history: Arc::new(PostgresWatchHistoryRepository::new(
                pool.clone(),
            )),
            bookmarks: Arc::new(PostgresBookmarkRepository::new(pool.clone())),
            settings: Arc::new(PostgresSettingsRepository::new(pool.clone())),
            sessions: Arc::new(PostgresSessionRepository::new(pool)),
        }
    }
}
