//! Storage backend selection at boot.

use anyhow::{Context, Result, bail};
use reelmark_core::application::unit_of_work::AppUnitOfWork;
use reelmark_core::database::postgres::PostgresDatabase;
use tracing::{info, warn};

use crate::infra::config::Config;

/// Connects the configured backend. Without a database URL only a
/// dev-mode instance may start, on process-local storage.
pub async fn build_unit_of_work(config: &Config) -> Result<AppUnitOfWork> {
    let Some(url) = config.database.url.as_deref() else {
        if !config.dev_mode {
            bail!("DATABASE_URL is required outside dev mode");
        }
        warn!("Running on in-memory storage; data is lost on restart");
        return Ok(AppUnitOfWork::in_memory());
    };

    let db = connect(url, config.database.max_connections).await?;
    if config.database.run_migrations {
        db.run_migrations()
            .await
            .context("failed to apply database migrations")?;
    }

    Ok(AppUnitOfWork::postgres(&db))
}

pub async fn connect(url: &str, max_connections: u32) -> Result<PostgresDatabase> {
    let db = PostgresDatabase::connect(url, max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!(max_connections, "Connected to PostgreSQL");
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelmark_core::application::unit_of_work::StorageBackend;

    #[tokio::test]
    async fn dev_mode_without_url_falls_back_to_memory() {
        let uow = build_unit_of_work(&Config::development())
            .await
            .expect("in-memory backend");
        assert_eq!(uow.backend, StorageBackend::InMemory);
    }

    #[tokio::test]
    async fn production_without_url_refuses_to_start() {
        let config = Config {
            dev_mode: false,
            ..Config::development()
        };
        assert!(build_unit_of_work(&config).await.is_err());
    }
}
