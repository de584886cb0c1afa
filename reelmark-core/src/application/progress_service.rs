use std::sync::Arc;

use tracing::{debug, info};

use super::cleanup::plan_cleanup;
use super::evaluator::ProgressEvaluator;
use crate::database::ports::progress::ProgressRepository;
use crate::domain::clock::{Clock, clamp};
use crate::domain::ids::{TmdbId, UserId};
use crate::domain::keys::RecordFilter;
use crate::domain::progress::{ProgressRecord, ProgressUpdate, ProgressWrite};
use crate::error::Result;

/// Result of a progress update.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressOutcome {
    Persisted(ProgressRecord),
    /// The gate declined the write. Carries what would have been stored so
    /// the caller can still acknowledge the update.
    Skipped(ProgressWrite),
}

#[derive(Clone)]
pub struct ProgressService {
    progress: Arc<dyn ProgressRepository>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ProgressService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressService")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl ProgressService {
    pub fn new(
        progress: Arc<dyn ProgressRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { progress, clock }
    }

    pub async fn update(
        &self,
        user_id: UserId,
        tmdb_id: TmdbId,
        update: ProgressUpdate,
    ) -> Result<ProgressOutcome> {
        let ProgressUpdate {
            playback,
            updated_at,
        } = update;
        let key = playback.identity(user_id, tmdb_id);
        let write = ProgressWrite {
            key,
            season_number: playback.season_number,
            episode_number: playback.episode_number,
            duration: playback.duration,
            watched: playback.watched,
            meta: playback.meta.clone(),
            updated_at: clamp(updated_at, self.clock.now()),
        };

        let evaluator = ProgressEvaluator::new(self.progress.as_ref());
        if !evaluator.should_persist(&write.key, &playback).await? {
            debug!(key = %write.key, "Progress update not worth keeping");
            return Ok(ProgressOutcome::Skipped(write));
        }

        let record = self.progress.upsert(write).await?;
        debug!(key = %record.key, id = %record.id, "Progress stored");
        Ok(ProgressOutcome::Persisted(record))
    }

    pub async fn list(&self, user_id: &UserId) -> Result<Vec<ProgressRecord>> {
        self.progress.list_for_user(user_id).await
    }

    /// Deletes every record matching `filter`. Nothing is issued to the
    /// store when the match set is empty.
    pub async fn delete(&self, filter: &RecordFilter) -> Result<u64> {
        let matching = self.progress.find_matching(filter).await?;
        if matching.is_empty() {
            return Ok(0);
        }

        let ids: Vec<_> = matching.iter().map(|record| record.id).collect();
        let deleted = self.progress.delete_by_ids(&filter.user_id, &ids).await?;
        info!(
            user_id = %filter.user_id,
            tmdb_id = %filter.tmdb_id,
            deleted,
            "Deleted progress"
        );
        Ok(deleted)
    }

    /// Prunes records that fail retention. Returns the number removed.
    pub async fn cleanup(&self, user_id: &UserId) -> Result<u64> {
        let records = self.progress.list_for_user(user_id).await?;
        let doomed = plan_cleanup(&records);
        if doomed.is_empty() {
            debug!(%user_id, scanned = records.len(), "Nothing to clean up");
            return Ok(0);
        }

        let deleted = self.progress.delete_by_ids(user_id, &doomed).await?;
        info!(%user_id, scanned = records.len(), deleted, "Cleaned up progress");
        Ok(deleted)
    }
}
