use std::sync::Arc;

use tracing::{debug, info};

use crate::database::ports::watch_history::WatchHistoryRepository;
use crate::domain::clock::{Clock, clamp};
use crate::domain::history::{
    WatchHistoryRecord, WatchHistoryUpdate, WatchHistoryWrite,
};
use crate::domain::ids::{TmdbId, UserId};
use crate::domain::keys::RecordFilter;
use crate::error::Result;

/// Watch history has no save gate: every validated update is stored.
#[derive(Clone)]
pub struct WatchHistoryService {
    history: Arc<dyn WatchHistoryRepository>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for WatchHistoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHistoryService")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl WatchHistoryService {
    pub fn new(
        history: Arc<dyn WatchHistoryRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { history, clock }
    }

    pub async fn record(
        &self,
        user_id: UserId,
        tmdb_id: TmdbId,
        update: WatchHistoryUpdate,
    ) -> Result<WatchHistoryRecord> {
        let now = self.clock.now();
        let WatchHistoryUpdate {
            playback,
            watched_at,
            completed,
        } = update;

        let write = WatchHistoryWrite {
            key: playback.identity(user_id, tmdb_id),
            season_number: playback.season_number,
            episode_number: playback.episode_number,
            duration: playback.duration,
            watched: playback.watched,
            meta: playback.meta,
            watched_at: clamp(watched_at, now),
            completed,
            updated_at: now,
        };

        let record = self.history.upsert(write).await?;
        debug!(key = %record.key, completed, "Watch history stored");
        Ok(record)
    }

    pub async fn list(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WatchHistoryRecord>> {
        self.history.list_for_user(user_id).await
    }

    pub async fn delete(&self, filter: &RecordFilter) -> Result<u64> {
        let matching = self.history.find_matching(filter).await?;
        if matching.is_empty() {
            return Ok(0);
        }

        let ids: Vec<_> = matching.iter().map(|record| record.id).collect();
        let deleted = self.history.delete_by_ids(&filter.user_id, &ids).await?;
        info!(
            user_id = %filter.user_id,
            tmdb_id = %filter.tmdb_id,
            deleted,
            "Deleted watch history"
        );
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ports::watch_history::MockWatchHistoryRepository;
    use crate::domain::clock::{FixedClock, epoch_floor};
    use crate::domain::history::WatchHistoryRequest;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn boundary_positions_are_still_recorded() {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 9, 30, 0).unwrap();
        let mut repo = MockWatchHistoryRepository::new();
        repo.expect_upsert()
            .withf(|write| {
                write.watched == 3 && write.watched_at == epoch_floor()
            })
            .times(1)
            .returning(|write| Ok(write.into_record(Uuid::new_v4())));

        let update = serde_json::from_value::<WatchHistoryRequest>(json!({
            "meta": {"title": "Up", "type": "movie"},
            "duration": 5760,
            "watched": 3,
            "watchedAt": "2001-01-01T00:00:00Z"
        }))
        .unwrap()
        .validate()
        .unwrap();

        let service = WatchHistoryService::new(
            Arc::new(repo),
            Arc::new(FixedClock(now)),
        );
        let record = service
            .record(UserId::new("u"), TmdbId::new("14160"), update)
            .await
            .unwrap();
        assert_eq!(record.updated_at, now);
    }
}
