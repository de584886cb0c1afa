use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::database::ports::watch_history::WatchHistoryRepository;
use crate::domain::history::{WatchHistoryRecord, WatchHistoryWrite};
use crate::domain::ids::UserId;
use crate::domain::keys::{IdentityKey, RecordFilter};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct InMemoryWatchHistoryRepository {
    records: Mutex<HashMap<IdentityKey, WatchHistoryRecord>>,
}

impl InMemoryWatchHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut records: Vec<WatchHistoryRecord>) -> Vec<WatchHistoryRecord> {
    records.sort_by(|a, b| {
        b.watched_at.cmp(&a.watched_at).then_with(|| a.id.cmp(&b.id))
    });
    records
}

#[async_trait]
impl WatchHistoryRepository for InMemoryWatchHistoryRepository {
    async fn upsert(
        &self,
        write: WatchHistoryWrite,
    ) -> Result<WatchHistoryRecord> {
        let mut records = self.records.lock().await;
        if let Some(existing) = records.get_mut(&write.key) {
            write.apply_to(existing);
            return Ok(existing.clone());
        }
        let record = write.into_record(Uuid::new_v4());
        records.insert(record.key.clone(), record.clone());
        Ok(record)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WatchHistoryRecord>> {
        let records = self.records.lock().await;
        Ok(newest_first(
            records
                .values()
                .filter(|record| record.key.user_id == *user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_matching(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<WatchHistoryRecord>> {
        let records = self.records.lock().await;
        Ok(newest_first(
            records
                .values()
                .filter(|record| filter.matches(&record.key))
                .cloned()
                .collect(),
        ))
    }

    async fn delete_by_ids(&self, user_id: &UserId, ids: &[Uuid]) -> Result<u64> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| {
            record.key.user_id != *user_id || !ids.contains(&record.id)
        });
        Ok((before - records.len()) as u64)
    }
}
