use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::database::ports::progress::ProgressRepository;
use crate::domain::ids::{TmdbId, UserId};
use crate::domain::keys::{IdentityKey, KeySlot, RecordFilter};
use crate::domain::progress::{ProgressRecord, ProgressWrite};
use crate::error::Result;

/// Progress store keyed by identity. The map key is the uniqueness
/// constraint, so duplicates cannot exist.
#[derive(Debug, Default)]
pub struct InMemoryProgressRepository {
    records: Mutex<HashMap<IdentityKey, ProgressRecord>>,
}

impl InMemoryProgressRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(mut records: Vec<ProgressRecord>) -> Vec<ProgressRecord> {
    records.sort_by(|a, b| {
        b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id))
    });
    records
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn upsert(&self, write: ProgressWrite) -> Result<ProgressRecord> {
        let mut records = self.records.lock().await;
        let record = match records.get_mut(&write.key) {
            Some(existing) => {
                write.apply_to(existing);
                existing.clone()
            }
            None => {
                let record = write.into_record(Uuid::new_v4());
                records.insert(record.key.clone(), record.clone());
                record
            }
        };
        Ok(record)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProgressRecord>> {
        let records = self.records.lock().await;
        Ok(sorted(
            records
                .values()
                .filter(|record| record.key.user_id == *user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_season_siblings(
        &self,
        user_id: &UserId,
        tmdb_id: &TmdbId,
        season_id: &str,
        exclude_episode: &KeySlot,
    ) -> Result<Vec<ProgressRecord>> {
        let records = self.records.lock().await;
        Ok(sorted(
            records
                .values()
                .filter(|record| {
                    record.key.user_id == *user_id
                        && record.key.tmdb_id == *tmdb_id
                        && record.key.season.as_id() == Some(season_id)
                        && record.key.episode != *exclude_episode
                })
                .cloned()
                .collect(),
        ))
    }

    async fn find_matching(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<ProgressRecord>> {
        let records = self.records.lock().await;
        Ok(sorted(
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
