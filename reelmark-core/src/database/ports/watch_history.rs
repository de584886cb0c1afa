use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::history::{WatchHistoryRecord, WatchHistoryWrite};
use crate::domain::ids::UserId;
use crate::domain::keys::RecordFilter;
use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatchHistoryRepository: Send + Sync {
    async fn upsert(
        &self,
        write: WatchHistoryWrite,
    ) -> Result<WatchHistoryRecord>;

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WatchHistoryRecord>>;

    async fn find_matching(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<WatchHistoryRecord>>;

    async fn delete_by_ids(&self, user_id: &UserId, ids: &[Uuid]) -> Result<u64>;
}
