use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ids::{TmdbId, UserId};
use crate::domain::keys::{KeySlot, RecordFilter};
use crate::domain::progress::{ProgressRecord, ProgressWrite};
use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Creates the record for `write.key` or refreshes its mutable fields.
    /// Must be atomic with respect to concurrent calls for the same key.
    async fn upsert(&self, write: ProgressWrite) -> Result<ProgressRecord>;

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProgressRecord>>;

    /// Records of the same season, excluding the one whose episode slot
    /// equals `exclude_episode`.
    async fn find_season_siblings(
        &self,
        user_id: &UserId,
        tmdb_id: &TmdbId,
        season_id: &str,
        exclude_episode: &KeySlot,
    ) -> Result<Vec<ProgressRecord>>;

    async fn find_matching(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<ProgressRecord>>;

    /// Deletes the given records, scoped to `user_id`. Returns rows removed.
    async fn delete_by_ids(&self, user_id: &UserId, ids: &[Uuid]) -> Result<u64>;
}
