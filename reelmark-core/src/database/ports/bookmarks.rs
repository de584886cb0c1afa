use async_trait::async_trait;

use crate::domain::bookmark::Bookmark;
use crate::domain::ids::{TmdbId, UserId};
use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Creates or replaces the bookmark for `(user_id, tmdb_id)`.
    async fn upsert(&self, bookmark: Bookmark) -> Result<Bookmark>;

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Bookmark>>;

    /// Returns whether a bookmark existed.
    async fn delete(&self, user_id: &UserId, tmdb_id: &TmdbId) -> Result<bool>;
}
