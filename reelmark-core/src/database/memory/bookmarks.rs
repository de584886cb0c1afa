use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::ports::bookmarks::BookmarkRepository;
use crate::domain::bookmark::Bookmark;
use crate::domain::ids::{TmdbId, UserId};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct InMemoryBookmarkRepository {
    bookmarks: RwLock<HashMap<(UserId, TmdbId), Bookmark>>,
}

impl InMemoryBookmarkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryBookmarkRepository {
    async fn upsert(&self, bookmark: Bookmark) -> Result<Bookmark> {
        self.bookmarks.write().await.insert(
            (bookmark.user_id.clone(), bookmark.tmdb_id.clone()),
            bookmark.clone(),
        );
        Ok(bookmark)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Bookmark>> {
        let bookmarks = self.bookmarks.read().await;
        let mut found: Vec<_> = bookmarks
            .values()
            .filter(|bookmark| bookmark.user_id == *user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.tmdb_id.cmp(&b.tmdb_id))
        });
        Ok(found)
    }

    async fn delete(&self, user_id: &UserId, tmdb_id: &TmdbId) -> Result<bool> {
        Ok(self
            .bookmarks
            .write()
            .await
            .remove(&(user_id.clone(), tmdb_id.clone()))
            .is_some())
    }
}
