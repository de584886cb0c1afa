use std::sync::Arc;

use tracing::info;

use crate::database::ports::bookmarks::BookmarkRepository;
use crate::domain::bookmark::{Bookmark, BookmarkUpdate};
use crate::domain::clock::Clock;
use crate::domain::ids::{TmdbId, UserId};
use crate::error::Result;

#[derive(Clone)]
pub struct BookmarkService {
    bookmarks: Arc<dyn BookmarkRepository>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for BookmarkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookmarkService")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl BookmarkService {
    pub fn new(
        bookmarks: Arc<dyn BookmarkRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { bookmarks, clock }
    }

    pub async fn save(
        &self,
        user_id: UserId,
        tmdb_id: TmdbId,
        update: BookmarkUpdate,
    ) -> Result<Bookmark> {
        let bookmark = self
            .bookmarks
            .upsert(Bookmark {
                user_id,
                tmdb_id,
                meta: update.meta,
                group: update.group,
                favorite_episodes: update.favorite_episodes,
                updated_at: self.clock.now(),
            })
            .await?;
        info!(
            user_id = %bookmark.user_id,
            tmdb_id = %bookmark.tmdb_id,
            "Bookmark saved"
        );
        Ok(bookmark)
    }

    pub async fn list(&self, user_id: &UserId) -> Result<Vec<Bookmark>> {
        self.bookmarks.list_for_user(user_id).await
    }

    /// Removing a bookmark that does not exist is not an error.
    pub async fn remove(&self, user_id: &UserId, tmdb_id: &TmdbId) -> Result<()> {
        let existed = self.bookmarks.delete(user_id, tmdb_id).await?;
        info!(%user_id, %tmdb_id, existed, "Bookmark removed");
        Ok(())
    }
}
