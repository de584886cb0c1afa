use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::database::ports::bookmarks::BookmarkRepository;
use crate::domain::bookmark::Bookmark;
use crate::domain::ids::{TmdbId, UserId};
use crate::domain::meta::TitleMeta;
use crate::error::{CoreError, Result};

#[derive(Debug, FromRow)]
struct BookmarkRow {
    user_id: String,
    tmdb_id: String,
    meta: Json<TitleMeta>,
    groups: Vec<String>,
    favorite_episodes: Vec<String>,
    updated_at: DateTime<Utc>,
}

impl From<BookmarkRow> for Bookmark {
    fn from(row: BookmarkRow) -> Self {
        Self {
            user_id: UserId::new(row.user_id),
            tmdb_id: TmdbId::new(row.tmdb_id),
            meta: row.meta.0,
            group: row.groups,
            favorite_episodes: row.favorite_episodes,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostgresBookmarkRepository {
    pool: PgPool,
}

impl PostgresBookmarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookmarkRepository for PostgresBookmarkRepository {
    async fn upsert(&self, bookmark: Bookmark) -> Result<Bookmark> {
        let row = sqlx::query_as::<_, BookmarkRow>(
            r#"
            INSERT INTO bookmarks (
                user_id, tmdb_id, meta, groups, favorite_episodes, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, tmdb_id) DO UPDATE SET
                meta = EXCLUDED.meta,
                groups = EXCLUDED.groups,
                favorite_episodes = EXCLUDED.favorite_episodes,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, tmdb_id, meta, groups, favorite_episodes, updated_at
            "#,
        )
        .bind(bookmark.user_id.as_str())
        .bind(bookmark.tmdb_id.as_str())
        .bind(Json(&bookmark.meta))
        .bind(&bookmark.group)
        .bind(&bookmark.favorite_episodes)
        .bind(bookmark.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to upsert bookmark: {e}"))
        })?;

        Ok(row.into())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Bookmark>> {
        let rows = sqlx::query_as::<_, BookmarkRow>(
            r#"
            SELECT user_id, tmdb_id, meta, groups, favorite_episodes, updated_at
            FROM bookmarks
            WHERE user_id = $1
            ORDER BY updated_at DESC, tmdb_id
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to list bookmarks: {e}"))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, user_id: &UserId, tmdb_id: &TmdbId) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM bookmarks WHERE user_id = $1 AND tmdb_id = $2",
        )
        .bind(user_id.as_str())
        .bind(tmdb_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to delete bookmark: {e}"))
        })?;

        Ok(result.rows_affected() > 0)
    }
}
