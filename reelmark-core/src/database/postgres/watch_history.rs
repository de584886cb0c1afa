use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::decode_slot;
use crate::database::ports::watch_history::WatchHistoryRepository;
use crate::domain::history::{WatchHistoryRecord, WatchHistoryWrite};
use crate::domain::ids::{TmdbId, UserId};
use crate::domain::keys::{IdentityKey, RecordFilter};
use crate::domain::meta::TitleMeta;
use crate::error::{CoreError, Result};

const COLUMNS: &str = "id, user_id, tmdb_id, season_tag, season_id, \
    episode_tag, episode_id, season_number, episode_number, duration, \
    watched, meta, watched_at, completed, updated_at";

#[derive(Debug, FromRow)]
struct HistoryRow {
    id: Uuid,
    user_id: String,
    tmdb_id: String,
    season_tag: i16,
    season_id: String,
    episode_tag: i16,
    episode_id: String,
    season_number: Option<i32>,
    episode_number: Option<i32>,
    duration: i64,
    watched: i64,
    meta: Json<TitleMeta>,
    watched_at: DateTime<Utc>,
    completed: bool,
    updated_at: DateTime<Utc>,
}

impl HistoryRow {
    fn into_record(self) -> Result<WatchHistoryRecord> {
        Ok(WatchHistoryRecord {
            id: self.id,
            key: IdentityKey {
                user_id: UserId::new(self.user_id),
                tmdb_id: TmdbId::new(self.tmdb_id),
                season: decode_slot("season", self.season_tag, self.season_id)?,
                episode: decode_slot(
                    "episode",
                    self.episode_tag,
                    self.episode_id,
                )?,
            },
            season_number: self.season_number,
            episode_number: self.episode_number,
            duration: self.duration,
            watched: self.watched,
            meta: self.meta.0,
            watched_at: self.watched_at,
            completed: self.completed,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PostgresWatchHistoryRepository {
    pool: PgPool,
}

impl PostgresWatchHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl WatchHistoryRepository for PostgresWatchHistoryRepository {
    async fn upsert(
        &self,
        write: WatchHistoryWrite,
    ) -> Result<WatchHistoryRecord> {
        let (season_tag, season_id) = write.key.season.to_columns();
        let (episode_tag, episode_id) = write.key.episode.to_columns();
        let sql = format!(
            r#"
            INSERT INTO watch_history (
                id, user_id, tmdb_id, season_tag, season_id, episode_tag,
                episode_id, season_number, episode_number, duration, watched,
                meta, watched_at, completed, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT ON CONSTRAINT watch_history_identity DO UPDATE SET
                duration = EXCLUDED.duration,
                watched = EXCLUDED.watched,
                meta = EXCLUDED.meta,
                watched_at = EXCLUDED.watched_at,
                completed = EXCLUDED.completed,
                updated_at = EXCLUDED.updated_at
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, HistoryRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(write.key.user_id.as_str())
            .bind(write.key.tmdb_id.as_str())
            .bind(season_tag)
            .bind(season_id)
            .bind(episode_tag)
            .bind(episode_id)
            .bind(write.season_number)
            .bind(write.episode_number)
            .bind(write.duration)
            .bind(write.watched)
            .bind(Json(&write.meta))
            .bind(write.watched_at)
            .bind(write.completed)
            .bind(write.updated_at)
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                CoreError::Internal(format!(
                    "Failed to upsert watch history: {e}"
                ))
            })?;

        row.into_record()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WatchHistoryRecord>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM watch_history WHERE user_id = $1 \
             ORDER BY watched_at DESC, id"
        );
        let rows = sqlx::query_as::<_, HistoryRow>(&sql)
            .bind(user_id.as_str())
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CoreError::Internal(format!("Failed to list watch history: {e}"))
            })?;

        rows.into_iter().map(HistoryRow::into_record).collect()
    }

    async fn find_matching(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<WatchHistoryRecord>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM watch_history WHERE user_id = "
        ));
        builder
            .push_bind(filter.user_id.as_str().to_owned())
            .push(" AND tmdb_id = ")
            .push_bind(filter.tmdb_id.as_str().to_owned());

        if let Some(slot) = &filter.season {
            let (tag, value) = slot.to_columns();
            builder
                .push(" AND season_tag = ")
                .push_bind(tag)
                .push(" AND season_id = ")
                .push_bind(value.to_owned());
        }
        if let Some(slot) = &filter.episode {
            let (tag, value) = slot.to_columns();
            builder
                .push(" AND episode_tag = ")
                .push_bind(tag)
                .push(" AND episode_id = ")
                .push_bind(value.to_owned());
        }

        let rows = builder
            .build_query_as::<HistoryRow>()
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CoreError::Internal(format!(
                    "Failed to load matching watch history: {e}"
                ))
            })?;

        rows.into_iter().map(HistoryRow::into_record).collect()
    }

    async fn delete_by_ids(&self, user_id: &UserId, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "DELETE FROM watch_history WHERE user_id = $1 AND id = ANY($2)",
        )
        .bind(user_id.as_str())
        .bind(ids)
        .execute(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to delete watch history: {e}"))
        })?;

        Ok(result.rows_affected())
    }
}
