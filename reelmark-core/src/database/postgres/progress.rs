use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::decode_slot;
use crate::database::ports::progress::ProgressRepository;
use crate::domain::ids::{TmdbId, UserId};
use crate::domain::keys::{IdentityKey, KeySlot, RecordFilter};
use crate::domain::meta::TitleMeta;
use crate::domain::progress::{ProgressRecord, ProgressWrite};
use crate::error::{CoreError, Result};

const COLUMNS: &str = "id, user_id, tmdb_id, season_tag, season_id, \
    episode_tag, episode_id, season_number, episode_number, duration, \
    watched, meta, updated_at";

#[derive(Debug, FromRow)]
struct ProgressRow {
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
    updated_at: DateTime<Utc>,
}

impl ProgressRow {
    fn into_record(self) -> Result<ProgressRecord> {
        let row = self;
        Ok(ProgressRecord {
            id: row.id,
            key: IdentityKey {
                user_id: UserId::new(row.user_id),
                tmdb_id: TmdbId::new(row.tmdb_id),
                season: decode_slot("season", row.season_tag, row.season_id)?,
                episode: decode_slot("episode", row.episode_tag, row.episode_id)?,
            },
            season_number: row.season_number,
            episode_number: row.episode_number,
            duration: row.duration,
            watched: row.watched,
            meta: row.meta.0,
            updated_at: row.updated_at,
        })
    }
}

fn into_records(rows: Vec<ProgressRow>) -> Result<Vec<ProgressRecord>> {
    rows.into_iter().map(ProgressRow::into_record).collect()
}

#[derive(Debug, Clone)]
pub struct PostgresProgressRepository {
    pool: PgPool,
}

impl PostgresProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProgressRepository for PostgresProgressRepository {
    async fn upsert(&self, write: ProgressWrite) -> Result<ProgressRecord> {
        let (season_tag, season_id) = write.key.season.to_columns();
        let (episode_tag, episode_id) = write.key.episode.to_columns();

        // Display numbers keep their first-written values.
        let sql = format!(
            r#"
            INSERT INTO progress_items (
                id, user_id, tmdb_id, season_tag, season_id, episode_tag,
                episode_id, season_number, episode_number, duration, watched,
                meta, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT ON CONSTRAINT progress_items_identity DO UPDATE SET
                duration = EXCLUDED.duration,
                watched = EXCLUDED.watched,
                meta = EXCLUDED.meta,
                updated_at = EXCLUDED.updated_at
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ProgressRow>(&sql)
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
            .bind(write.updated_at)
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                CoreError::Internal(format!("Failed to upsert progress: {e}"))
            })?;

        row.into_record()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProgressRecord>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM progress_items WHERE user_id = $1 \
             ORDER BY updated_at DESC, id"
        );
        let rows = sqlx::query_as::<_, ProgressRow>(&sql)
            .bind(user_id.as_str())
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CoreError::Internal(format!("Failed to list progress: {e}"))
            })?;

        into_records(rows)
    }

    async fn find_season_siblings(
        &self,
        user_id: &UserId,
        tmdb_id: &TmdbId,
        season_id: &str,
        exclude_episode: &KeySlot,
    ) -> Result<Vec<ProgressRecord>> {
        let (episode_tag, episode_id) = exclude_episode.to_columns();
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM progress_items
            WHERE user_id = $1 AND tmdb_id = $2
              AND season_tag = $3 AND season_id = $4
              AND NOT (episode_tag = $5 AND episode_id = $6)
            ORDER BY updated_at DESC, id
            "#
        );

        let rows = sqlx::query_as::<_, ProgressRow>(&sql)
            .bind(user_id.as_str())
            .bind(tmdb_id.as_str())
            .bind(KeySlot::TAG_ID)
            .bind(season_id)
            .bind(episode_tag)
            .bind(episode_id)
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CoreError::Internal(format!(
                    "Failed to load season siblings: {e}"
                ))
            })?;

        into_records(rows)
    }

    async fn find_matching(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<ProgressRecord>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM progress_items WHERE user_id = "
        ));
        builder
            .push_bind(filter.user_id.as_str().to_owned())
            .push(" AND tmdb_id = ")
            .push_bind(filter.tmdb_id.as_str().to_owned());

        for (prefix, slot) in [("season", &filter.season), ("episode", &filter.episode)]
        {
            if let Some(slot) = slot {
                let (tag, value) = slot.to_columns();
                builder
                    .push(format!(" AND {prefix}_tag = "))
                    .push_bind(tag)
                    .push(format!(" AND {prefix}_id = "))
                    .push_bind(value.to_owned());
            }
        }
        builder.push(" ORDER BY updated_at DESC, id");

        let rows = builder
            .build_query_as::<ProgressRow>()
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CoreError::Internal(format!(
                    "Failed to load matching progress: {e}"
                ))
            })?;

        into_records(rows)
    }

    async fn delete_by_ids(&self, user_id: &UserId, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "DELETE FROM progress_items WHERE user_id = $1 AND id = ANY($2)",
        )
        .bind(user_id.as_str())
        .bind(ids)
        .execute(self.pool())
        .await
        .map_err(|e| {
            CoreError::Internal(format!("Failed to delete progress: {e}"))
        })?;

        Ok(result.rows_affected())
    }
}

#[cfg(all(test, feature = "postgres-tests"))]
mod tests {
    use super::*;
    use crate::domain::keys::EpisodeSlots;
    use crate::domain::meta::TitleType;
    use chrono::TimeZone;

    fn write(
        tmdb: &str,
        season: KeySlot,
        episode: KeySlot,
        watched: i64,
    ) -> ProgressWrite {
        ProgressWrite {
            key: IdentityKey::new(
                UserId::new("u1"),
                TmdbId::new(tmdb),
                EpisodeSlots { season, episode },
            ),
            season_number: Some(1),
            episode_number: Some(2),
            duration: 3000,
            watched,
            meta: TitleMeta {
                title: "Severance".into(),
                year: Some(2022),
                poster: None,
                kind: TitleType::Show,
            },
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn upsert_keeps_identity_and_display_numbers(pool: PgPool) {
        let repo = PostgresProgressRepository::new(pool);
        let first = repo
            .upsert(write("95396", KeySlot::id("s1"), KeySlot::id("e1"), 100))
            .await
            .expect("insert");

        let mut second = write("95396", KeySlot::id("s1"), KeySlot::id("e1"), 900);
        second.season_number = Some(7);
        let updated = repo.upsert(second).await.expect("update");

        assert_eq!(updated.id, first.id);
        assert_eq!(updated.watched, 900);
        assert_eq!(updated.season_number, Some(1));
        assert_eq!(repo.list_for_user(&UserId::new("u1")).await.unwrap().len(), 1);
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn unspecified_and_not_applicable_are_distinct_rows(pool: PgPool) {
        let repo = PostgresProgressRepository::new(pool);
        repo.upsert(write("1", KeySlot::NotApplicable, KeySlot::NotApplicable, 100))
            .await
            .unwrap();
        repo.upsert(write("1", KeySlot::Unspecified, KeySlot::Unspecified, 100))
            .await
            .unwrap();

        let filter = RecordFilter {
            user_id: UserId::new("u1"),
            tmdb_id: TmdbId::new("1"),
            season: Some(KeySlot::NotApplicable),
            episode: Some(KeySlot::NotApplicable),
        };
        let matches = repo.find_matching(&filter).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].key.season, KeySlot::NotApplicable);
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn siblings_exclude_the_current_episode(pool: PgPool) {
        let repo = PostgresProgressRepository::new(pool);
        for episode in ["e1", "e2", "e3"] {
            repo.upsert(write("9", KeySlot::id("s1"), KeySlot::id(episode), 500))
                .await
                .unwrap();
        }
        repo.upsert(write("9", KeySlot::id("s2"), KeySlot::id("e9"), 500))
            .await
            .unwrap();

        let siblings = repo
            .find_season_siblings(
                &UserId::new("u1"),
                &TmdbId::new("9"),
                "s1",
                &KeySlot::id("e2"),
            )
            .await
            .unwrap();
        let mut episodes: Vec<_> =
            siblings.iter().filter_map(|r| r.key.episode.to_client()).collect();
        episodes.sort();
        assert_eq!(episodes, vec!["e1", "e3"]);
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn delete_is_scoped_to_user(pool: PgPool) {
        let repo = PostgresProgressRepository::new(pool);
        let record = repo
            .upsert(write("5", KeySlot::NotApplicable, KeySlot::NotApplicable, 100))
            .await
            .unwrap();

        let removed = repo
            .delete_by_ids(&UserId::new("someone-else"), &[record.id])
            .await
            .unwrap();
        assert_eq!(removed, 0);

        let removed = repo
            .delete_by_ids(&UserId::new("u1"), &[record.id])
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }
}
