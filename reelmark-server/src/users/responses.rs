//! Wire shapes for the per-user endpoints.

use chrono::{DateTime, Utc};
use reelmark_core::domain::bookmark::Bookmark;
use reelmark_core::domain::history::WatchHistoryRecord;
use reelmark_core::domain::ids::{TmdbId, UserId};
use reelmark_core::domain::keys::{DeleteRequest, IdentityKey};
use reelmark_core::domain::meta::TitleMeta;
use reelmark_core::domain::progress::{ProgressRecord, ProgressWrite};
use reelmark_core::domain::settings::UserSettings;
use serde::Serialize;
use uuid::Uuid;

/// Result of a progress `PUT`. `id` is `null` when the update was not
/// stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressItemResponse {
    pub id: Option<Uuid>,
    pub tmdb_id: TmdbId,
    pub user_id: UserId,
    pub season_id: Option<String>,
    pub episode_id: Option<String>,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub meta: TitleMeta,
    pub duration: i64,
    pub watched: i64,
    pub updated_at: DateTime<Utc>,
}

impl ProgressItemResponse {
    fn build(id: Option<Uuid>, key: IdentityKey, write: Echo) -> Self {
        Self {
            id,
            season_id: key.season.to_client(),
            episode_id: key.episode.to_client(),
            tmdb_id: key.tmdb_id,
            user_id: key.user_id,
            season_number: write.season_number,
            episode_number: write.episode_number,
            meta: write.meta,
            duration: write.duration,
            watched: write.watched,
            updated_at: write.updated_at,
        }
    }

    pub fn persisted(record: ProgressRecord) -> Self {
        let ProgressRecord {
            id,
            key,
            season_number,
            episode_number,
            duration,
            watched,
            meta,
            updated_at,
        } = record;
        Self::build(
            Some(id),
            key,
            Echo {
                season_number,
                episode_number,
                duration,
                watched,
                meta,
                updated_at,
            },
        )
    }

    pub fn skipped(write: ProgressWrite) -> Self {
        let ProgressWrite {
            key,
            season_number,
            episode_number,
            duration,
            watched,
            meta,
            updated_at,
        } = write;
        Self::build(
            None,
            key,
            Echo {
                season_number,
                episode_number,
                duration,
                watched,
                meta,
                updated_at,
            },
        )
    }
}

struct Echo {
    season_number: Option<i32>,
    episode_number: Option<i32>,
    duration: i64,
    watched: i64,
    meta: TitleMeta,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotDisplay {
    pub id: Option<String>,
    pub number: Option<i32>,
}

/// List entry for `GET /users/{id}/progress`. Durations are strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDisplay {
    pub id: Uuid,
    pub tmdb_id: TmdbId,
    pub episode: SlotDisplay,
    pub season: SlotDisplay,
    pub meta: TitleMeta,
    pub duration: String,
    pub watched: String,
    pub updated_at: DateTime<Utc>,
}

impl From<ProgressRecord> for ProgressDisplay {
    fn from(record: ProgressRecord) -> Self {
        Self {
            id: record.id,
            episode: SlotDisplay {
                id: record.key.episode.to_client(),
                number: record.episode_number,
            },
            season: SlotDisplay {
                id: record.key.season.to_client(),
                number: record.season_number,
            },
            tmdb_id: record.key.tmdb_id,
            meta: record.meta,
            duration: record.duration.to_string(),
            watched: record.watched.to_string(),
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryItemResponse {
    pub id: Uuid,
    pub tmdb_id: TmdbId,
    pub user_id: UserId,
    pub season_id: Option<String>,
    pub episode_id: Option<String>,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub meta: TitleMeta,
    pub duration: i64,
    pub watched: i64,
    pub watched_at: DateTime<Utc>,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<WatchHistoryRecord> for WatchHistoryItemResponse {
    fn from(record: WatchHistoryRecord) -> Self {
        Self {
            id: record.id,
            season_id: record.key.season.to_client(),
            episode_id: record.key.episode.to_client(),
            tmdb_id: record.key.tmdb_id,
            user_id: record.key.user_id,
            season_number: record.season_number,
            episode_number: record.episode_number,
            meta: record.meta,
            duration: record.duration,
            watched: record.watched,
            watched_at: record.watched_at,
            completed: record.completed,
            updated_at: record.updated_at,
        }
    }
}

/// Adds `success: true` ahead of a payload.
#[derive(Debug, Clone, Serialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Success<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub count: u64,
    pub tmdb_id: TmdbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_id: Option<String>,
}

impl DeleteResponse {
    /// Echoes the identifiers the client sent, not the resolved filter.
    pub fn new(count: u64, tmdb_id: TmdbId, request: DeleteRequest) -> Self {
        Self {
            count,
            tmdb_id,
            episode_id: request.episode_id,
            season_id: request.season_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub deleted_count: u64,
    pub message: String,
}

impl CleanupResponse {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            deleted_count,
            message: format!("Cleaned up {deleted_count} unwanted progress items"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub id: UserId,
    #[serde(flatten)]
    pub settings: UserSettings,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkResponse {
    pub tmdb_id: TmdbId,
    pub meta: TitleMeta,
    pub group: Vec<String>,
    pub favorite_episodes: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Bookmark> for BookmarkResponse {
    fn from(bookmark: Bookmark) -> Self {
        Self {
            tmdb_id: bookmark.tmdb_id,
            meta: bookmark.meta,
            group: bookmark.group,
            favorite_episodes: bookmark.favorite_episodes,
            updated_at: bookmark.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRemoved {
    pub tmdb_id: TmdbId,
}
