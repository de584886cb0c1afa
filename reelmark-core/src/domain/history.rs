//! Completed (or partially completed) views kept as watch history.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::keys::IdentityKey;
use super::meta::TitleMeta;
use super::progress::{PlaybackUpdate, timestamp_field};
use super::validation::{ValidationError, Violations};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryRequest {
    pub meta: TitleMeta,
    #[serde(default)]
    pub tmdb_id: Option<String>,
    pub duration: f64,
    pub watched: f64,
    #[serde(default)]
    pub watched_at: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub season_id: Option<String>,
    #[serde(default)]
    pub episode_id: Option<String>,
    #[serde(default)]
    pub season_number: Option<f64>,
    #[serde(default)]
    pub episode_number: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchHistoryUpdate {
    pub playback: PlaybackUpdate,
    pub watched_at: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl WatchHistoryRequest {
    pub fn validate(self) -> Result<WatchHistoryUpdate, ValidationError> {
        let mut violations = Violations::new();
        let watched_at = timestamp_field(
            &mut violations,
            "watchedAt",
            self.watched_at.as_deref(),
        );
        let playback = PlaybackUpdate::from_parts(
            &mut violations,
            self.meta,
            self.duration,
            self.watched,
            self.season_id,
            self.episode_id,
            self.season_number,
            self.episode_number,
        );
        violations.finish(WatchHistoryUpdate {
            playback,
            watched_at,
            completed: self.completed,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchHistoryRecord {
    pub id: Uuid,
    pub key: IdentityKey,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub duration: i64,
    pub watched: i64,
    pub meta: TitleMeta,
    pub watched_at: DateTime<Utc>,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchHistoryWrite {
    pub key: IdentityKey,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub duration: i64,
    pub watched: i64,
    pub meta: TitleMeta,
    pub watched_at: DateTime<Utc>,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl WatchHistoryWrite {
    pub fn into_record(self, id: Uuid) -> WatchHistoryRecord {
        WatchHistoryRecord {
            id,
            key: self.key,
            season_number: self.season_number,
            episode_number: self.episode_number,
            duration: self.duration,
            watched: self.watched,
            meta: self.meta,
            watched_at: self.watched_at,
            completed: self.completed,
            updated_at: self.updated_at,
        }
    }

    pub fn apply_to(&self, record: &mut WatchHistoryRecord) {
        record.duration = self.duration;
        record.watched = self.watched;
        record.meta = self.meta.clone();
        record.watched_at = self.watched_at;
        record.completed = self.completed;
        record.updated_at = self.updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completed_defaults_to_false() {
        let request: WatchHistoryRequest = serde_json::from_value(json!({
            "meta": {"title": "Arrival", "type": "movie"},
            "duration": 6960,
            "watched": 6900,
            "watchedAt": "2023-11-02T21:15:00Z"
        }))
        .expect("shape");
        let update = request.validate().expect("valid");
        assert!(!update.completed);
        assert!(update.watched_at.is_some());
    }

    #[test]
    fn malformed_watched_at_is_a_violation() {
        let request: WatchHistoryRequest = serde_json::from_value(json!({
            "meta": {"title": "Arrival", "type": "movie"},
            "duration": 6960,
            "watched": 6900,
            "watchedAt": "2023-11-02 21:15"
        }))
        .expect("shape");
        let err = request.validate().unwrap_err();
        assert_eq!(err.violations[0].field, "watchedAt");
    }
}
