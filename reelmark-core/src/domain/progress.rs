//! Playback progress records and the update payload that feeds them.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::classify::{ProgressState, classify};
use super::ids::{TmdbId, UserId};
use super::keys::{EpisodeSlots, IdentityKey, normalize};
use super::meta::TitleMeta;
use super::validation::{
    ValidationError, Violations, identifier_field, ordinal_field,
    seconds_field,
};

/// Progress update body as received on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdateRequest {
    pub meta: TitleMeta,
    /// Echoed by some clients; the path identifier is authoritative.
    #[serde(default)]
    pub tmdb_id: Option<String>,
    pub duration: f64,
    pub watched: f64,
    #[serde(default)]
    pub season_id: Option<String>,
    #[serde(default)]
    pub episode_id: Option<String>,
    #[serde(default)]
    pub season_number: Option<f64>,
    #[serde(default)]
    pub episode_number: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Validated playback update shared by progress and watch history.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackUpdate {
    pub meta: TitleMeta,
    pub duration: i64,
    pub watched: i64,
    pub season_id: Option<String>,
    pub episode_id: Option<String>,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
}

impl PlaybackUpdate {
    pub fn state(&self) -> ProgressState {
        classify(self.duration, self.watched)
    }

    pub fn slots(&self) -> EpisodeSlots {
        normalize(
            self.meta.kind,
            self.season_id.as_deref(),
            self.episode_id.as_deref(),
        )
    }

    pub fn identity(&self, user_id: UserId, tmdb_id: TmdbId) -> IdentityKey {
        IdentityKey::new(user_id, tmdb_id, self.slots())
    }

    /// Validates the fields common to every playback payload.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        violations: &mut Violations,
        meta: TitleMeta,
        duration: f64,
        watched: f64,
        season_id: Option<String>,
        episode_id: Option<String>,
        season_number: Option<f64>,
        episode_number: Option<f64>,
    ) -> Self {
        let duration = seconds_field(violations, "duration", duration);
        let watched = seconds_field(violations, "watched", watched);
        let season_number =
            ordinal_field(violations, "seasonNumber", season_number);
        let episode_number =
            ordinal_field(violations, "episodeNumber", episode_number);
        identifier_field(violations, "seasonId", season_id.as_deref());
        identifier_field(violations, "episodeId", episode_id.as_deref());
        if meta.title.trim().is_empty() {
            violations.push("meta.title", "must not be empty");
        }

        Self {
            meta,
            duration,
            watched,
            season_id: season_id.filter(|id| !id.is_empty()),
            episode_id: episode_id.filter(|id| !id.is_empty()),
            // Zero is what clients send when they have no number.
            season_number: season_number.filter(|n| *n != 0),
            episode_number: episode_number.filter(|n| *n != 0),
        }
    }
}

/// Parses an RFC 3339 timestamp with offset, recording a violation when
/// malformed.
pub(crate) fn timestamp_field(
    violations: &mut Violations,
    field: &str,
    value: Option<&str>,
) -> Option<DateTime<Utc>> {
    let raw = value?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(_) => {
            violations.push(field, "must be an RFC 3339 timestamp with offset");
            None
        }
    }
}

/// A validated progress update plus the client's claimed update time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub playback: PlaybackUpdate,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProgressUpdateRequest {
    pub fn validate(self) -> Result<ProgressUpdate, ValidationError> {
        let mut violations = Violations::new();
        let updated_at = timestamp_field(
            &mut violations,
            "updatedAt",
            self.updated_at.as_deref(),
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
        violations.finish(ProgressUpdate {
            playback,
            updated_at,
        })
    }
}

/// One stored playback position.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRecord {
    pub id: Uuid,
    pub key: IdentityKey,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub duration: i64,
    pub watched: i64,
    pub meta: TitleMeta,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    pub fn state(&self) -> ProgressState {
        classify(self.duration, self.watched)
    }
}

/// Everything needed to create or refresh a progress record.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressWrite {
    pub key: IdentityKey,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,
    pub duration: i64,
    pub watched: i64,
    pub meta: TitleMeta,
    pub updated_at: DateTime<Utc>,
}

impl ProgressWrite {
    /// Record for a first insert under a fresh identifier.
    pub fn into_record(self, id: Uuid) -> ProgressRecord {
        ProgressRecord {
            id,
            key: self.key,
            season_number: self.season_number,
            episode_number: self.episode_number,
            duration: self.duration,
            watched: self.watched,
            meta: self.meta,
            updated_at: self.updated_at,
        }
    }

    /// Refreshes mutable fields; identity and display numbers stay as first
    /// written.
    pub fn apply_to(&self, record: &mut ProgressRecord) {
        record.duration = self.duration;
        record.watched = self.watched;
        record.meta = self.meta.clone();
        record.updated_at = self.updated_at;
    }
}
