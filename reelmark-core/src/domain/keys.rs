//! Canonical identity keys for progress and history records.
//!
//! A record is identified by `(user, title, season, episode)`. Season and
//! episode are not plain optionals: a movie has no season at all, a show may
//! be tracked without season granularity, and those two cases must never be
//! confused by the store's uniqueness check. [`KeySlot`] keeps them apart as
//! distinct tagged values, so no client identifier can ever alias the
//! "does not apply" marker.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{TmdbId, UserId};
use super::meta::TitleType;
use super::validation::{ValidationError, Violations, identifier_field};

/// One season or episode component of an identity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum KeySlot {
    /// The component does not exist for this title (movies).
    NotApplicable,
    /// The title has the component but the client did not name one.
    Unspecified,
    /// A concrete client identifier.
    Id(String),
}

impl KeySlot {
    /// Storage tag, part of the uniqueness constraint.
    pub const TAG_NOT_APPLICABLE: i16 = 0;
    pub const TAG_UNSPECIFIED: i16 = 1;
    pub const TAG_ID: i16 = 2;

    pub fn id(value: impl Into<String>) -> Self {
        KeySlot::Id(value.into())
    }

    pub fn as_id(&self) -> Option<&str> {
        match self {
            KeySlot::Id(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_id(&self) -> bool {
        matches!(self, KeySlot::Id(_))
    }

    /// What the client sees: only real identifiers survive.
    pub fn to_client(&self) -> Option<String> {
        self.as_id().map(str::to_owned)
    }

    /// `(tag, value)` pair as persisted. The value column is empty unless the
    /// tag is [`KeySlot::TAG_ID`].
    pub fn to_columns(&self) -> (i16, &str) {
        match self {
            KeySlot::NotApplicable => (Self::TAG_NOT_APPLICABLE, ""),
            KeySlot::Unspecified => (Self::TAG_UNSPECIFIED, ""),
            KeySlot::Id(id) => (Self::TAG_ID, id.as_str()),
        }
    }

    pub fn from_columns(tag: i16, value: String) -> Option<Self> {
        match tag {
            Self::TAG_NOT_APPLICABLE => Some(KeySlot::NotApplicable),
            Self::TAG_UNSPECIFIED => Some(KeySlot::Unspecified),
            Self::TAG_ID => Some(KeySlot::Id(value)),
            _ => None,
        }
    }

    fn from_client(value: Option<&str>) -> Self {
        match value {
            Some(id) if !id.is_empty() => KeySlot::Id(id.to_owned()),
            _ => KeySlot::Unspecified,
        }
    }
}

impl fmt::Display for KeySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySlot::NotApplicable => f.write_str("n/a"),
            KeySlot::Unspecified => f.write_str("*"),
            KeySlot::Id(id) => f.write_str(id),
        }
    }
}

/// Season and episode slots for one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EpisodeSlots {
    pub season: KeySlot,
    pub episode: KeySlot,
}

/// Maps client-supplied season/episode identifiers to canonical slots.
///
/// Movies always get [`KeySlot::NotApplicable`] for both components,
/// whatever the client sent. Shows keep their identifiers verbatim; missing
/// or empty ones become [`KeySlot::Unspecified`].
pub fn normalize(
    kind: TitleType,
    season_id: Option<&str>,
    episode_id: Option<&str>,
) -> EpisodeSlots {
    match kind {
        TitleType::Movie => EpisodeSlots {
            season: KeySlot::NotApplicable,
            episode: KeySlot::NotApplicable,
        },
        TitleType::Show => EpisodeSlots {
            season: KeySlot::from_client(season_id),
            episode: KeySlot::from_client(episode_id),
        },
    }
}

/// Full identity of a progress or history record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub user_id: UserId,
    pub tmdb_id: TmdbId,
    pub season: KeySlot,
    pub episode: KeySlot,
}

impl IdentityKey {
    pub fn new(user_id: UserId, tmdb_id: TmdbId, slots: EpisodeSlots) -> Self {
        Self {
            user_id,
            tmdb_id,
            season: slots.season,
            episode: slots.episode,
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.user_id, self.tmdb_id, self.season, self.episode
        )
    }
}

/// Delete filter. `None` components match any slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    pub user_id: UserId,
    pub tmdb_id: TmdbId,
    pub season: Option<KeySlot>,
    pub episode: Option<KeySlot>,
}

impl RecordFilter {
    /// Builds a filter from a delete request. Supplied identifiers narrow the
    /// match; when the request says the title is a movie, absent components
    /// narrow to [`KeySlot::NotApplicable`] instead of matching everything.
    pub fn from_request(
        user_id: UserId,
        tmdb_id: TmdbId,
        kind: Option<TitleType>,
        season_id: Option<&str>,
        episode_id: Option<&str>,
    ) -> Self {
        let narrow = |value: Option<&str>| match value {
            Some(id) if !id.is_empty() => Some(KeySlot::id(id)),
            _ if kind.is_some_and(TitleType::is_movie) => {
                Some(KeySlot::NotApplicable)
            }
            _ => None,
        };

        Self {
            user_id,
            tmdb_id,
            season: narrow(season_id),
            episode: narrow(episode_id),
        }
    }

    pub fn matches(&self, key: &IdentityKey) -> bool {
        key.user_id == self.user_id
            && key.tmdb_id == self.tmdb_id
            && self.season.as_ref().is_none_or(|slot| *slot == key.season)
            && self.episode.as_ref().is_none_or(|slot| *slot == key.episode)
    }
}

/// Optional body of a delete request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    #[serde(default)]
    pub season_id: Option<String>,
    #[serde(default)]
    pub episode_id: Option<String>,
    #[serde(default)]
    pub meta: Option<DeleteMeta>,
}

/// Only the title type matters when deleting; other metadata is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteMeta {
    #[serde(default, rename = "type")]
    pub kind: Option<TitleType>,
}

impl DeleteRequest {
    pub fn validate(self) -> Result<Self, ValidationError> {
        let mut violations = Violations::new();
        identifier_field(&mut violations, "seasonId", self.season_id.as_deref());
        identifier_field(&mut violations, "episodeId", self.episode_id.as_deref());
        violations.finish(self)
    }

    pub fn kind(&self) -> Option<TitleType> {
        self.meta.as_ref().and_then(|meta| meta.kind)
    }

    pub fn filter(&self, user_id: UserId, tmdb_id: TmdbId) -> RecordFilter {
        RecordFilter::from_request(
            user_id,
            tmdb_id,
            self.kind(),
            self.season_id.as_deref(),
            self.episode_id.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_slots_ignore_client_ids() {
        let slots = normalize(TitleType::Movie, Some("s1"), Some("e1"));
        assert_eq!(slots.season, KeySlot::NotApplicable);
        assert_eq!(slots.episode, KeySlot::NotApplicable);
        assert_eq!(slots.season.to_client(), None);
        assert_eq!(slots.episode.to_client(), None);
    }

    #[test]
    fn show_ids_pass_through_verbatim() {
        let slots = normalize(TitleType::Show, Some("84773"), Some("1998231"));
        assert_eq!(slots.season.to_client().as_deref(), Some("84773"));
        assert_eq!(slots.episode.to_client().as_deref(), Some("1998231"));
    }

    #[test]
    fn show_without_ids_is_unspecified_not_not_applicable() {
        let slots = normalize(TitleType::Show, None, Some(""));
        assert_eq!(slots.season, KeySlot::Unspecified);
        assert_eq!(slots.episode, KeySlot::Unspecified);
        assert_ne!(slots.season, KeySlot::NotApplicable);
    }

    #[test]
    fn no_client_identifier_collides_with_not_applicable() {
        // Strings a sentinel-based encoding might have reserved.
        for candidate in ["\n", "", "\0", "null", "n/a", "*"] {
            let slot = KeySlot::id(candidate);
            assert_ne!(slot, KeySlot::NotApplicable);
            assert_ne!(slot, KeySlot::Unspecified);
            assert_ne!(slot.to_columns().0, KeySlot::TAG_NOT_APPLICABLE);
        }
    }

    #[test]
    fn columns_round_trip() {
        for slot in [
            KeySlot::NotApplicable,
            KeySlot::Unspecified,
            KeySlot::id("42"),
        ] {
            let (tag, value) = slot.to_columns();
            assert_eq!(KeySlot::from_columns(tag, value.to_owned()), Some(slot));
        }
        assert_eq!(KeySlot::from_columns(9, String::new()), None);
    }

    #[test]
    fn movie_delete_filter_targets_not_applicable_slots() {
        let filter = RecordFilter::from_request(
            UserId::new("u"),
            TmdbId::new("603"),
            Some(TitleType::Movie),
            None,
            None,
        );
        assert_eq!(filter.season, Some(KeySlot::NotApplicable));
        assert_eq!(filter.episode, Some(KeySlot::NotApplicable));

        let show_level = IdentityKey {
            user_id: UserId::new("u"),
            tmdb_id: TmdbId::new("603"),
            season: KeySlot::Unspecified,
            episode: KeySlot::Unspecified,
        };
        assert!(!filter.matches(&show_level));
    }

    #[test]
    fn untyped_delete_filter_is_a_wildcard() {
        let filter = RecordFilter::from_request(
            UserId::new("u"),
            TmdbId::new("1399"),
            None,
            Some("s1"),
            None,
        );
        let key = IdentityKey {
            user_id: UserId::new("u"),
            tmdb_id: TmdbId::new("1399"),
            season: KeySlot::id("s1"),
            episode: KeySlot::id("e9"),
        };
        assert!(filter.matches(&key));
        assert!(!filter.matches(&IdentityKey {
            season: KeySlot::id("s2"),
            ..key
        }));
    }

    #[test]
    fn delete_body_meta_type_narrows_filter() {
        let request: DeleteRequest = serde_json::from_value(serde_json::json!({
            "meta": {"type": "movie", "title": "ignored"}
        }))
        .expect("shape");
        let filter = request
            .validate()
            .expect("valid")
            .filter(UserId::new("u"), TmdbId::new("603"));
        assert_eq!(filter.episode, Some(KeySlot::NotApplicable));
    }

    #[test]
    fn delete_body_rejects_control_characters() {
        let request = DeleteRequest {
            episode_id: Some("e\u{0}".into()),
            ..DeleteRequest::default()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.violations[0].field, "episodeId");
    }
}
