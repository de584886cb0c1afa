//! Saved titles. One bookmark per user and title; writing again replaces it.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::ids::{TmdbId, UserId};
use super::meta::{TitleMeta, TitleType};
use super::validation::{ValidationError, Violations, identifier_field};

/// `group` is sent either as a single name or as a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BookmarkGroups {
    One(String),
    Many(Vec<String>),
}

impl BookmarkGroups {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            BookmarkGroups::One(name) => vec![name],
            BookmarkGroups::Many(names) => names,
        }
    }
}

/// Bookmark body as received on the wire.
///
/// Older clients put the title fields at the top level instead of under
/// `meta`; both shapes are accepted and `meta` wins when present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRequest {
    #[serde(default)]
    pub meta: Option<TitleMeta>,
    /// Echoed by some clients; the path identifier is authoritative.
    #[serde(default)]
    pub tmdb_id: Option<String>,
    #[serde(default)]
    pub group: Option<BookmarkGroups>,
    #[serde(default)]
    pub favorite_episodes: Option<Vec<String>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<TitleType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkUpdate {
    pub meta: TitleMeta,
    pub group: Vec<String>,
    pub favorite_episodes: Vec<String>,
}

impl BookmarkRequest {
    pub fn validate(self) -> Result<BookmarkUpdate, ValidationError> {
        let mut violations = Violations::new();

        let meta = match self.meta {
            Some(meta) => Some(meta),
            None => match (self.title, self.kind) {
                (Some(title), Some(kind)) => Some(TitleMeta {
                    title,
                    year: self.year,
                    poster: self.poster,
                    kind,
                }),
                _ => {
                    violations.push("meta", "is required");
                    None
                }
            },
        };

        if let Some(meta) = &meta {
            if meta.title.trim().is_empty() {
                violations.push("meta.title", "must not be empty");
            }
            if meta.year.is_none() {
                violations.push("meta.year", "is required");
            }
        }

        let group = self.group.map(BookmarkGroups::into_vec).unwrap_or_default();
        for name in &group {
            identifier_field(&mut violations, "group", Some(name.as_str()));
        }
        let favorite_episodes = self.favorite_episodes.unwrap_or_default();
        for episode in &favorite_episodes {
            identifier_field(
                &mut violations,
                "favoriteEpisodes",
                Some(episode.as_str()),
            );
        }

        match meta {
            Some(meta) => violations.finish(BookmarkUpdate {
                meta,
                group,
                favorite_episodes,
            }),
            None => Err(violations.into_error()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub user_id: UserId,
    pub tmdb_id: TmdbId,
    pub meta: TitleMeta,
    pub group: Vec<String>,
    pub favorite_episodes: Vec<String>,
    pub updated_at: DateTime<Utc>,
}
