use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of title a progress or history entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleType {
    Movie,
    #[serde(alias = "tv")]
    Show,
}

impl TitleType {
    pub fn is_movie(self) -> bool {
        matches!(self, TitleType::Movie)
    }
}

impl fmt::Display for TitleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleType::Movie => f.write_str("movie"),
            TitleType::Show => f.write_str("show"),
        }
    }
}

/// Display metadata stored alongside a record. Opaque to the decision logic
/// apart from `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleMeta {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(rename = "type")]
    pub kind: TitleType,
}
