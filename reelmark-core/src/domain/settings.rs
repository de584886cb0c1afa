//! Per-user preference bag and its partial-update payload.
//!
//! The settings endpoint distinguishes a field that was left out of the body
//! from one that was explicitly set to `null`, so every patch field is a
//! [`Patch`] rather than an `Option`.

use serde::{Deserialize, Deserializer, Serialize};

use super::validation::{ValidationError, Violations};

/// Tri-state field of a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field absent from the body: leave the stored value alone.
    #[default]
    Missing,
    /// Field present with `null`.
    Null,
    Value(T),
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only called when the key is present; absence hits `Default`.
        Option::<T>::deserialize(deserializer)
            .map(|value| value.map_or(Patch::Null, Patch::Value))
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub application_theme: Option<String>,
    #[serde(default = "default_language")]
    pub application_language: String,
    #[serde(default)]
    pub default_subtitle_language: Option<String>,
    /// Never `Some(vec![])`; an empty list is stored as `None`.
    #[serde(default)]
    pub proxy_urls: Option<Vec<String>>,
    #[serde(default)]
    pub trakt_key: Option<String>,
    #[serde(default)]
    pub febbox_key: Option<String>,
    #[serde(default)]
    pub debrid_token: Option<String>,
    #[serde(default)]
    pub debrid_service: Option<String>,
    #[serde(default)]
    pub enable_thumbnails: bool,
    #[serde(default = "enabled")]
    pub enable_autoplay: bool,
    #[serde(default = "enabled")]
    pub enable_skip_credits: bool,
    #[serde(default = "enabled")]
    pub enable_discover: bool,
    #[serde(default)]
    pub enable_featured: bool,
    #[serde(default)]
    pub enable_details_modal: bool,
    #[serde(default = "enabled")]
    pub enable_image_logos: bool,
    #[serde(default)]
    pub enable_carousel_view: bool,
    #[serde(default)]
    pub force_compact_episode_view: bool,
    #[serde(default)]
    pub source_order: Vec<String>,
    #[serde(default)]
    pub enable_source_order: bool,
    #[serde(default)]
    pub disabled_sources: Vec<String>,
    #[serde(default)]
    pub embed_order: Vec<String>,
    #[serde(default)]
    pub enable_embed_order: bool,
    #[serde(default)]
    pub disabled_embeds: Vec<String>,
    #[serde(default)]
    pub proxy_tmdb: bool,
    #[serde(default)]
    pub enable_low_performance_mode: bool,
    #[serde(default)]
    pub enable_native_subtitles: bool,
    #[serde(default)]
    pub enable_hold_to_boost: bool,
    #[serde(default)]
    pub home_section_order: Vec<String>,
    #[serde(default)]
    pub manual_source_selection: bool,
    #[serde(default)]
    pub enable_double_click_to_seek: bool,
    #[serde(default)]
    pub enable_auto_resume_on_playback_error: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            application_theme: None,
            application_language: default_language(),
            default_subtitle_language: None,
            proxy_urls: None,
            trakt_key: None,
            febbox_key: None,
            debrid_token: None,
            debrid_service: None,
            enable_thumbnails: false,
            enable_autoplay: true,
            enable_skip_credits: true,
            enable_discover: true,
            enable_featured: false,
            enable_details_modal: false,
            enable_image_logos: true,
            enable_carousel_view: false,
            force_compact_episode_view: false,
            source_order: Vec::new(),
            enable_source_order: false,
            disabled_sources: Vec::new(),
            embed_order: Vec::new(),
            enable_embed_order: false,
            disabled_embeds: Vec::new(),
            proxy_tmdb: false,
            enable_low_performance_mode: false,
            enable_native_subtitles: false,
            enable_hold_to_boost: false,
            home_section_order: Vec::new(),
            manual_source_selection: false,
            enable_double_click_to_seek: false,
            enable_auto_resume_on_playback_error: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub application_theme: Patch<String>,
    pub application_language: Patch<String>,
    pub default_subtitle_language: Patch<String>,
    pub proxy_urls: Patch<Vec<String>>,
    pub trakt_key: Patch<String>,
    pub febbox_key: Patch<String>,
    pub debrid_token: Patch<String>,
    pub debrid_service: Patch<String>,
    pub enable_thumbnails: Patch<bool>,
    pub enable_autoplay: Patch<bool>,
    pub enable_skip_credits: Patch<bool>,
    pub enable_discover: Patch<bool>,
    pub enable_featured: Patch<bool>,
    pub enable_details_modal: Patch<bool>,
    pub enable_image_logos: Patch<bool>,
    pub enable_carousel_view: Patch<bool>,
    pub force_compact_episode_view: Patch<bool>,
    pub source_order: Patch<Vec<String>>,
    pub enable_source_order: Patch<bool>,
    pub disabled_sources: Patch<Vec<String>>,
    pub embed_order: Patch<Vec<String>>,
    pub enable_embed_order: Patch<bool>,
    pub disabled_embeds: Patch<Vec<String>>,
    pub proxy_tmdb: Patch<bool>,
    pub enable_low_performance_mode: Patch<bool>,
    pub enable_native_subtitles: Patch<bool>,
    pub enable_hold_to_boost: Patch<bool>,
    pub home_section_order: Patch<Vec<String>>,
    pub manual_source_selection: Patch<bool>,
    pub enable_double_click_to_seek: Patch<bool>,
    pub enable_auto_resume_on_playback_error: Patch<bool>,
}

/// Fields that may be cleared with an explicit `null`.
macro_rules! apply_nullable {
    ($patch:ident, $settings:ident, $($field:ident),+ $(,)?) => {
        $(
            match $patch.$field {
                Patch::Missing => {}
                Patch::Null => $settings.$field = None,
                Patch::Value(value) => $settings.$field = Some(value),
            }
        )+
    };
}

/// Fields where `null` is a client error.
macro_rules! apply_required {
    ($patch:ident, $settings:ident, $violations:ident, $($field:ident => $wire:literal),+ $(,)?) => {
        $(
            match $patch.$field {
                Patch::Missing => {}
                Patch::Null => $violations.push($wire, "must not be null"),
                Patch::Value(value) => $settings.$field = value,
            }
        )+
    };
}

impl SettingsPatch {
    /// Applies the patch on top of `current`. Nothing is written when any
    /// field is invalid.
    pub fn apply(
        self,
        current: &UserSettings,
    ) -> Result<UserSettings, ValidationError> {
        let patch = self;
        let mut settings = current.clone();
        let mut violations = Violations::new();

        apply_nullable!(
            patch,
            settings,
            application_theme,
            default_subtitle_language,
            trakt_key,
            febbox_key,
            debrid_token,
            debrid_service,
        );

        match patch.proxy_urls {
            Patch::Missing => {}
            Patch::Null => settings.proxy_urls = None,
            Patch::Value(urls) => {
                settings.proxy_urls = (!urls.is_empty()).then_some(urls)
            }
        }

        apply_required!(
            patch,
            settings,
            violations,
            application_language => "applicationLanguage",
            enable_thumbnails => "enableThumbnails",
            enable_autoplay => "enableAutoplay",
            enable_skip_credits => "enableSkipCredits",
            enable_discover => "enableDiscover",
            enable_featured => "enableFeatured",
            enable_details_modal => "enableDetailsModal",
            enable_image_logos => "enableImageLogos",
            enable_carousel_view => "enableCarouselView",
            force_compact_episode_view => "forceCompactEpisodeView",
            source_order => "sourceOrder",
            enable_source_order => "enableSourceOrder",
            disabled_sources => "disabledSources",
            embed_order => "embedOrder",
            enable_embed_order => "enableEmbedOrder",
            disabled_embeds => "disabledEmbeds",
            proxy_tmdb => "proxyTmdb",
            enable_low_performance_mode => "enableLowPerformanceMode",
            enable_native_subtitles => "enableNativeSubtitles",
            enable_hold_to_boost => "enableHoldToBoost",
            home_section_order => "homeSectionOrder",
            manual_source_selection => "manualSourceSelection",
            enable_double_click_to_seek => "enableDoubleClickToSeek",
            enable_auto_resume_on_playback_error => "enableAutoResumeOnPlaybackError",
        );

        violations.finish(settings)
    }
}
