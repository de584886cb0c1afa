//! Save-worthiness gate for progress updates.

use tracing::debug;

use crate::database::ports::progress::ProgressRepository;
use crate::domain::keys::IdentityKey;
use crate::domain::progress::PlaybackUpdate;
use crate::error::Result;

/// Decides whether an incoming update should be written at all.
///
/// Only in-progress positions are worth keeping for "continue watching".
/// Shows get one exception: a boundary update for an episode is still kept
/// while some other episode of the same season is mid-playback. The gate
/// never deletes anything.
#[derive(Clone, Copy)]
pub struct ProgressEvaluator<'a> {
    progress: &'a dyn ProgressRepository,
}

impl std::fmt::Debug for ProgressEvaluator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressEvaluator").finish_non_exhaustive()
    }
}

impl<'a> ProgressEvaluator<'a> {
    pub fn new(progress: &'a dyn ProgressRepository) -> Self {
        Self { progress }
    }

    pub async fn should_persist(
        &self,
        key: &IdentityKey,
        update: &PlaybackUpdate,
    ) -> Result<bool> {
        let state = update.state();
        if state.is_in_progress() {
            return Ok(true);
        }
        if update.meta.kind.is_movie() {
            return Ok(false);
        }
        let Some(season_id) = key.season.as_id() else {
            return Ok(false);
        };

        let siblings = self
            .progress
            .find_season_siblings(
                &key.user_id,
                &key.tmdb_id,
                season_id,
                &key.episode,
            )
            .await?;
        let keep = siblings.iter().any(|record| record.state().is_in_progress());

        debug!(
            key = %key,
            ?state,
            siblings = siblings.len(),
            keep,
            "Consulted season siblings"
        );
        Ok(keep)
    }
}
