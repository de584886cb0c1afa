//! Retention pass over a user's progress records.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::keys::KeySlot;
use crate::domain::progress::ProgressRecord;

/// Returns the identifiers of every record that fails retention.
///
/// Title-level records (no concrete episode) survive only while in progress.
/// Episode records are judged per season: a season with at least one episode
/// in progress keeps exactly its in-progress episodes, while a season with
/// none in progress is dropped entirely.
pub fn plan_cleanup(records: &[ProgressRecord]) -> Vec<Uuid> {
    let mut by_title: BTreeMap<&str, Vec<&ProgressRecord>> = BTreeMap::new();
    for record in records {
        by_title
            .entry(record.key.tmdb_id.as_str())
            .or_default()
            .push(record);
    }

    let mut doomed = Vec::new();
    for title_records in by_title.into_values() {
        let mut seasons: BTreeMap<&KeySlot, Vec<&ProgressRecord>> =
            BTreeMap::new();

        for record in title_records {
            if record.key.episode.is_id() {
                seasons.entry(&record.key.season).or_default().push(record);
            } else if !record.state().is_in_progress() {
                doomed.push(record.id);
            }
        }

        for episodes in seasons.into_values() {
            let season_alive =
                episodes.iter().any(|record| record.state().is_in_progress());
            doomed.extend(
                episodes
                    .into_iter()
                    .filter(|record| {
                        !season_alive || !record.state().is_in_progress()
                    })
                    .map(|record| record.id),
            );
        }
    }

    doomed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{TmdbId, UserId};
    use crate::domain::keys::{EpisodeSlots, IdentityKey};
    use crate::domain::meta::{TitleMeta, TitleType};
    use chrono::{TimeZone, Utc};

    fn record(
        tmdb: &str,
        season: KeySlot,
        episode: KeySlot,
        watched: i64,
    ) -> ProgressRecord {
        let kind = if season == KeySlot::NotApplicable {
            TitleType::Movie
        } else {
            TitleType::Show
        };
        ProgressRecord {
            id: Uuid::new_v4(),
            key: IdentityKey::new(
                UserId::new("u"),
                TmdbId::new(tmdb),
                EpisodeSlots { season, episode },
            ),
            season_number: None,
            episode_number: None,
            duration: 3000,
            watched,
            meta: TitleMeta {
                title: tmdb.into(),
                year: None,
                poster: None,
                kind,
            },
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn episode(tmdb: &str, season: &str, episode: &str, watched: i64) -> ProgressRecord {
        record(tmdb, KeySlot::id(season), KeySlot::id(episode), watched)
    }

    fn movie(tmdb: &str, watched: i64) -> ProgressRecord {
        record(tmdb, KeySlot::NotApplicable, KeySlot::NotApplicable, watched)
    }

    #[test]
    fn movies_kept_only_while_in_progress() {
        let records = vec![movie("1", 10), movie("2", 1500), movie("3", 2950)];
        let doomed = plan_cleanup(&records);
        assert_eq!(doomed, vec![records[0].id, records[2].id]);
    }

    #[test]
    fn fully_completed_season_is_removed_wholesale() {
        let records = vec![
            episode("10", "s1", "e1", 2990),
            episode("10", "s1", "e2", 3000),
            episode("10", "s1", "e3", 2900),
        ];
        let mut doomed = plan_cleanup(&records);
        doomed.sort();
        let mut expected: Vec<_> = records.iter().map(|r| r.id).collect();
        expected.sort();
        assert_eq!(doomed, expected);
    }

    #[test]
    fn live_season_prunes_only_finished_episodes() {
        let records = vec![
            episode("10", "s1", "e1", 2990),
            episode("10", "s1", "e2", 1500),
            episode("10", "s1", "e3", 3000),
        ];
        let mut doomed = plan_cleanup(&records);
        doomed.sort();
        let mut expected = vec![records[0].id, records[2].id];
        expected.sort();
        assert_eq!(doomed, expected);
    }

    #[test]
    fn seasons_are_judged_independently() {
        let records = vec![
            episode("10", "s1", "e1", 1500),
            episode("10", "s2", "e1", 3000),
            episode("11", "s1", "e1", 3000),
        ];
        let doomed = plan_cleanup(&records);
        assert_eq!(doomed.len(), 2);
        assert!(!doomed.contains(&records[0].id));
    }

    #[test]
    fn show_level_record_is_treated_like_a_movie() {
        let records = vec![
            record("20", KeySlot::Unspecified, KeySlot::Unspecified, 5),
            record("21", KeySlot::Unspecified, KeySlot::Unspecified, 800),
        ];
        assert_eq!(plan_cleanup(&records), vec![records[0].id]);
    }

    #[test]
    fn empty_input_plans_nothing() {
        assert!(plan_cleanup(&[]).is_empty());
    }
}
