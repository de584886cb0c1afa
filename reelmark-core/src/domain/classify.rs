use serde::{Deserialize, Serialize};

/// Below this many watched seconds an item has not really been started.
pub const NOT_STARTED_BELOW_SECS: i64 = 20;

/// Within this many seconds of the end an item counts as finished.
pub const COMPLETED_WITHIN_SECS: i64 = 2 * 60;

/// Playback state derived from duration and position alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    NotStarted,
    InProgress,
    Completed,
}

impl ProgressState {
    pub fn is_in_progress(self) -> bool {
        matches!(self, ProgressState::InProgress)
    }
}

/// Classifies a playback position.
///
/// `Completed` is checked first so the states stay mutually exclusive for
/// very short items, and any position at or past the end is `Completed`.
pub fn classify(duration: i64, watched: i64) -> ProgressState {
    if duration.saturating_sub(watched) < COMPLETED_WITHIN_SECS {
        ProgressState::Completed
    } else if watched < NOT_STARTED_BELOW_SECS {
        ProgressState::NotStarted
    } else {
        ProgressState::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(3000, 0, ProgressState::NotStarted)]
    #[case(3000, 15, ProgressState::NotStarted)]
    #[case(3000, 19, ProgressState::NotStarted)]
    #[case(3000, 20, ProgressState::InProgress)]
    #[case(3000, 1500, ProgressState::InProgress)]
    #[case(3000, 2880, ProgressState::InProgress)]
    #[case(3000, 2881, ProgressState::Completed)]
    #[case(3000, 3000, ProgressState::Completed)]
    #[case(3000, 4000, ProgressState::Completed)]
    #[case(0, 0, ProgressState::Completed)]
    #[case(100, 10, ProgressState::Completed)]
    fn classifies_boundaries(
        #[case] duration: i64,
        #[case] watched: i64,
        #[case] expected: ProgressState,
    ) {
        assert_eq!(classify(duration, watched), expected);
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        assert_eq!(classify(i64::MAX, 0), ProgressState::NotStarted);
        assert_eq!(classify(0, i64::MAX), ProgressState::Completed);
    }

    proptest! {
        #[test]
        fn watched_past_end_is_completed(duration in 0i64..1_000_000, extra in 0i64..1_000_000) {
            prop_assert_eq!(classify(duration, duration + extra), ProgressState::Completed);
        }

        #[test]
        fn classification_is_deterministic(duration in 0i64..10_000_000, watched in 0i64..10_000_000) {
            prop_assert_eq!(classify(duration, watched), classify(duration, watched));
        }

        #[test]
        fn in_progress_means_neither_boundary(duration in 0i64..10_000_000, watched in 0i64..10_000_000) {
            let in_progress = classify(duration, watched).is_in_progress();
            let at_boundary = watched < NOT_STARTED_BELOW_SECS
                || duration - watched < COMPLETED_WITHIN_SECS;
            prop_assert_eq!(in_progress, !at_boundary);
        }
    }
}
