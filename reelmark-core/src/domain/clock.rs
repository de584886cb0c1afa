//! Time source and client timestamp clamping.

use chrono::{DateTime, TimeZone, Utc};

/// Earliest timestamp the service accepts: its own launch date,
/// 13 July 2021 00:00:00 UTC.
pub const EPOCH_FLOOR_MILLIS: i64 = 1_626_134_400_000;

pub fn epoch_floor() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(EPOCH_FLOOR_MILLIS)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Clamps a client-supplied timestamp into `[epoch_floor(), now]`.
///
/// Absent input means "now". Skewed clocks are silently corrected rather
/// than rejected.
pub fn clamp(input: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = epoch_floor();
    let candidate = input.unwrap_or(now);
    // A `now` before the floor would invert the range; the floor wins.
    candidate.min(now).max(floor)
}

pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn absent_defaults_to_now() {
        assert_eq!(clamp(None, now()), now());
    }

    #[test]
    fn future_is_truncated_to_now() {
        let future = DateTime::parse_from_rfc3339("9999-12-31T23:59:59Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(clamp(Some(future), now()), now());
    }

    #[test]
    fn pre_epoch_is_raised_to_floor() {
        let ancient = DateTime::parse_from_rfc3339("1969-07-20T20:17:00-04:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(clamp(Some(ancient), now()), epoch_floor());
    }

    #[test]
    fn in_range_is_untouched() {
        let last_week = now() - Duration::days(7);
        assert_eq!(clamp(Some(last_week), now()), last_week);
    }

    #[test]
    fn floor_matches_launch_date() {
        assert_eq!(epoch_floor().to_rfc3339(), "2021-07-13T00:00:00+00:00");
    }

    proptest! {
        #[test]
        fn clamp_stays_within_bounds(offset_secs in -20_000_000_000i64..20_000_000_000i64) {
            let input = now() + Duration::seconds(offset_secs);
            let clamped = clamp(Some(input), now());
            prop_assert!(clamped >= epoch_floor());
            prop_assert!(clamped <= now());
        }
    }
}
