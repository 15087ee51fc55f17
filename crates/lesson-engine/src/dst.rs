//! DST transition policies for weekly lessons.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};

use crate::error::ScheduleError;

/// Policy for lessons whose wall-clock start does not exist locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstPolicy {
    /// Drop instances that fall in the DST gap (e.g., 02:30 during spring forward).
    Skip,
    /// Move the instance forward by the length of the gap, keeping it on the calendar.
    #[default]
    ShiftForward,
}

impl FromStr for DstPolicy {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(DstPolicy::Skip),
            "shift-forward" => Ok(DstPolicy::ShiftForward),
            other => Err(ScheduleError::InvalidDstPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for DstPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DstPolicy::Skip => f.write_str("skip"),
            DstPolicy::ShiftForward => f.write_str("shift-forward"),
        }
    }
}

/// Resolve a local wall-clock time in `tz` to an absolute instant.
///
/// Ambiguous times (fall back) resolve to the earlier instant. Times inside a
/// gap (spring forward) follow `policy`.
pub fn resolve_local<T: TimeZone>(
    tz: &T,
    local: NaiveDateTime,
    policy: DstPolicy,
) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => shift_past_gap(tz, local),
        },
    }
}

/// Interpret a non-existent local time with the offset in force just before
/// the transition, which lands it the same distance past the gap.
fn shift_past_gap<T: TimeZone>(tz: &T, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    let before = local.checked_sub_signed(Duration::days(1))?;
    let offset = tz.offset_from_local_datetime(&before).earliest()?.fix();
    let utc = local.checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))?;
    Some(Utc.from_utc_datetime(&utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::America::New_York;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn gap_time_shifts_forward_by_default() {
        // 2026-03-08 02:30 does not exist in New York (clocks jump 02:00 -> 03:00).
        let resolved = resolve_local(&New_York, local(2026, 3, 8, 2, 30), DstPolicy::default())
            .expect("shifted");
        // Read with EST (-5): 07:30 UTC, which is 03:30 EDT.
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 3, 8, 7, 30, 0).unwrap());
    }

    #[test]
    fn gap_time_skipped_under_skip_policy() {
        assert!(resolve_local(&New_York, local(2026, 3, 8, 2, 30), DstPolicy::Skip).is_none());
    }

    #[test]
    fn ambiguous_time_takes_earlier_instant() {
        // 2026-11-01 01:30 happens twice in New York; first is EDT (-4).
        let resolved =
            resolve_local(&New_York, local(2026, 11, 1, 1, 30), DstPolicy::Skip).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap());
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!("skip".parse::<DstPolicy>().unwrap(), DstPolicy::Skip);
        assert_eq!(
            "shift-forward".parse::<DstPolicy>().unwrap(),
            DstPolicy::ShiftForward
        );
        assert!("wall-clock".parse::<DstPolicy>().is_err());
        assert_eq!(DstPolicy::ShiftForward.to_string(), "shift-forward");
    }
}
