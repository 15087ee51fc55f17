//! Weekly lesson expansion -- turns recurring lesson definitions into concrete
//! calendar occurrences over a rolling horizon of whole weeks.
//!
//! The horizon starts at the Monday of the week containing `now`, as seen in the
//! studio's time zone. Both `now` and the zone are passed in; nothing here reads
//! the system clock or the process time zone.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::dst::{self, DstPolicy};
use crate::error::{Result, ScheduleError};
use crate::lesson::{LessonDefinition, WeeklySlot};

/// Default horizon length in weeks.
pub const DEFAULT_WEEKS_AHEAD: u32 = 12;

/// Upper bound on the up-front allocation for one expansion.
const MAX_PREALLOCATED: usize = 4096;

/// A single dated lesson with absolute start and end times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonOccurrence {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Everything besides the definitions and `now` that shapes an expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionOptions {
    pub weeks_ahead: u32,
    pub timezone: Tz,
    pub dst_policy: DstPolicy,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            weeks_ahead: DEFAULT_WEEKS_AHEAD,
            timezone: Tz::UTC,
            dst_policy: DstPolicy::default(),
        }
    }
}

impl ExpansionOptions {
    /// Build options from textual settings (config files, CLI flags, JS callers).
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidTimezone` for an unknown IANA zone and
    /// `ScheduleError::InvalidDstPolicy` for an unknown policy name.
    pub fn from_names(weeks_ahead: u32, timezone: &str, dst_policy: &str) -> Result<Self> {
        Ok(Self {
            weeks_ahead,
            timezone: parse_timezone(timezone)?,
            dst_policy: dst_policy.parse()?,
        })
    }

    /// Expand `definitions` with these options, anchored at `now`.
    pub fn expand(
        &self,
        definitions: &[LessonDefinition],
        now: DateTime<Utc>,
    ) -> Vec<LessonOccurrence> {
        expand_lessons_with_policy(
            definitions,
            self.weeks_ahead,
            now,
            self.timezone,
            self.dst_policy,
        )
    }
}

/// Parse an IANA time zone name.
///
/// # Errors
/// Returns `ScheduleError::InvalidTimezone` if the name is not a known zone.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
}

/// Parse a reference instant.
///
/// Accepts RFC 3339 (with offset, e.g. "2026-03-04T10:00:00+02:00") and naive
/// local time (e.g. "2026-03-04T10:00:00"), which is read in `timezone`.
///
/// # Errors
/// Returns `ScheduleError::InvalidDateTime` if neither form parses.
pub fn parse_instant(s: &str, timezone: Tz) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .and_then(|local| dst::resolve_local(&timezone, local, DstPolicy::ShiftForward))
        .ok_or_else(|| ScheduleError::InvalidDateTime(s.to_string()))
}

/// Monday of the local calendar week that contains `now`.
pub fn first_week_start(now: DateTime<Utc>, timezone: Tz) -> NaiveDate {
    let today = now.with_timezone(&timezone).date_naive();
    today - Days::new(u64::from(today.weekday().num_days_from_monday()))
}

/// Expand weekly lesson definitions into concrete occurrences.
///
/// Produces one occurrence per schedulable definition for each of the
/// `weeks_ahead` weeks starting with the current one. Generation order is
/// week by week, and within a week the order of `definitions`.
///
/// Definitions with an empty day, an empty time, or an unknown day name are
/// skipped. An occurrence whose start or end falls outside chrono's
/// representable range is skipped as well, so a duration too large for
/// `chrono::Duration` produces no lessons. The horizon stops early at the last
/// representable week. This function never fails.
///
/// # Arguments
/// - `definitions` -- Lesson definitions in display order
/// - `weeks_ahead` -- Horizon length in weeks (0 yields nothing)
/// - `now` -- Reference instant that picks the first week
/// - `timezone` -- Zone in which days and times of day are interpreted
pub fn expand_lessons(
    definitions: &[LessonDefinition],
    weeks_ahead: u32,
    now: DateTime<Utc>,
    timezone: Tz,
) -> Vec<LessonOccurrence> {
    expand_lessons_with_policy(
        definitions,
        weeks_ahead,
        now,
        timezone,
        DstPolicy::default(),
    )
}

/// Expand weekly lesson definitions with an explicit DST gap policy.
///
/// Identical to [`expand_lessons`] except that lessons whose local start time
/// does not exist (spring forward) follow `dst_policy` instead of the default
/// shift-forward behaviour.
pub fn expand_lessons_with_policy(
    definitions: &[LessonDefinition],
    weeks_ahead: u32,
    now: DateTime<Utc>,
    timezone: Tz,
    dst_policy: DstPolicy,
) -> Vec<LessonOccurrence> {
    // Whether a definition is schedulable does not depend on the week.
    let scheduled: Vec<(String, WeeklySlot)> = definitions
        .iter()
        .filter_map(|definition| match definition.slot() {
            Some(slot) => Some((definition.title(), slot)),
            None => {
                trace!(
                    id = %definition.id,
                    day = %definition.day,
                    visit_time = %definition.visit_time,
                    "lesson not scheduled; skipped"
                );
                None
            }
        })
        .collect();

    let first = first_week_start(now, timezone);
    let mut occurrences = Vec::with_capacity(
        scheduled
            .len()
            .saturating_mul(weeks_ahead as usize)
            .min(MAX_PREALLOCATED),
    );

    for week in 0..weeks_ahead {
        let Some(week_start) = first.checked_add_days(Days::new(7 * u64::from(week))) else {
            debug!(week, %first, "horizon leaves the calendar range; stopping");
            break;
        };

        for (title, slot) in &scheduled {
            let Some(lesson_date) = week_start
                .checked_add_days(Days::new(u64::from(slot.day.num_days_from_monday())))
            else {
                trace!(%title, %week_start, "lesson date out of range; skipped");
                continue;
            };

            let Some(start) = slot
                .local_start(lesson_date)
                .and_then(|local| dst::resolve_local(&timezone, local, dst_policy))
            else {
                trace!(%title, %lesson_date, "lesson start unresolvable; skipped");
                continue;
            };
            let Some(end) = Duration::try_minutes(slot.duration_minutes)
                .and_then(|duration| start.checked_add_signed(duration))
            else {
                trace!(%title, minutes = slot.duration_minutes, "lesson end overflows; skipped");
                continue;
            };

            occurrences.push(LessonOccurrence {
                title: title.clone(),
                start,
                end,
            });
        }
    }

    debug!(
        definitions = definitions.len(),
        scheduled = scheduled.len(),
        weeks_ahead,
        occurrences = occurrences.len(),
        %first,
        "expanded weekly lessons"
    );

    occurrences
}
