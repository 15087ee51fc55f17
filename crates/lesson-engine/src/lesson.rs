//! Lesson definitions and the weekly slot each one describes.
//!
//! A definition is what a student record says about its weekly lesson. It is
//! deliberately lenient: every field may be missing or malformed, and
//! [`LessonDefinition::slot`] decides whether anything can be scheduled from it.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Lesson length used when a definition has no positive duration.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Title used when a definition has no name.
pub const DEFAULT_TITLE: &str = "Lesson";

/// One student's weekly-recurring lesson, as read from the document store.
///
/// Empty strings stand for absent fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDefinition {
    /// Stable identifier owned by the document store.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub instrument: String,
    /// Full English day name ("Monday" .. "Sunday").
    #[serde(default)]
    pub day: String,
    /// Wall-clock time of day, `HH:MM`.
    #[serde(default)]
    pub visit_time: String,
    /// Lesson length in minutes. Non-positive values fall back to the default.
    #[serde(default)]
    pub duration: Option<i64>,
}

/// The schedulable part of a definition: which weekday, what time, how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySlot {
    pub day: Weekday,
    /// Parsed hour component. May lie outside 0..24; it rolls over on combination.
    pub hour: i64,
    /// Parsed minute component. May lie outside 0..60; it rolls over on combination.
    pub minute: i64,
    pub duration_minutes: i64,
}

impl LessonDefinition {
    /// Display title: `"{name} – {instrument}"`, or the name alone when there
    /// is no instrument. A missing name becomes [`DEFAULT_TITLE`].
    pub fn title(&self) -> String {
        let name = if self.name.is_empty() {
            DEFAULT_TITLE
        } else {
            self.name.as_str()
        };
        if self.instrument.is_empty() {
            name.to_string()
        } else {
            format!("{} – {}", name, self.instrument)
        }
    }

    /// Lesson length in minutes after applying the default.
    pub fn effective_duration(&self) -> i64 {
        self.duration
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_DURATION_MINUTES)
    }

    /// The weekly slot this definition occupies, or `None` when it cannot be
    /// scheduled (empty day, empty time, or an unrecognized day name).
    ///
    /// An unparseable hour or minute is read as `0` rather than rejected.
    pub fn slot(&self) -> Option<WeeklySlot> {
        if self.day.is_empty() || self.visit_time.is_empty() {
            return None;
        }
        let day = parse_lesson_day(&self.day)?;
        let (hour, minute) = parse_visit_time(&self.visit_time);
        Some(WeeklySlot {
            day,
            hour,
            minute,
            duration_minutes: self.effective_duration(),
        })
    }
}

impl WeeklySlot {
    /// Combine `date` with this slot's time of day.
    ///
    /// Out-of-range components carry into the next hour or day, so `25:00`
    /// lands at 01:00 on the following date. Returns `None` only on overflow.
    pub fn local_start(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        date.and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::try_hours(self.hour)?)?
            .checked_add_signed(Duration::try_minutes(self.minute)?)
    }
}

/// Map a full English day name to a weekday. Matching is exact.
pub fn parse_lesson_day(name: &str) -> Option<Weekday> {
    match name {
        "Monday" => Some(Weekday::Mon),
        "Tuesday" => Some(Weekday::Tue),
        "Wednesday" => Some(Weekday::Wed),
        "Thursday" => Some(Weekday::Thu),
        "Friday" => Some(Weekday::Fri),
        "Saturday" => Some(Weekday::Sat),
        "Sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Full English name for a weekday, the inverse of [`parse_lesson_day`].
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Split `HH:MM` into hour and minute. Missing or non-numeric parts are `0`.
pub fn parse_visit_time(visit_time: &str) -> (i64, i64) {
    let mut parts = visit_time.split(':');
    let hour = parts.next().map_or(0, parse_time_component);
    let minute = parts.next().map_or(0, parse_time_component);
    (hour, minute)
}

fn parse_time_component(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}
