//! Cross-check against RFC 5545 weekly recurrence.
//!
//! A lesson slot is a `FREQ=WEEKLY` rule anchored on its first date in the
//! current week. Expanding the same rule with the `rrule` crate must give the
//! same start instants as the lesson expander.

use chrono::{DateTime, Datelike, Days, TimeZone, Utc};
use chrono_tz::Tz;
use lesson_engine::expander::first_week_start;
use lesson_engine::lesson::parse_lesson_day;
use lesson_engine::{expand_lessons, LessonDefinition};
use rrule::RRuleSet;

fn weekly_rrule_starts(
    definition: &LessonDefinition,
    weeks: u32,
    now: DateTime<Utc>,
    tz: Tz,
) -> Vec<DateTime<Utc>> {
    let day = parse_lesson_day(&definition.day).expect("valid day");
    let first = first_week_start(now, tz) + Days::new(u64::from(day.num_days_from_monday()));
    let time = definition.visit_time.replace(':', "");
    let text = format!(
        "DTSTART;TZID={}:{:04}{:02}{:02}T{}00\nRRULE:FREQ=WEEKLY;COUNT={}",
        tz.name(),
        first.year(),
        first.month(),
        first.day(),
        time,
        weeks
    );
    let set: RRuleSet = text.parse().expect("valid weekly rule");
    set.all(weeks as u16)
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&Utc))
        .collect()
}

fn lesson(day: &str, visit_time: &str) -> LessonDefinition {
    LessonDefinition {
        id: "s1".to_string(),
        name: "Amy".to_string(),
        instrument: "Piano".to_string(),
        day: day.to_string(),
        visit_time: visit_time.to_string(),
        duration: Some(45),
    }
}

fn assert_matches_rrule(definition: LessonDefinition, weeks: u32, now: DateTime<Utc>, tz: Tz) {
    let ours: Vec<DateTime<Utc>> = expand_lessons(std::slice::from_ref(&definition), weeks, now, tz)
        .into_iter()
        .map(|o| o.start)
        .collect();
    let reference = weekly_rrule_starts(&definition, weeks, now, tz);
    assert_eq!(ours, reference, "{} {} in {}", definition.day, definition.visit_time, tz);
}

// ===========================================================================
// Fixed-offset zones
// ===========================================================================

#[test]
fn monday_afternoon_utc() {
    let now = Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap();
    assert_matches_rrule(lesson("Monday", "14:30"), 12, now, Tz::UTC);
}

#[test]
fn saturday_morning_johannesburg() {
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 6, 0, 0).unwrap();
    assert_matches_rrule(
        lesson("Saturday", "09:15"),
        12,
        now,
        chrono_tz::Africa::Johannesburg,
    );
}

// ===========================================================================
// Zones with DST transitions inside the horizon
// ===========================================================================

#[test]
fn thursday_across_spring_forward_new_york() {
    // 2026-03-08 spring forward falls inside the 12-week horizon.
    let now = Utc.with_ymd_and_hms(2026, 2, 16, 15, 0, 0).unwrap();
    assert_matches_rrule(
        lesson("Thursday", "16:00"),
        12,
        now,
        chrono_tz::America::New_York,
    );
}

#[test]
fn sunday_across_fall_back_london() {
    // 2026-10-25 fall back falls inside the horizon.
    let now = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();
    assert_matches_rrule(
        lesson("Sunday", "17:45"),
        8,
        now,
        chrono_tz::Europe::London,
    );
}

#[test]
fn wednesday_across_southern_hemisphere_change_sydney() {
    // 2026-04-05 Sydney ends daylight time.
    let now = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();
    assert_matches_rrule(
        lesson("Wednesday", "07:00"),
        6,
        now,
        chrono_tz::Australia::Sydney,
    );
}
