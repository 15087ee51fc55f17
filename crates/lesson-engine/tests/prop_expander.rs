//! Property-based tests for weekly lesson expansion using proptest.
//!
//! These check invariants that must hold for any roster, horizon and reference
//! instant, not just the specific scenarios in `expander_tests.rs`.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use lesson_engine::lesson::day_name;
use lesson_engine::{expand_lessons, LessonDefinition};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_valid_day() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(chrono::Weekday::Mon),
        Just(chrono::Weekday::Tue),
        Just(chrono::Weekday::Wed),
        Just(chrono::Weekday::Thu),
        Just(chrono::Weekday::Fri),
        Just(chrono::Weekday::Sat),
        Just(chrono::Weekday::Sun),
    ]
    .prop_map(|d| day_name(d).to_string())
}

/// Any day field, including empty and unknown names.
fn arb_any_day() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_valid_day(),
        1 => Just(String::new()),
        1 => Just("Funday".to_string()),
        1 => Just("monday".to_string()),
    ]
}

fn arb_valid_time() -> impl Strategy<Value = String> {
    (0u32..=23, 0u32..=59).prop_map(|(h, m)| format!("{:02}:{:02}", h, m))
}

fn arb_any_time() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_valid_time(),
        1 => Just(String::new()),
        1 => Just("soon".to_string()),
    ]
}

fn arb_duration() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![
        Just(None),
        (-30i64..=0).prop_map(Some),
        (1i64..=180).prop_map(Some),
    ]
}

fn arb_definition() -> impl Strategy<Value = LessonDefinition> {
    (
        "[a-z]{0,6}",
        "[a-z]{0,6}",
        arb_any_day(),
        arb_any_time(),
        arb_duration(),
    )
        .prop_map(|(name, instrument, day, visit_time, duration)| LessonDefinition {
            id: format!("{}-{}", name, day),
            name,
            instrument,
            day,
            visit_time,
            duration,
        })
}

fn arb_now() -> impl Strategy<Value = DateTime<Utc>> {
    // 2025-01-01 .. 2027-12-31
    (1_735_689_600i64..1_830_297_600).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

/// Zones without DST gaps, so every valid slot resolves exactly.
fn arb_fixed_zone() -> impl Strategy<Value = Tz> {
    prop_oneof![
        Just(Tz::UTC),
        Just(chrono_tz::Africa::Johannesburg),
        Just(chrono_tz::Asia::Tokyo),
        Just(chrono_tz::Asia::Kolkata),
    ]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

fn expected_duration(def: &LessonDefinition) -> i64 {
    match def.duration {
        Some(m) if m > 0 => m,
        _ => 60,
    }
}

// ---------------------------------------------------------------------------
// Property 1: Output size is bounded by weeks x definitions
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn output_is_bounded(
        defs in prop::collection::vec(arb_definition(), 0..8),
        weeks in 0u32..=20,
        now in arb_now(),
        tz in arb_fixed_zone(),
    ) {
        let result = expand_lessons(&defs, weeks, now, tz);
        prop_assert!(result.len() <= defs.len() * weeks as usize);
    }
}

// ---------------------------------------------------------------------------
// Property 2: Valid definitions produce exactly one lesson per week
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn valid_definition_fills_every_week(
        day in arb_valid_day(),
        time in arb_valid_time(),
        duration in arb_duration(),
        weeks in 0u32..=26,
        now in arb_now(),
        tz in arb_fixed_zone(),
    ) {
        let def = LessonDefinition {
            id: "s".to_string(),
            name: "Amy".to_string(),
            day,
            visit_time: time,
            duration,
            ..LessonDefinition::default()
        };
        let result = expand_lessons(&[def], weeks, now, tz);
        prop_assert_eq!(result.len(), weeks as usize);
    }
}

// ---------------------------------------------------------------------------
// Property 3: Unschedulable definitions never produce lessons
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn empty_day_or_time_contributes_nothing(
        time in arb_valid_time(),
        day in arb_valid_day(),
        blank_day in any::<bool>(),
        weeks in 0u32..=20,
        now in arb_now(),
    ) {
        let def = if blank_day {
            LessonDefinition { id: "s".into(), day: String::new(), visit_time: time, ..Default::default() }
        } else {
            LessonDefinition { id: "s".into(), day, visit_time: String::new(), ..Default::default() }
        };
        prop_assert!(expand_lessons(&[def], weeks, now, Tz::UTC).is_empty());
    }
}

// ---------------------------------------------------------------------------
// Property 4: Every lesson lasts its effective duration
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn end_minus_start_is_effective_duration(
        def in arb_definition(),
        weeks in 1u32..=12,
        now in arb_now(),
        tz in arb_fixed_zone(),
    ) {
        let expected = Duration::minutes(expected_duration(&def));
        for o in expand_lessons(std::slice::from_ref(&def), weeks, now, tz) {
            prop_assert_eq!(o.end - o.start, expected);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Consecutive weeks are exactly seven days apart at the same time
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn consecutive_weeks_are_seven_days_apart(
        day in arb_valid_day(),
        time in arb_valid_time(),
        weeks in 2u32..=20,
        now in arb_now(),
        tz in arb_fixed_zone(),
    ) {
        let def = LessonDefinition {
            id: "s".to_string(),
            day,
            visit_time: time,
            ..LessonDefinition::default()
        };
        let result = expand_lessons(&[def], weeks, now, tz);
        for pair in result.windows(2) {
            prop_assert_eq!(pair[1].start - pair[0].start, Duration::days(7));
            let a = pair[0].start.with_timezone(&tz);
            let b = pair[1].start.with_timezone(&tz);
            prop_assert_eq!((a.hour(), a.minute()), (b.hour(), b.minute()));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: Same local time of day across DST changes
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn local_time_of_day_is_stable_in_dst_zones(
        day in arb_valid_day(),
        // 04:00..=23:59 avoids every gap and overlap in these zones.
        hour in 4u32..=23,
        minute in 0u32..=59,
        weeks in 1u32..=30,
        now in arb_now(),
        tz in prop_oneof![
            Just(chrono_tz::America::New_York),
            Just(chrono_tz::Europe::London),
            Just(chrono_tz::Australia::Sydney),
        ],
    ) {
        let def = LessonDefinition {
            id: "s".to_string(),
            day,
            visit_time: format!("{:02}:{:02}", hour, minute),
            ..LessonDefinition::default()
        };
        let result = expand_lessons(&[def], weeks, now, tz);
        prop_assert_eq!(result.len(), weeks as usize);
        for o in &result {
            let local = o.start.with_timezone(&tz);
            prop_assert_eq!((local.hour(), local.minute()), (hour, minute));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 7: Expansion is deterministic
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn expansion_is_deterministic(
        defs in prop::collection::vec(arb_definition(), 0..6),
        weeks in 0u32..=12,
        now in arb_now(),
        tz in arb_fixed_zone(),
    ) {
        prop_assert_eq!(
            expand_lessons(&defs, weeks, now, tz),
            expand_lessons(&defs, weeks, now, tz)
        );
    }
}
