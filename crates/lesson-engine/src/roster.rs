//! Weekly roster: lesson definitions grouped by teaching day.
//!
//! Each day lists its students by visit time. Definitions the expander would
//! skip are collected separately as unscheduled so they can still be found
//! and fixed.

use chrono::Weekday;
use serde::{Serialize, Serializer};

use crate::lesson::{day_name, LessonDefinition};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Narrow the roster to one day and/or a search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilter {
    pub day: Option<Weekday>,
    /// Case-insensitive substring matched against name and instrument.
    pub search: Option<String>,
}

impl RosterFilter {
    fn matches(&self, definition: &LessonDefinition) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim) else {
            return true;
        };
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        definition.name.to_lowercase().contains(&term)
            || definition.instrument.to_lowercase().contains(&term)
    }
}

/// One teaching day and its lessons, earliest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterDay {
    #[serde(serialize_with = "serialize_day")]
    pub day: Weekday,
    pub lessons: Vec<LessonDefinition>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WeeklyRoster {
    /// Monday through Sunday, limited to the filter's day when one is set.
    pub days: Vec<RosterDay>,
    pub unscheduled: Vec<LessonDefinition>,
}

impl WeeklyRoster {
    pub fn lessons_on(&self, day: Weekday) -> &[LessonDefinition] {
        self.days
            .iter()
            .find(|d| d.day == day)
            .map(|d| d.lessons.as_slice())
            .unwrap_or(&[])
    }
}

/// Group `definitions` by weekday, sorting each day by visit time.
///
/// Visit times compare as text, which orders zero-padded `HH:MM` correctly.
/// Equal times keep input order.
pub fn weekly_roster(definitions: &[LessonDefinition], filter: &RosterFilter) -> WeeklyRoster {
    let matching: Vec<&LessonDefinition> =
        definitions.iter().filter(|d| filter.matches(d)).collect();

    let days = WEEK
        .iter()
        .filter(|day| filter.day.is_none_or(|only| only == **day))
        .map(|&day| {
            let mut lessons: Vec<LessonDefinition> = matching
                .iter()
                .filter(|d| d.slot().is_some_and(|slot| slot.day == day))
                .map(|d| (*d).clone())
                .collect();
            lessons.sort_by(|a, b| a.visit_time.cmp(&b.visit_time));
            RosterDay { day, lessons }
        })
        .collect();

    let unscheduled = matching
        .iter()
        .filter(|d| d.slot().is_none())
        .map(|d| (*d).clone())
        .collect();

    WeeklyRoster { days, unscheduled }
}

fn serialize_day<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(day_name(*day))
}
