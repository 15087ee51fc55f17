//! # lesson-engine
//!
//! Deterministic weekly lesson expansion for a music-lesson studio calendar.
//!
//! Each student carries one weekly lesson slot (day, time, duration). The
//! engine expands those slots into concrete, dated lessons over a rolling
//! horizon of whole weeks, starting with the current Monday-started week in the
//! studio's time zone. Expansion is pure: the reference instant and the zone
//! are always passed in, and malformed records are skipped rather than
//! reported.
//!
//! ## Modules
//!
//! - [`lesson`]: Lesson definitions, day names, visit-time parsing
//! - [`expander`]: Definitions → dated lesson occurrences
//! - [`dst`]: DST gap policies (skip, shift forward)
//! - [`calendar`]: Display filter, ordering, day/week view windows
//! - [`conflict`]: Detect overlapping lessons
//! - [`roster`]: Definitions grouped by teaching day
//! - [`student`]: Stored student documents and owner identities
//! - [`feed`]: Owner-scoped snapshot subscriptions and the live schedule
//! - [`error`]: Error types

pub mod calendar;
pub mod conflict;
pub mod dst;
pub mod error;
pub mod expander;
pub mod feed;
pub mod lesson;
pub mod roster;
pub mod student;

pub use calendar::{occurrences_in_view, prepare_for_display, CalendarView};
pub use conflict::{find_clashes, Clash};
pub use dst::DstPolicy;
pub use error::ScheduleError;
pub use expander::{
    expand_lessons, expand_lessons_with_policy, ExpansionOptions, LessonOccurrence,
};
pub use feed::{Clock, FixedClock, LiveSchedule, StudentDirectory, SystemClock};
pub use lesson::LessonDefinition;
pub use roster::{weekly_roster, RosterFilter, WeeklyRoster};
pub use student::{OwnerId, StudentDocument, StudentRecord};
