//! Calendar-side handling of expanded lessons: the validity filter applied
//! before rendering, chronological ordering, and day/week view windows.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::dst::{self, DstPolicy};
use crate::expander::LessonOccurrence;

/// Viewports narrower than this render the day view; wider ones the week view.
pub const DAY_VIEW_MAX_WIDTH_PX: u32 = 640;

/// Whether an occurrence can be placed on the calendar.
pub fn is_displayable(occurrence: &LessonOccurrence) -> bool {
    !occurrence.title.is_empty() && occurrence.start <= occurrence.end
}

/// Keep displayable occurrences, ordered by start time.
///
/// The sort is stable, so lessons starting together keep generation order.
pub fn prepare_for_display(occurrences: &[LessonOccurrence]) -> Vec<LessonOccurrence> {
    let mut shown: Vec<LessonOccurrence> = occurrences
        .iter()
        .filter(|o| is_displayable(o))
        .cloned()
        .collect();
    shown.sort_by_key(|o| o.start);
    shown
}

/// The granularity a calendar renders at, anchored on a local date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarView {
    /// A single local day.
    Day(NaiveDate),
    /// The Monday-started week containing the date.
    Week(NaiveDate),
}

impl CalendarView {
    /// Pick the view for a viewport width: day view on narrow screens.
    pub fn for_viewport(width_px: u32, date: NaiveDate) -> Self {
        if width_px < DAY_VIEW_MAX_WIDTH_PX {
            CalendarView::Day(date)
        } else {
            CalendarView::Week(date)
        }
    }

    /// First and one-past-last local dates covered by this view.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        match *self {
            CalendarView::Day(date) => (date, date + Days::new(1)),
            CalendarView::Week(date) => {
                let monday =
                    date - Days::new(u64::from(date.weekday().num_days_from_monday()));
                (monday, monday + Days::new(7))
            }
        }
    }

    /// Absolute `[start, end)` window of this view in `timezone`.
    ///
    /// Local midnights that fall in a DST gap are shifted forward.
    pub fn window(&self, timezone: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (first, last) = self.date_range();
        let start = dst::resolve_local(
            &timezone,
            first.and_time(NaiveTime::MIN),
            DstPolicy::ShiftForward,
        )?;
        let end = dst::resolve_local(
            &timezone,
            last.and_time(NaiveTime::MIN),
            DstPolicy::ShiftForward,
        )?;
        Some((start, end))
    }
}

/// Displayable occurrences that overlap `view`, ordered by start time.
pub fn occurrences_in_view(
    occurrences: &[LessonOccurrence],
    view: CalendarView,
    timezone: Tz,
) -> Vec<LessonOccurrence> {
    let Some((window_start, window_end)) = view.window(timezone) else {
        return Vec::new();
    };
    prepare_for_display(occurrences)
        .into_iter()
        .filter(|o| o.start < window_end && o.end > window_start)
        .collect()
}
