//! Detect lessons that overlap in an expanded schedule.
//!
//! One teacher cannot give two lessons at once, so any overlap between two
//! occurrences is a clash. Back-to-back lessons (one ends exactly when the
//! next starts) are NOT clashes.

use serde::Serialize;

use crate::expander::LessonOccurrence;

/// Two overlapping lessons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clash {
    /// The lesson that starts first (generation order breaks ties).
    pub first: LessonOccurrence,
    pub second: LessonOccurrence,
    pub overlap_minutes: i64,
}

/// Find every pair of overlapping occurrences.
///
/// Two lessons overlap when `a.start < b.end && b.start < a.end`; the overlap
/// is `min(a.end, b.end) - max(a.start, b.start)`. Results are ordered by the
/// start of the earlier lesson.
pub fn find_clashes(occurrences: &[LessonOccurrence]) -> Vec<Clash> {
    let mut ordered: Vec<&LessonOccurrence> = occurrences.iter().collect();
    ordered.sort_by_key(|o| o.start);

    let mut clashes = Vec::new();
    for (i, a) in ordered.iter().enumerate() {
        // Sorted by start: once b starts at or after a ends, nothing later overlaps a.
        for b in ordered[i + 1..].iter().take_while(|b| b.start < a.end) {
            if a.start < b.end {
                let overlap_start = a.start.max(b.start);
                let overlap_end = a.end.min(b.end);
                clashes.push(Clash {
                    first: (*a).clone(),
                    second: (*b).clone(),
                    overlap_minutes: (overlap_end - overlap_start).num_minutes(),
                });
            }
        }
    }

    clashes
}
