//! WASM bindings for lesson-engine.
//!
//! Exposes weekly lesson expansion and clash detection to the browser calendar
//! via `wasm-bindgen`. Student records go in and results come out as JSON
//! strings, so the JavaScript side can hand over a document-store snapshot
//! as-is.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p lesson-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/wasm/ \
//!   target/wasm32-unknown-unknown/release/lesson_engine_wasm.wasm
//! ```

use chrono::{DateTime, Utc};
use lesson_engine::expander::{parse_instant, LessonOccurrence};
use lesson_engine::student::{definitions_for_owner, parse_snapshot};
use lesson_engine::{find_clashes, prepare_for_display, ExpansionOptions, LessonDefinition};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct LessonDto {
    title: String,
    start: String,
    end: String,
}

impl From<&LessonOccurrence> for LessonDto {
    fn from(o: &LessonOccurrence) -> Self {
        Self {
            title: o.title.clone(),
            start: o.start.to_rfc3339(),
            end: o.end.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct ClashDto {
    first: LessonDto,
    second: LessonDto,
    overlap_minutes: i64,
}

// ---------------------------------------------------------------------------
// Plain-Rust implementations (testable without a JS host)
// ---------------------------------------------------------------------------

struct Request {
    definitions: Vec<LessonDefinition>,
    options: ExpansionOptions,
    now: DateTime<Utc>,
}

fn parse_request(
    students_json: &str,
    weeks_ahead: u32,
    now: &str,
    timezone: &str,
) -> Result<Request, String> {
    let records =
        parse_snapshot(students_json).map_err(|e| format!("Invalid students JSON: {}", e))?;
    let options = ExpansionOptions::from_names(weeks_ahead, timezone, "shift-forward")
        .map_err(|e| e.to_string())?;
    let now = parse_instant(now, options.timezone).map_err(|e| e.to_string())?;
    Ok(Request {
        definitions: definitions_for_owner(&records, None),
        options,
        now,
    })
}

fn build_weekly_lessons_json(
    students_json: &str,
    weeks_ahead: u32,
    now: &str,
    timezone: &str,
) -> Result<String, String> {
    let request = parse_request(students_json, weeks_ahead, now, timezone)?;
    let occurrences = prepare_for_display(&request.options.expand(&request.definitions, request.now));
    let dtos: Vec<LessonDto> = occurrences.iter().map(LessonDto::from).collect();
    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

fn find_lesson_clashes_json(
    students_json: &str,
    weeks_ahead: u32,
    now: &str,
    timezone: &str,
) -> Result<String, String> {
    let request = parse_request(students_json, weeks_ahead, now, timezone)?;
    let clashes = find_clashes(&request.options.expand(&request.definitions, request.now));
    let dtos: Vec<ClashDto> = clashes
        .iter()
        .map(|c| ClashDto {
            first: LessonDto::from(&c.first),
            second: LessonDto::from(&c.second),
            overlap_minutes: c.overlap_minutes,
        })
        .collect();
    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand the students' weekly lessons into dated calendar events.
///
/// Returns a JSON string containing an array of `{title, start, end}` objects
/// with RFC 3339 datetimes, ordered by start.
///
/// # Arguments
/// - `students_json` -- JSON array of student records (`id`, `name`, `day`, `visitTime`, ...)
/// - `weeks_ahead` -- Horizon in weeks, starting with the current week
/// - `now` -- Reference time (RFC 3339, e.g. `new Date().toISOString()`)
/// - `timezone` -- IANA timezone the lesson times are written in
#[wasm_bindgen(js_name = "buildWeeklyLessons")]
pub fn build_weekly_lessons(
    students_json: &str,
    weeks_ahead: u32,
    now: &str,
    timezone: &str,
) -> Result<String, JsValue> {
    build_weekly_lessons_json(students_json, weeks_ahead, now, timezone)
        .map_err(|e| JsValue::from_str(&e))
}

/// Find overlapping lessons over the horizon.
///
/// Takes the same arguments as `buildWeeklyLessons`. Returns a JSON string
/// containing an array of `{first, second, overlap_minutes}` objects.
#[wasm_bindgen(js_name = "findLessonClashes")]
pub fn find_lesson_clashes(
    students_json: &str,
    weeks_ahead: u32,
    now: &str,
    timezone: &str,
) -> Result<String, JsValue> {
    find_lesson_clashes_json(students_json, weeks_ahead, now, timezone)
        .map_err(|e| JsValue::from_str(&e))
}
