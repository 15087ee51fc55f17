//! Error types for lesson-engine boundary operations.
//!
//! The expander itself never fails. These errors come from the edges: parsing
//! student snapshots, resolving configured time zones, and reading overrides.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),

    #[error("Invalid day: {0}")]
    InvalidDay(String),

    #[error("Invalid DST policy: {0}")]
    InvalidDstPolicy(String),

    #[error("Invalid student snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
