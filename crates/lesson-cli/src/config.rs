use std::path::Path;

use anyhow::{Context, Result};
use lesson_engine::expander::DEFAULT_WEEKS_AHEAD;
use lesson_engine::ExpansionOptions;
use serde::Deserialize;

/// Top-level `lessons.toml` configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LessonsConfig {
    /// Schedule expansion settings.
    #[serde(default)]
    pub schedule: ScheduleToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleToml {
    #[serde(default = "default_weeks_ahead")]
    pub weeks_ahead: u32,
    /// IANA zone the studio's lesson times are written in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// "shift-forward" or "skip".
    #[serde(default = "default_dst_policy")]
    pub dst_policy: String,
}

impl Default for ScheduleToml {
    fn default() -> Self {
        Self {
            weeks_ahead: default_weeks_ahead(),
            timezone: default_timezone(),
            dst_policy: default_dst_policy(),
        }
    }
}

fn default_weeks_ahead() -> u32 {
    DEFAULT_WEEKS_AHEAD
}
fn default_timezone() -> String {
    "UTC".to_string()
}
fn default_dst_policy() -> String {
    "shift-forward".to_string()
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default)]
pub struct Overrides<'a> {
    pub weeks_ahead: Option<u32>,
    pub timezone: Option<&'a str>,
    pub dst_policy: Option<&'a str>,
}

impl LessonsConfig {
    /// Read a TOML config file; `None` yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }

    /// Resolve expansion options, applying command-line overrides.
    pub fn expansion_options(&self, overrides: &Overrides<'_>) -> Result<ExpansionOptions> {
        let schedule = &self.schedule;
        let options = ExpansionOptions::from_names(
            overrides.weeks_ahead.unwrap_or(schedule.weeks_ahead),
            overrides.timezone.unwrap_or(&schedule.timezone),
            overrides.dst_policy.unwrap_or(&schedule.dst_policy),
        )?;
        Ok(options)
    }
}
