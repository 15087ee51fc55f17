//! `lessons` CLI: expand a studio's weekly lessons into a dated schedule.
//!
//! Input is a JSON array of student records as exported from the document
//! store (`[{"id": "...", "name": "...", "day": "Monday", "visitTime": "14:30", ...}]`).
//!
//! ## Usage
//!
//! ```sh
//! # Twelve weeks of lessons as JSON (stdin → stdout)
//! cat students.json | lessons schedule
//!
//! # One teacher's lessons for the next four weeks, as a readable list
//! lessons schedule -i students.json --owner uid-123 --weeks 4 --format text
//!
//! # Use studio settings from a config file, pinned to a reference time
//! lessons schedule -c lessons.toml --now 2026-03-04T10:00:00
//!
//! # Who comes on Mondays?
//! lessons roster -i students.json --day Monday
//!
//! # Overlapping lessons over the horizon
//! lessons clashes -i students.json
//! ```

mod config;
mod logging;

use std::fmt::Write as _;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use lesson_engine::expander::parse_instant;
use lesson_engine::lesson::{day_name, parse_lesson_day};
use lesson_engine::student::{definitions_for_owner, parse_snapshot};
use lesson_engine::{
    find_clashes, prepare_for_display, weekly_roster, Clash, ExpansionOptions, LessonDefinition,
    LessonOccurrence, OwnerId, RosterFilter, ScheduleError, WeeklyRoster,
};
use tracing::info;

use crate::config::{LessonsConfig, Overrides};

#[derive(Parser)]
#[command(
    name = "lessons",
    version,
    about = "Weekly lesson schedule for a music studio"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand weekly lessons into dated occurrences
    Schedule {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        expansion: ExpansionArgs,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Group students by lesson day
    Roster {
        #[command(flatten)]
        source: SourceArgs,
        /// Only show this day (e.g., "Monday")
        #[arg(long)]
        day: Option<String>,
        /// Only show students whose name or instrument contains this text
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List overlapping lessons within the horizon
    Clashes {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        expansion: ExpansionArgs,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Student records JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Only include students owned by this user id
    #[arg(long)]
    owner: Option<String>,
}

#[derive(clap::Args)]
struct ExpansionArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of weeks to expand, starting with the current week
    #[arg(long)]
    weeks: Option<u32>,
    /// IANA time zone lesson times are written in
    #[arg(long)]
    timezone: Option<String>,
    /// DST gap policy: "shift-forward" or "skip"
    #[arg(long)]
    dst_policy: Option<String>,
    /// Reference time instead of the system clock (RFC 3339 or local YYYY-MM-DDTHH:MM:SS)
    #[arg(long)]
    now: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Schedule {
            source,
            expansion,
            output,
            format,
        } => {
            let definitions = load_definitions(&source)?;
            let (options, now) = resolve_expansion(&expansion)?;
            let occurrences = prepare_for_display(&options.expand(&definitions, now));
            info!(
                students = definitions.len(),
                lessons = occurrences.len(),
                weeks = options.weeks_ahead,
                "schedule built"
            );

            let rendered = match format {
                Format::Json => serde_json::to_string_pretty(&occurrences)?,
                Format::Text => render_schedule(&occurrences, options.timezone),
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Roster {
            source,
            day,
            search,
            format,
        } => {
            let definitions = load_definitions(&source)?;
            let day = day
                .map(|d| parse_lesson_day(&d).ok_or(ScheduleError::InvalidDay(d)))
                .transpose()?;
            let roster = weekly_roster(&definitions, &RosterFilter { day, search });

            let rendered = match format {
                Format::Json => serde_json::to_string_pretty(&roster)?,
                Format::Text => render_roster(&roster),
            };
            write_output(None, &rendered)?;
        }
        Commands::Clashes {
            source,
            expansion,
            format,
        } => {
            let definitions = load_definitions(&source)?;
            let (options, now) = resolve_expansion(&expansion)?;
            let clashes = find_clashes(&options.expand(&definitions, now));
            info!(clashes = clashes.len(), "clash check done");

            let rendered = match format {
                Format::Json => serde_json::to_string_pretty(&clashes)?,
                Format::Text => render_clashes(&clashes, options.timezone),
            };
            write_output(None, &rendered)?;
        }
    }

    Ok(())
}

fn load_definitions(source: &SourceArgs) -> Result<Vec<LessonDefinition>> {
    let json = read_input(source.input.as_deref())?;
    let records = parse_snapshot(&json).context("Failed to parse student records")?;
    let owner = source.owner.as_deref().map(OwnerId::new);
    let definitions = definitions_for_owner(&records, owner.as_ref());
    info!(
        records = records.len(),
        visible = definitions.len(),
        "student records loaded"
    );
    Ok(definitions)
}

fn resolve_expansion(args: &ExpansionArgs) -> Result<(ExpansionOptions, DateTime<Utc>)> {
    let config = LessonsConfig::load(args.config.as_deref())?;
    let options = config.expansion_options(&Overrides {
        weeks_ahead: args.weeks,
        timezone: args.timezone.as_deref(),
        dst_policy: args.dst_policy.as_deref(),
    })?;
    let now = match args.now.as_deref() {
        Some(s) => parse_instant(s, options.timezone)?,
        None => Utc::now(),
    };
    Ok((options, now))
}

fn render_schedule(occurrences: &[LessonOccurrence], tz: Tz) -> String {
    if occurrences.is_empty() {
        return "No scheduled lessons yet. Add students with a day and time to see them here.\n"
            .to_string();
    }
    let mut out = String::new();
    for o in occurrences {
        let start = o.start.with_timezone(&tz);
        let end = o.end.with_timezone(&tz);
        let _ = writeln!(
            out,
            "{}  {}-{}  {}",
            start.format("%Y-%m-%d %a"),
            start.format("%H:%M"),
            end.format("%H:%M"),
            o.title
        );
    }
    out
}

fn render_roster(roster: &WeeklyRoster) -> String {
    let mut out = String::new();
    for day in &roster.days {
        let _ = writeln!(out, "{}", day_name(day.day));
        if day.lessons.is_empty() {
            let _ = writeln!(out, "  (no lessons)");
        }
        for lesson in &day.lessons {
            let _ = writeln!(
                out,
                "  {}  {} ({} min)",
                lesson.visit_time,
                lesson.title(),
                lesson.effective_duration()
            );
        }
    }
    if !roster.unscheduled.is_empty() {
        let _ = writeln!(out, "Unscheduled");
        for lesson in &roster.unscheduled {
            let _ = writeln!(out, "  {}", lesson.title());
        }
    }
    out
}

fn render_clashes(clashes: &[Clash], tz: Tz) -> String {
    if clashes.is_empty() {
        return "No clashing lessons.\n".to_string();
    }
    let mut out = String::new();
    for clash in clashes {
        let start = clash.first.start.with_timezone(&tz);
        let _ = writeln!(
            out,
            "{}  {} overlaps {} by {} min",
            start.format("%Y-%m-%d %a %H:%M"),
            clash.first.title,
            clash.second.title,
            clash.overlap_minutes
        );
    }
    out
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
