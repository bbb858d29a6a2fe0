//! `conflicts` CLI — check proposed meeting windows against existing commitments.
//!
//! ## Usage
//!
//! ```sh
//! # Check a window against a meeting-store snapshot
//! conflicts check --store meetings.json --participants p-ada,p-grace \
//!     --start 2026-03-02T10:30:00Z --end 2026-03-02T11:30:00Z
//!
//! # Re-check a meeting being moved, ignoring its own stored row
//! conflicts check --store meetings.json --participants p-ada \
//!     --start 2026-03-02T10:15:00Z --end 2026-03-02T11:15:00Z --exclude-meeting review
//!
//! # Run the engine directly on a {query, commitments} document
//! conflicts detect -i request.json --format text
//! ```
//!
//! Logs go to stderr (`RUST_LOG` overrides the default level); reports go to stdout
//! or the `-o` file.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use conflict_engine::{
    detect, Commitment, ConflictCheckRequest, ConflictChecker, ConflictQuery, ConflictReport,
    MeetingId, ParticipantId, SnapshotStore, TimeInterval,
};
use serde::Deserialize;
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "conflicts",
    version,
    about = "Meeting scheduling-conflict checker"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (ignored when RUST_LOG is set)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a proposed window against a meeting-store snapshot
    Check {
        /// JSON snapshot of participants and meetings
        #[arg(long, env = "CONFLICTS_STORE")]
        store: String,
        /// Comma-separated participant ids, in reporting order
        #[arg(long, value_delimiter = ',')]
        participants: Vec<String>,
        /// Window start (RFC 3339; a bare timestamp is read as UTC)
        #[arg(long)]
        start: String,
        /// Window end, exclusive (RFC 3339; a bare timestamp is read as UTC)
        #[arg(long)]
        end: String,
        /// Meeting id to ignore, for re-checking a meeting being edited
        #[arg(long)]
        exclude_meeting: Option<String>,
        #[arg(long, value_enum, env = "CONFLICTS_FORMAT", default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run the engine on a raw {"query", "commitments"} JSON document
    Detect {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long, value_enum, env = "CONFLICTS_FORMAT", default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

/// Report rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON report
    Json,
    /// One line per blocking meeting
    Text,
}

/// Input document for `detect`.
#[derive(Deserialize)]
struct DetectInput {
    query: ConflictQuery,
    #[serde(default)]
    commitments: Vec<Commitment>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check {
            store,
            participants,
            start,
            end,
            exclude_meeting,
            format,
            output,
        } => {
            let json = std::fs::read_to_string(&store)
                .with_context(|| format!("Failed to read store snapshot: {}", store))?;
            let snapshot = SnapshotStore::from_json(&json)
                .with_context(|| format!("Failed to load store snapshot: {}", store))?;
            debug!(meetings = snapshot.meeting_count(), path = %store, "loaded snapshot");

            let request = ConflictCheckRequest {
                participant_ids: parse_participant_ids(&participants),
                start_time: parse_datetime(&start)?,
                end_time: parse_datetime(&end)?,
                exclude_meeting_id: exclude_meeting.map(MeetingId::from),
            };

            let report = ConflictChecker::new(snapshot)
                .check(&request)
                .context("Conflict check failed")?;

            let window = TimeInterval {
                start: request.start_time,
                end: request.end_time,
            };
            let rendered = render(&report, format, &window)?;
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Detect {
            input,
            output,
            format,
        } => {
            let json = read_input(input.as_deref())?;
            let input: DetectInput =
                serde_json::from_str(&json).context("Failed to parse detect input")?;

            let report =
                detect(&input.query, &input.commitments).context("Conflict detection failed")?;

            let rendered = render(&report, format, &input.query.interval)?;
            write_output(output.as_deref(), &rendered)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Split-and-trim participant ids; blank entries are dropped.
fn parse_participant_ids(raw: &[String]) -> Vec<ParticipantId> {
    raw.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(ParticipantId::from)
        .collect()
}

/// Parse an RFC 3339 timestamp into UTC.
///
/// A naive `YYYY-MM-DDTHH:MM:SS` (no offset) is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .with_context(|| format!("Invalid datetime '{}'", s))
}

fn render(report: &ConflictReport, format: OutputFormat, window: &TimeInterval) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(report)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => Ok(render_text(report, window)),
    }
}

/// Human-readable report: a header, then each participant with their blocking meetings.
fn render_text(report: &ConflictReport, window: &TimeInterval) -> String {
    if !report.has_conflicts {
        return "No conflicts.\n".to_string();
    }

    let mut out = format!(
        "Conflicts for {}/{}:\n",
        timestamp(window.start),
        timestamp(window.end)
    );
    for entry in &report.conflicts {
        out.push_str(&format!(
            "{} <{}> ({})\n",
            entry.participant_name, entry.participant_email, entry.participant_id
        ));
        for c in &entry.conflicting_commitments {
            out.push_str(&format!(
                "  - {} [{}] {}/{} overlaps {}\n",
                c.meeting_title,
                c.meeting_id,
                timestamp(c.interval.start),
                timestamp(c.interval.end),
                overlap_label(&c.interval, window)
            ));
        }
    }
    out
}

/// Exact overlap length: `45 s`, `30 min`, `1 min 30 s`.
fn overlap_label(interval: &TimeInterval, window: &TimeInterval) -> String {
    let seconds = interval
        .intersection(window)
        .map(|shared| (shared.end - shared.start).num_seconds())
        .unwrap_or(0);
    match (seconds / 60, seconds % 60) {
        (0, secs) => format!("{} s", secs),
        (mins, 0) => format!("{} min", mins),
        (mins, secs) => format!("{} min {} s", mins, secs),
    }
}

fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn interval(start: (u32, u32, u32), end: (u32, u32, u32)) -> TimeInterval {
        TimeInterval {
            start: Utc
                .with_ymd_and_hms(2026, 3, 2, start.0, start.1, start.2)
                .unwrap(),
            end: Utc.with_ymd_and_hms(2026, 3, 2, end.0, end.1, end.2).unwrap(),
        }
    }

    #[test]
    fn sub_minute_overlap_shown_in_seconds() {
        let window = interval((9, 0, 0), (10, 0, 0));
        let meeting = interval((9, 59, 15), (10, 30, 0));
        assert_eq!(overlap_label(&meeting, &window), "45 s");
    }

    #[test]
    fn whole_minute_overlap() {
        let window = interval((9, 0, 0), (10, 0, 0));
        let meeting = interval((9, 30, 0), (10, 30, 0));
        assert_eq!(overlap_label(&meeting, &window), "30 min");
    }

    #[test]
    fn partial_minute_remainder_kept() {
        let window = interval((9, 0, 0), (10, 0, 0));
        let meeting = interval((9, 58, 30), (10, 15, 0));
        assert_eq!(overlap_label(&meeting, &window), "1 min 30 s");
    }
}
