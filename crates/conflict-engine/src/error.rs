//! Error types for conflict-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::MeetingId;

/// The single failure the engine itself can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    /// The interval's end is not strictly after its start.
    #[error("Invalid interval: end {end} must be after start {start}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Failures raised by a [`MeetingStore`](crate::store::MeetingStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The snapshot document could not be parsed.
    #[error("Snapshot parse error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A stored meeting violates the `end > start` invariant.
    #[error("Meeting {meeting_id} has an invalid time range: {source}")]
    InvalidMeeting {
        meeting_id: MeetingId,
        source: ConflictError,
    },

    /// Two stored meetings share an id.
    #[error("Duplicate meeting id: {meeting_id}")]
    DuplicateMeeting { meeting_id: MeetingId },

    /// The backing store could not answer a lookup.
    #[error("Store lookup failed: {0}")]
    Lookup(String),
}

/// Errors surfaced by [`ConflictChecker::check`](crate::checker::ConflictChecker::check).
#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ConflictError>;
