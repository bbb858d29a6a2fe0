//! Detect which existing commitments overlap a proposed meeting window.
//!
//! The engine is a pure function over in-memory values: no store access, no shared
//! state. Adjacent meetings (where one ends exactly when another starts) are NOT
//! conflicts.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::error::Result;
use crate::model::{
    Commitment, ConflictQuery, ConflictReport, ParticipantConflict, ParticipantId,
};

/// Report, per participant, every commitment that overlaps `query.interval`.
///
/// `commitments` may over-approximate (a range query that over-fetches is fine), and
/// may contain rows for participants outside the query; those are ignored.
///
/// Output ordering is fully determined by the inputs:
/// - entries follow the participants' first appearance in `query.participants`;
/// - each entry's commitments are ordered by start, ties broken by meeting id.
///
/// A meeting listed more than once for the same participant is reported once, using
/// its earliest-starting row.
///
/// # Errors
/// Returns [`ConflictError::InvalidInterval`](crate::ConflictError::InvalidInterval)
/// when the query window is zero-length or inverted. This is checked before anything
/// else, so an invalid window never yields a "no conflict" report.
pub fn detect(query: &ConflictQuery, commitments: &[Commitment]) -> Result<ConflictReport> {
    query.interval.validate()?;

    if query.participants.is_empty() {
        return Ok(ConflictReport::empty());
    }

    trace!(
        participants = query.participants.len(),
        commitments = commitments.len(),
        "detecting conflicts"
    );

    let mut overlapping: HashMap<&ParticipantId, Vec<&Commitment>> = HashMap::new();
    for commitment in commitments {
        // The excluded meeting must be dropped before the overlap test.
        if query.exclude_meeting_id.as_ref() == Some(&commitment.meeting_id) {
            continue;
        }
        if commitment.interval.overlaps(&query.interval) {
            overlapping
                .entry(&commitment.participant_id)
                .or_default()
                .push(commitment);
        }
    }

    let mut conflicts = Vec::new();
    for participant in &query.participants {
        // Removing the bucket also collapses repeated participant ids.
        let Some(mut blocking) = overlapping.remove(&participant.id) else {
            continue;
        };

        blocking.sort_by(|a, b| {
            (a.interval.start, &a.meeting_id, a.interval.end).cmp(&(
                b.interval.start,
                &b.meeting_id,
                b.interval.end,
            ))
        });
        // Rows for the same meeting need not be adjacent; keep the earliest one.
        let mut seen = HashSet::new();
        blocking.retain(|&c| seen.insert(&c.meeting_id));

        conflicts.push(ParticipantConflict {
            participant_id: participant.id.clone(),
            participant_name: participant.name.clone(),
            participant_email: participant.email.clone(),
            conflicting_commitments: blocking.into_iter().cloned().collect(),
        });
    }

    Ok(ConflictReport::new(conflicts))
}
