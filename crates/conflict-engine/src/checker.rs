//! Store-backed conflict checking: the request-handler half of the round trip.
//!
//! [`ConflictChecker`] validates the requested window, resolves participants and their
//! candidate commitments through a [`MeetingStore`], and hands both to
//! [`detect`](crate::conflict::detect).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::conflict::detect;
use crate::error::CheckError;
use crate::interval::TimeInterval;
use crate::model::{ConflictQuery, ConflictReport, MeetingId, ParticipantId};
use crate::store::MeetingStore;

/// A conflict check as a caller submits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictCheckRequest {
    pub participant_ids: Vec<ParticipantId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_meeting_id: Option<MeetingId>,
}

/// Runs conflict checks against a meeting store.
#[derive(Debug, Clone)]
pub struct ConflictChecker<S> {
    store: S,
}

impl<S: MeetingStore> ConflictChecker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check `request` against the store's current commitments.
    ///
    /// Participant ids the store does not know are skipped. A request whose ids are
    /// all unknown (or empty) yields the empty report.
    ///
    /// # Errors
    /// - [`CheckError::Conflict`] when `end_time <= start_time`; the store is not consulted.
    /// - [`CheckError::Store`] when either store lookup fails.
    pub fn check(&self, request: &ConflictCheckRequest) -> Result<ConflictReport, CheckError> {
        let interval = TimeInterval::new(request.start_time, request.end_time)?;

        let participants = self.store.participants(&request.participant_ids)?;
        for id in &request.participant_ids {
            if !participants.iter().any(|p| &p.id == id) {
                debug!(participant_id = %id, "skipping unknown participant");
            }
        }

        let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id.clone()).collect();
        let commitments = if ids.is_empty() {
            Vec::new()
        } else {
            self.store.commitments(&ids, &interval)?
        };

        let query = ConflictQuery {
            participants,
            interval,
            exclude_meeting_id: request.exclude_meeting_id.clone(),
        };
        let report = detect(&query, &commitments)?;

        info!(
            participants = ids.len(),
            candidates = commitments.len(),
            conflicts = report.conflicts.len(),
            blocking = report.commitment_count(),
            "conflict check complete"
        );

        Ok(report)
    }
}
