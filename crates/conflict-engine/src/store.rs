//! The meeting-store contract the conflict checker reads from, plus an in-memory
//! snapshot implementation.
//!
//! A store's range query may over-fetch but must never under-fetch: the engine is the
//! sole judge of exact overlap. Implementations backed by a live database should answer
//! both lookups from one consistent snapshot (e.g. inside the transaction that will
//! perform the write being checked).

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::interval::TimeInterval;
use crate::model::{Commitment, MeetingId, Participant, ParticipantId};

/// Source of participants and their existing commitments.
pub trait MeetingStore {
    /// Resolve ids to participants, preserving request order. Unknown ids are omitted.
    fn participants(&self, ids: &[ParticipantId]) -> Result<Vec<Participant>, StoreError>;

    /// Every commitment held by `ids` that could overlap `window`.
    fn commitments(
        &self,
        ids: &[ParticipantId],
        window: &TimeInterval,
    ) -> Result<Vec<Commitment>, StoreError>;
}

impl<S: MeetingStore + ?Sized> MeetingStore for &S {
    fn participants(&self, ids: &[ParticipantId]) -> Result<Vec<Participant>, StoreError> {
        (**self).participants(ids)
    }

    fn commitments(
        &self,
        ids: &[ParticipantId],
        window: &TimeInterval,
    ) -> Result<Vec<Commitment>, StoreError> {
        (**self).commitments(ids, window)
    }
}

/// A stored meeting and the participants attending it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub participant_ids: Vec<ParticipantId>,
}

impl Meeting {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// On-disk shape of a [`SnapshotStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}

/// Immutable in-memory store loaded once from a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    participants: HashMap<ParticipantId, Participant>,
    meetings: Vec<Meeting>,
    /// Participant id → indices into `meetings`.
    attendance: HashMap<ParticipantId, Vec<usize>>,
}

impl SnapshotStore {
    /// Build a store, rejecting malformed meetings.
    ///
    /// # Errors
    /// - [`StoreError::InvalidMeeting`] when a meeting's end is not after its start.
    /// - [`StoreError::DuplicateMeeting`] when two meetings share an id.
    pub fn new(snapshot: Snapshot) -> Result<Self, StoreError> {
        let mut attendance: HashMap<ParticipantId, Vec<usize>> = HashMap::new();
        let mut ids = HashSet::new();
        for (index, meeting) in snapshot.meetings.iter().enumerate() {
            if !ids.insert(&meeting.id) {
                return Err(StoreError::DuplicateMeeting {
                    meeting_id: meeting.id.clone(),
                });
            }
            meeting
                .interval()
                .validate()
                .map_err(|source| StoreError::InvalidMeeting {
                    meeting_id: meeting.id.clone(),
                    source,
                })?;
            for participant_id in &meeting.participant_ids {
                let indices = attendance.entry(participant_id.clone()).or_default();
                // One attendance row per (meeting, participant).
                if indices.last() != Some(&index) {
                    indices.push(index);
                }
            }
        }

        let participants = snapshot
            .participants
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(Self {
            participants,
            meetings: snapshot.meetings,
            attendance,
        })
    }

    /// Parse a JSON snapshot document.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::new(snapshot)
    }

    pub fn meeting(&self, id: &MeetingId) -> Option<&Meeting> {
        self.meetings.iter().find(|m| &m.id == id)
    }

    pub fn meeting_count(&self) -> usize {
        self.meetings.len()
    }
}

impl MeetingStore for SnapshotStore {
    fn participants(&self, ids: &[ParticipantId]) -> Result<Vec<Participant>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.participants.get(id).cloned())
            .collect())
    }

    fn commitments(
        &self,
        ids: &[ParticipantId],
        window: &TimeInterval,
    ) -> Result<Vec<Commitment>, StoreError> {
        let mut commitments = Vec::new();
        for (position, id) in ids.iter().enumerate() {
            if ids[..position].contains(id) {
                continue;
            }
            let Some(indices) = self.attendance.get(id) else {
                continue;
            };
            for &index in indices {
                let meeting = &self.meetings[index];
                // Inclusive bounds: touching meetings are fetched and left to the engine.
                if meeting.start_time <= window.end && meeting.end_time >= window.start {
                    commitments.push(Commitment {
                        participant_id: id.clone(),
                        meeting_id: meeting.id.clone(),
                        meeting_title: meeting.title.clone(),
                        interval: meeting.interval(),
                    });
                }
            }
        }
        Ok(commitments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
    }

    fn meeting(id: &str, start: DateTime<Utc>, end: DateTime<Utc>, who: &[&str]) -> Meeting {
        Meeting {
            id: MeetingId::from(id),
            title: format!("Meeting {id}"),
            description: None,
            location: None,
            start_time: start,
            end_time: end,
            participant_ids: who.iter().map(|&p| ParticipantId::from(p)).collect(),
        }
    }

    #[test]
    fn duplicate_attendee_rows_are_indexed_once() {
        let store = SnapshotStore::new(Snapshot {
            participants: vec![Participant::new("p1", "Ada", "ada@example.com")],
            meetings: vec![meeting("m1", at(9, 0), at(10, 0), &["p1", "p1"])],
        })
        .unwrap();

        let window = TimeInterval::new(at(9, 0), at(10, 0)).unwrap();
        let found = store
            .commitments(&[ParticipantId::from("p1")], &window)
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn range_query_over_fetches_touching_meetings() {
        let store = SnapshotStore::new(Snapshot {
            participants: vec![Participant::new("p1", "Ada", "ada@example.com")],
            meetings: vec![
                meeting("before", at(8, 0), at(9, 0), &["p1"]),
                meeting("after", at(10, 0), at(11, 0), &["p1"]),
                meeting("far", at(15, 0), at(16, 0), &["p1"]),
            ],
        })
        .unwrap();

        let window = TimeInterval::new(at(9, 0), at(10, 0)).unwrap();
        let ids: Vec<_> = store
            .commitments(&[ParticipantId::from("p1")], &window)
            .unwrap()
            .into_iter()
            .map(|c| c.meeting_id)
            .collect();
        assert_eq!(ids, vec![MeetingId::from("before"), MeetingId::from("after")]);
    }

    #[test]
    fn repeated_request_ids_fetch_once() {
        let store = SnapshotStore::new(Snapshot {
            participants: vec![Participant::new("p1", "Ada", "ada@example.com")],
            meetings: vec![meeting("m1", at(9, 0), at(10, 0), &["p1"])],
        })
        .unwrap();

        let window = TimeInterval::new(at(9, 0), at(10, 0)).unwrap();
        let p1 = ParticipantId::from("p1");
        let found = store.commitments(&[p1.clone(), p1], &window).unwrap();
        assert_eq!(found.len(), 1);
    }
}
