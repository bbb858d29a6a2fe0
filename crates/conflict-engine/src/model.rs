//! Value types passed into and out of the conflict engine.
//!
//! Everything here is plain data: the engine never traverses a persistence graph, it
//! receives [`Commitment`] values already tagged with their owning participant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interval::TimeInterval;

/// Opaque participant identifier. Compared for equality and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

/// Opaque meeting identifier. Its ordering is only used to break ties deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(String);

macro_rules! opaque_id {
    ($ty:ident) => {
        impl $ty {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(ParticipantId);
opaque_id!(MeetingId);

/// A person who can hold meetings. `name` and `email` are for reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub email: String,
}

impl Participant {
    pub fn new(
        id: impl Into<ParticipantId>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// One existing meeting held by one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub participant_id: ParticipantId,
    pub meeting_id: MeetingId,
    pub meeting_title: String,
    pub interval: TimeInterval,
}

/// A proposed time window and the participants to test it against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictQuery {
    /// Participants in request order. Duplicate ids count once, at their first position.
    pub participants: Vec<Participant>,
    pub interval: TimeInterval,
    /// Ignore this meeting's stored rows, so an edit never conflicts with itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_meeting_id: Option<MeetingId>,
}

impl ConflictQuery {
    pub fn new(participants: Vec<Participant>, interval: TimeInterval) -> Self {
        Self {
            participants,
            interval,
            exclude_meeting_id: None,
        }
    }

    /// Exclude a meeting from the check (update-in-place).
    pub fn excluding(mut self, meeting_id: impl Into<MeetingId>) -> Self {
        self.exclude_meeting_id = Some(meeting_id.into());
        self
    }

    pub fn participant_ids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.participants.iter().map(|p| &p.id)
    }
}

/// Every commitment blocking one participant, ordered by start then meeting id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantConflict {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub participant_email: String,
    /// Never empty.
    pub conflicting_commitments: Vec<Commitment>,
}

/// The engine's answer for one [`ConflictQuery`].
///
/// `has_conflicts` is true iff `conflicts` is non-empty. Build reports through
/// [`ConflictReport::new`] to keep the two in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub has_conflicts: bool,
    pub conflicts: Vec<ParticipantConflict>,
}

impl ConflictReport {
    pub fn new(conflicts: Vec<ParticipantConflict>) -> Self {
        Self {
            has_conflicts: !conflicts.is_empty(),
            conflicts,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Look up the entry for one participant.
    pub fn for_participant(&self, id: &ParticipantId) -> Option<&ParticipantConflict> {
        self.conflicts.iter().find(|c| &c.participant_id == id)
    }

    /// Total number of (participant, commitment) pairs in the report.
    pub fn commitment_count(&self) -> usize {
        self.conflicts
            .iter()
            .map(|c| c.conflicting_commitments.len())
            .sum()
    }
}
