//! # conflict-engine
//!
//! Deterministic scheduling-conflict detection for meeting schedulers.
//!
//! Given a proposed time window and a set of participants, the engine reports which
//! existing commitments overlap, for whom, in an order fully determined by the input.
//! Intervals are half-open `[start, end)`, so back-to-back meetings never conflict.
//!
//! ## Modules
//!
//! - [`interval`] — `TimeInterval` and the single overlap predicate
//! - [`model`] — participants, commitments, queries and reports
//! - [`conflict`] — the pure `detect` engine
//! - [`store`] — the `MeetingStore` contract and an in-memory `SnapshotStore`
//! - [`checker`] — `ConflictChecker`, which wires a store to the engine
//! - [`error`] — Error types

pub mod checker;
pub mod conflict;
pub mod error;
pub mod interval;
pub mod model;
pub mod store;

pub use checker::{ConflictCheckRequest, ConflictChecker};
pub use conflict::detect;
pub use error::{CheckError, ConflictError, StoreError};
pub use interval::TimeInterval;
pub use model::{
    Commitment, ConflictQuery, ConflictReport, MeetingId, Participant, ParticipantConflict,
    ParticipantId,
};
pub use store::{Meeting, MeetingStore, Snapshot, SnapshotStore};
