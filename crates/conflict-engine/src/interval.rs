//! Half-open time intervals and the overlap predicate.
//!
//! Every interval is `[start, end)`: the start instant is included, the end instant is
//! not. Two meetings that merely touch (one ends exactly when the other starts) do NOT
//! overlap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConflictError, Result};

/// A half-open `[start, end)` time range in UTC.
///
/// The fields are public so that deserialized or hand-built values can flow through
/// without ceremony. Anything that depends on `end > start` must call
/// [`TimeInterval::validate`] (the engine does so for the query window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// Build a validated interval.
    ///
    /// # Errors
    /// Returns [`ConflictError::InvalidInterval`] when `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let interval = Self { start, end };
        interval.validate()?;
        Ok(interval)
    }

    /// Check the `end > start` invariant.
    ///
    /// Zero-duration and inverted intervals are rejected rather than treated as empty.
    pub fn validate(&self) -> Result<()> {
        if self.end <= self.start {
            return Err(ConflictError::InvalidInterval {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Whether two half-open intervals intersect.
    ///
    /// `[a0, a1)` and `[b0, b1)` overlap iff `a0 < b1 && b0 < a1`. Starting inside,
    /// ending inside, and full containment are all this one inequality.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The shared portion of two intervals, if any.
    pub fn intersection(&self, other: &TimeInterval) -> Option<TimeInterval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(TimeInterval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Overlap length in whole minutes, `0` when the intervals do not overlap.
    pub fn overlap_minutes(&self, other: &TimeInterval) -> i64 {
        self.intersection(other)
            .map(|shared| shared.duration_minutes())
            .unwrap_or(0)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
    }

    #[test]
    fn new_rejects_zero_duration() {
        let err = TimeInterval::new(at(9, 0), at(9, 0)).unwrap_err();
        assert_eq!(
            err,
            ConflictError::InvalidInterval {
                start: at(9, 0),
                end: at(9, 0)
            }
        );
    }

    #[test]
    fn new_rejects_inverted() {
        assert!(TimeInterval::new(at(10, 0), at(9, 0)).is_err());
    }

    #[test]
    fn intersection_of_partial_overlap() {
        let a = TimeInterval::new(at(9, 0), at(10, 0)).unwrap();
        let b = TimeInterval::new(at(9, 30), at(10, 30)).unwrap();
        let shared = a.intersection(&b).unwrap();
        assert_eq!(shared.start, at(9, 30));
        assert_eq!(shared.end, at(10, 0));
        assert_eq!(a.overlap_minutes(&b), 30);
    }

    #[test]
    fn touching_intervals_have_no_intersection() {
        let a = TimeInterval::new(at(9, 0), at(9, 30)).unwrap();
        let b = TimeInterval::new(at(9, 30), at(10, 0)).unwrap();
        assert!(a.intersection(&b).is_none());
        assert_eq!(a.overlap_minutes(&b), 0);
    }
}
