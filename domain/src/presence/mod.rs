//! Member presence and quorum computation.
//!
//! Presence records are written by the external roll-call collaborator and
//! are read-only input to the engine; quorum is a pure computation over the
//! current roster snapshot.

use crate::core::ids::MemberId;
use serde::{Deserialize, Serialize};

/// Presence flag for one member in one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    pub member_id: MemberId,
    pub present: bool,
    /// Justification text for an absence, when provided.
    pub justification: Option<String>,
}

impl PresenceRecord {
    pub fn present(member_id: impl Into<MemberId>) -> Self {
        Self {
            member_id: member_id.into(),
            present: true,
            justification: None,
        }
    }

    pub fn absent(member_id: impl Into<MemberId>, justification: Option<String>) -> Self {
        Self {
            member_id: member_id.into(),
            present: false,
            justification,
        }
    }
}

/// Counts and percentage of present members relative to the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuorumSummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub percent: f64,
}

impl QuorumSummary {
    pub fn from_records(records: &[PresenceRecord]) -> Self {
        let total = records.len();
        let present = records.iter().filter(|r| r.present).count();
        let absent = total - present;
        let percent = if total == 0 {
            0.0
        } else {
            present as f64 / total as f64 * 100.0
        };
        Self {
            total,
            present,
            absent,
            percent,
        }
    }

    /// Whether more than half the roster is present.
    pub fn has_majority(&self) -> bool {
        self.present > self.total / 2
    }
}
