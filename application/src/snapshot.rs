//! Immutable read-side views of a session.
//!
//! A snapshot is captured once per command/query from a consistent copy of
//! the session; displays render from it without ever touching the writer.

use chrono::{DateTime, Utc};
use plenum_domain::{
    ActionKind, AgendaItem, ItemAction, ItemId, ItemStatus, MemberId, PresenceRecord,
    PropositionId, QuorumSummary, Section, Session, SessionId, SessionKind, SessionStatus, Tally,
    VoteRecord,
};
use serde::{Deserialize, Serialize};

/// Full state of one session at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub number: u32,
    pub kind: SessionKind,
    pub scheduled_for: DateTime<Utc>,
    pub status: SessionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub accumulated_secs: u64,
    /// Live elapsed seconds as of `taken_at`.
    pub elapsed_secs: u64,
    pub quorum: QuorumSummary,
    pub current_item: Option<ItemId>,
    pub items: Vec<ItemSnapshot>,
    pub presence: Vec<PresenceRecord>,
    pub taken_at: DateTime<Utc>,
    pub version: u64,
}

/// One agenda item within a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: ItemId,
    pub section: Section,
    pub seq: u32,
    pub title: String,
    pub description: Option<String>,
    pub proposition: Option<PropositionId>,
    pub action_kind: ActionKind,
    pub status: ItemStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub accumulated_secs: u64,
    pub elapsed_secs: u64,
    pub finished_at: Option<DateTime<Utc>>,
    pub review_requested_by: Option<MemberId>,
    pub withdrawal_reason: Option<String>,
    pub votes: Vec<VoteRecord>,
    pub tally: Tally,
    /// What an operator may do with this item right now.
    pub legal_actions: Vec<ItemAction>,
}

impl SessionSnapshot {
    pub fn capture(session: &Session, now: DateTime<Utc>) -> Self {
        Self {
            id: session.id().clone(),
            number: session.number(),
            kind: session.kind(),
            scheduled_for: session.scheduled_for(),
            status: session.status(),
            started_at: session.started_at(),
            accumulated_secs: session.accumulated_secs(),
            elapsed_secs: session.elapsed(now),
            quorum: session.quorum(),
            current_item: session.current_item().map(|i| i.id().clone()),
            items: session
                .agenda()
                .ordered()
                .into_iter()
                .map(|item| ItemSnapshot::capture(item, now))
                .collect(),
            presence: session.presence().to_vec(),
            taken_at: now,
            version: session.version(),
        }
    }

    pub fn item(&self, id: &ItemId) -> Option<&ItemSnapshot> {
        self.items.iter().find(|i| &i.id == id)
    }
}

impl ItemSnapshot {
    pub fn capture(item: &AgendaItem, now: DateTime<Utc>) -> Self {
        Self {
            id: item.id().clone(),
            section: item.section(),
            seq: item.seq(),
            title: item.title().to_string(),
            description: item.description().map(str::to_string),
            proposition: item.proposition().cloned(),
            action_kind: item.action_kind(),
            status: item.status(),
            started_at: item.started_at(),
            accumulated_secs: item.accumulated_secs(),
            elapsed_secs: item.elapsed(now),
            finished_at: item.finished_at(),
            review_requested_by: item.review_requested_by().cloned(),
            withdrawal_reason: item.withdrawal_reason().map(str::to_string),
            votes: item.ballot().records().to_vec(),
            tally: item.tally(),
            legal_actions: item.legal_actions(),
        }
    }
}
