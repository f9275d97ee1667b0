//! Agenda item entity and its guarded transitions.
//!
//! Every transition checks the table in [`crate::agenda::transitions`]
//! before touching any field, so a refused transition leaves the item
//! exactly as it was. "Paused" is not a separate status: an item in
//! discussion with a stopped timer is paused.

use super::transitions::{self, ItemAction};
use super::{ActionKind, ItemOutcome, ItemStatus, Section};
use crate::core::error::EngineError;
use crate::core::ids::{ItemId, MemberId, PropositionId};
use crate::timing::Accumulator;
use crate::voting::{Ballot, Tally, VoteChoice};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One matter scheduled for discussion or vote within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaItem {
    id: ItemId,
    pub(crate) section: Section,
    /// 1-based, contiguous within the section. Maintained by the agenda.
    pub(crate) seq: u32,
    title: String,
    description: Option<String>,
    proposition: Option<PropositionId>,
    action_kind: ActionKind,
    status: ItemStatus,
    timer: Accumulator,
    finished_at: Option<DateTime<Utc>>,
    review_requested_by: Option<MemberId>,
    withdrawal_reason: Option<String>,
    ballot: Ballot,
}

impl AgendaItem {
    pub fn new(
        id: impl Into<ItemId>,
        section: Section,
        seq: u32,
        title: impl Into<String>,
        action_kind: ActionKind,
    ) -> Self {
        Self {
            id: id.into(),
            section,
            seq,
            title: title.into(),
            description: None,
            proposition: None,
            action_kind,
            status: ItemStatus::Pending,
            timer: Accumulator::new(),
            finished_at: None,
            review_requested_by: None,
            withdrawal_reason: None,
            ballot: Ballot::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_proposition(mut self, proposition: impl Into<PropositionId>) -> Self {
        self.proposition = Some(proposition.into());
        self
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn seq(&self) -> u32 {
        self.seq
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn proposition(&self) -> Option<&PropositionId> {
        self.proposition.as_ref()
    }

    pub fn action_kind(&self) -> ActionKind {
        self.action_kind
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.timer.started_at()
    }

    pub fn accumulated_secs(&self) -> u64 {
        self.timer.accumulated_secs()
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn review_requested_by(&self) -> Option<&MemberId> {
        self.review_requested_by.as_ref()
    }

    pub fn withdrawal_reason(&self) -> Option<&str> {
        self.withdrawal_reason.as_deref()
    }

    pub fn ballot(&self) -> &Ballot {
        &self.ballot
    }

    /// Elapsed deliberation seconds as of `now`.
    pub fn elapsed(&self, now: DateTime<Utc>) -> u64 {
        self.timer.elapsed(now)
    }

    /// Whether the deliberation timer is currently counting.
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn tally(&self) -> Tally {
        self.ballot.tally()
    }

    /// Actions currently legal on this item. Pause and resume are shown
    /// only when they would change the timer; the guards still accept the
    /// full table, where the redundant call is a timer no-op.
    pub fn legal_actions(&self) -> Vec<ItemAction> {
        transitions::legal_actions(self.status, self.action_kind)
            .iter()
            .copied()
            .filter(|action| match action {
                ItemAction::Pause => self.timer.is_running(),
                ItemAction::Resume => !self.timer.is_running(),
                _ => true,
            })
            .collect()
    }

    fn guard(&self, action: ItemAction) -> Result<(), EngineError> {
        if transitions::is_legal(self.status, self.action_kind, action) {
            Ok(())
        } else {
            Err(EngineError::illegal(action, self.status))
        }
    }

    /// Pending or Postponed -> InDiscussion; the deliberation timer starts.
    ///
    /// The single-active-item check lives in the agenda, which serializes
    /// all starts for a session.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.guard(ItemAction::Start)?;
        self.status = ItemStatus::InDiscussion;
        self.finished_at = None;
        self.timer.resume(now);
        Ok(())
    }

    /// Pause the deliberation timer; status stays InDiscussion.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.guard(ItemAction::Pause)?;
        self.timer.pause(now);
        Ok(())
    }

    /// Restart a paused deliberation timer.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.guard(ItemAction::Resume)?;
        self.timer.resume(now);
        Ok(())
    }

    /// InDiscussion -> InVote. Only legal for VOTE items. Clears any stale
    /// records from a prior vote on the same item.
    pub fn open_vote(&mut self) -> Result<(), EngineError> {
        self.guard(ItemAction::OpenVote)?;
        self.status = ItemStatus::InVote;
        self.ballot.clear();
        Ok(())
    }

    /// Record one member's vote. Idempotent per member: returns `true`
    /// when this replaced an earlier vote by the same member.
    pub fn cast_vote(
        &mut self,
        member_id: MemberId,
        choice: VoteChoice,
    ) -> Result<bool, EngineError> {
        self.guard(ItemAction::CastVote)?;
        Ok(self.ballot.cast(member_id, choice))
    }

    /// Hand the matter to `member` for further study ("vista"); the timer
    /// pauses until the review ends.
    pub fn request_review(
        &mut self,
        member_id: MemberId,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        self.guard(ItemAction::RequestReview)?;
        self.status = ItemStatus::UnderReview;
        self.review_requested_by = Some(member_id);
        self.timer.pause(now);
        Ok(())
    }

    /// UnderReview -> InDiscussion; the timer resumes.
    pub fn resume_from_review(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.guard(ItemAction::ResumeFromReview)?;
        self.status = ItemStatus::InDiscussion;
        self.timer.resume(now);
        Ok(())
    }

    /// Close the item with the supplied outcome. A READING item finished
    /// without an explicit outcome defaults to Concluded; every other kind
    /// requires one.
    pub fn finish(
        &mut self,
        outcome: Option<ItemOutcome>,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        self.guard(ItemAction::Finish)?;
        let outcome = match (outcome, self.action_kind) {
            (Some(o), _) => o,
            (None, ActionKind::Reading) => ItemOutcome::Concluded,
            (None, kind) => {
                return Err(EngineError::InvariantViolation(format!(
                    "finishing a {kind} item requires an explicit outcome"
                )));
            }
        };
        self.status = outcome.status();
        self.timer.stop(now);
        self.finished_at = Some(now);
        Ok(())
    }

    /// Withdraw the item with a reason. Legal from any non-terminal status.
    ///
    /// Returns the linked proposition id, if any, so the caller can notify
    /// the proposition store that it is free for a future session.
    pub fn withdraw(
        &mut self,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<PropositionId>, EngineError> {
        self.guard(ItemAction::Withdraw)?;
        self.status = ItemStatus::Withdrawn;
        self.withdrawal_reason = Some(reason.into());
        self.timer.stop(now);
        self.finished_at = Some(now);
        Ok(self.proposition.clone())
    }
}
