//! Session entity (aggregate root).
//!
//! The session owns its agenda and presence records and is the only entry
//! point for item-level commands, so the session-status guard ("items move
//! only while the session is in progress or suspended") and the
//! single-active-item invariant are both enforced on one serialized path.
//!
//! The session clock and each item's deliberation clock are independent
//! accumulators: suspending the session does not touch the current item's
//! timer.

use super::{SessionKind, SessionStatus};
use crate::agenda::item::AgendaItem;
use crate::agenda::orchestrator::{Agenda, MoveDirection, NewItem};
use crate::agenda::template::{AgendaTemplate, TemplateMode};
use crate::agenda::{ItemOutcome, Section};
use crate::core::error::EngineError;
use crate::core::ids::{ItemId, MemberId, PropositionId, SessionId};
use crate::presence::{PresenceRecord, QuorumSummary};
use crate::timing::Accumulator;
use crate::voting::{Tally, VoteChoice};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One plenary sitting of the legislative body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    number: u32,
    kind: SessionKind,
    scheduled_for: DateTime<Utc>,
    status: SessionStatus,
    timer: Accumulator,
    agenda: Agenda,
    presence: Vec<PresenceRecord>,
    item_counter: u64,
    /// Bumped by the repository on every successful save; backs the
    /// optimistic concurrency check.
    version: u64,
}

impl Session {
    pub fn new(
        id: impl Into<SessionId>,
        number: u32,
        kind: SessionKind,
        scheduled_for: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            number,
            kind,
            scheduled_for,
            status: SessionStatus::Scheduled,
            timer: Accumulator::new(),
            agenda: Agenda::new(),
            presence: Vec::new(),
            item_counter: 0,
            version: 0,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn scheduled_for(&self) -> DateTime<Utc> {
        self.scheduled_for
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.timer.started_at()
    }

    pub fn accumulated_secs(&self) -> u64 {
        self.timer.accumulated_secs()
    }

    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    pub fn presence(&self) -> &[PresenceRecord] {
        &self.presence
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Elapsed session seconds as of `now`.
    pub fn elapsed(&self, now: DateTime<Utc>) -> u64 {
        self.timer.elapsed(now)
    }

    pub fn quorum(&self) -> QuorumSummary {
        QuorumSummary::from_records(&self.presence)
    }

    /// The unique active agenda item, if any.
    pub fn current_item(&self) -> Option<&AgendaItem> {
        self.agenda.current_item()
    }

    // --- session lifecycle -------------------------------------------------

    fn guard(&self, action: &str, allowed: &[SessionStatus]) -> Result<(), EngineError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(EngineError::illegal(action, self.status))
        }
    }

    /// Scheduled -> InProgress; the session clock starts.
    pub fn begin(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.guard("begin", &[SessionStatus::Scheduled])?;
        self.status = SessionStatus::InProgress;
        self.timer.resume(now);
        Ok(())
    }

    /// InProgress -> Suspended; elapsed time accumulates, `started_at`
    /// clears. The current item's own timer is untouched.
    pub fn suspend(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.guard("suspend", &[SessionStatus::InProgress])?;
        self.status = SessionStatus::Suspended;
        self.timer.pause(now);
        Ok(())
    }

    /// Suspended -> InProgress; the clock resumes.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.guard("resume", &[SessionStatus::Suspended])?;
        self.status = SessionStatus::InProgress;
        self.timer.resume(now);
        Ok(())
    }

    /// InProgress or Suspended -> Concluded, with final accumulation.
    ///
    /// An item still active is deliberately left as-is: the operator must
    /// resolve it explicitly, the engine does not guess an outcome.
    pub fn conclude(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.guard("conclude", &[SessionStatus::InProgress, SessionStatus::Suspended])?;
        self.status = SessionStatus::Concluded;
        self.timer.pause(now);
        Ok(())
    }

    /// Scheduled, InProgress or Suspended -> Cancelled.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.guard(
            "cancel",
            &[
                SessionStatus::Scheduled,
                SessionStatus::InProgress,
                SessionStatus::Suspended,
            ],
        )?;
        self.status = SessionStatus::Cancelled;
        self.timer.pause(now);
        Ok(())
    }

    /// Administrative status overwrite, bypassing the guarded transitions.
    ///
    /// Still preserves the accumulation invariant: leaving InProgress folds
    /// the live interval, entering it restarts the clock, so `started_at`
    /// stays non-null iff the session is in progress.
    pub fn force_status(&mut self, status: SessionStatus, now: DateTime<Utc>) {
        if status == SessionStatus::InProgress {
            self.timer.resume(now);
        } else {
            self.timer.pause(now);
        }
        self.status = status;
    }

    // --- agenda commands ---------------------------------------------------

    fn ensure_live(&self, action: &str) -> Result<(), EngineError> {
        if self.status.is_live() {
            Ok(())
        } else {
            Err(EngineError::illegal(action, self.status))
        }
    }

    fn allocate_item_id(&mut self) -> ItemId {
        self.item_counter += 1;
        ItemId::new(format!("{}-i{}", self.id, self.item_counter))
    }

    fn require_item_mut(&mut self, id: &ItemId) -> Result<&mut AgendaItem, EngineError> {
        self.agenda
            .get_mut(id)
            .ok_or_else(|| EngineError::not_found(format!("agenda item {id}")))
    }

    /// Manually insert a pending item at the end of its section.
    pub fn add_item(&mut self, section: Section, new: NewItem) -> Result<ItemId, EngineError> {
        self.guard(
            "add item",
            &[
                SessionStatus::Scheduled,
                SessionStatus::InProgress,
                SessionStatus::Suspended,
            ],
        )?;
        let id = self.allocate_item_id();
        self.agenda.add_item(id.clone(), section, new);
        Ok(id)
    }

    /// Accept an externally suggested item: single-item insertion at the
    /// end of its target section.
    pub fn accept_suggestion(
        &mut self,
        section: Section,
        new: NewItem,
    ) -> Result<ItemId, EngineError> {
        self.add_item(section, new)
    }

    pub fn start_item(&mut self, id: &ItemId, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.ensure_live("start item")?;
        self.agenda.start(id, now)
    }

    pub fn pause_item(&mut self, id: &ItemId, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.ensure_live("pause item")?;
        self.require_item_mut(id)?.pause(now)
    }

    pub fn resume_item(&mut self, id: &ItemId, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.ensure_live("resume item")?;
        self.require_item_mut(id)?.resume(now)
    }

    pub fn open_vote(&mut self, id: &ItemId) -> Result<(), EngineError> {
        self.ensure_live("open vote")?;
        self.require_item_mut(id)?.open_vote()
    }

    pub fn request_review(
        &mut self,
        id: &ItemId,
        member_id: MemberId,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        self.ensure_live("request review")?;
        self.require_item_mut(id)?.request_review(member_id, now)
    }

    pub fn resume_from_review(&mut self, id: &ItemId, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.ensure_live("resume from review")?;
        self.require_item_mut(id)?.resume_from_review(now)
    }

    pub fn finish_item(
        &mut self,
        id: &ItemId,
        outcome: Option<ItemOutcome>,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        self.ensure_live("finish item")?;
        self.require_item_mut(id)?.finish(outcome, now)
    }

    /// Withdraw an item; returns the linked proposition id so the caller
    /// can release it for future scheduling.
    pub fn withdraw_item(
        &mut self,
        id: &ItemId,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<PropositionId>, EngineError> {
        self.ensure_live("withdraw item")?;
        self.require_item_mut(id)?.withdraw(reason, now)
    }

    pub fn cast_vote(
        &mut self,
        id: &ItemId,
        member_id: MemberId,
        choice: VoteChoice,
    ) -> Result<bool, EngineError> {
        self.ensure_live("cast vote")?;
        self.require_item_mut(id)?.cast_vote(member_id, choice)
    }

    pub fn tally(&self, id: &ItemId) -> Result<Tally, EngineError> {
        self.agenda
            .get(id)
            .map(|item| item.tally())
            .ok_or_else(|| EngineError::not_found(format!("agenda item {id}")))
    }

    pub fn elapsed_item(&self, id: &ItemId, now: DateTime<Utc>) -> Result<u64, EngineError> {
        self.agenda
            .get(id)
            .map(|item| item.elapsed(now))
            .ok_or_else(|| EngineError::not_found(format!("agenda item {id}")))
    }

    pub fn move_item(&mut self, id: &ItemId, direction: MoveDirection) -> Result<(), EngineError> {
        self.guard(
            "move item",
            &[
                SessionStatus::Scheduled,
                SessionStatus::InProgress,
                SessionStatus::Suspended,
            ],
        )?;
        self.agenda.move_item(id, direction)
    }

    pub fn move_item_to(
        &mut self,
        id: &ItemId,
        target_section: Section,
        target_index: u32,
    ) -> Result<(), EngineError> {
        self.guard(
            "move item",
            &[
                SessionStatus::Scheduled,
                SessionStatus::InProgress,
                SessionStatus::Suspended,
            ],
        )?;
        self.agenda.move_item_to(id, target_section, target_index)
    }

    /// Apply a template. Rejected on anything but a scheduled session to
    /// avoid disrupting an active proceeding.
    pub fn apply_template(
        &mut self,
        template: &AgendaTemplate,
        mode: TemplateMode,
    ) -> Result<Vec<ItemId>, EngineError> {
        self.guard("apply template", &[SessionStatus::Scheduled])?;
        let realized: Vec<_> = template
            .items
            .iter()
            .map(|item| (self.allocate_item_id(), item.clone()))
            .collect();
        let ids = realized.iter().map(|(id, _)| id.clone()).collect();
        self.agenda.apply_template(realized, mode);
        Ok(ids)
    }

    /// Replace or insert this member's presence record. Input from the
    /// external roll-call collaborator.
    pub fn set_presence(
        &mut self,
        member_id: MemberId,
        present: bool,
        justification: Option<String>,
    ) {
        if let Some(record) = self.presence.iter_mut().find(|r| r.member_id == member_id) {
            record.present = present;
            record.justification = justification;
        } else {
            self.presence.push(PresenceRecord {
                member_id,
                present,
                justification,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::ActionKind;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn session() -> Session {
        Session::new("s1", 12, SessionKind::Ordinary, at(0))
    }

    fn live_session_with_item(kind: ActionKind) -> (Session, ItemId) {
        let mut s = session();
        let id = s
            .add_item(
                Section::OrderOfBusiness,
                NewItem {
                    title: "Bill 42".into(),
                    description: None,
                    proposition: Some(PropositionId::new("prop-42")),
                    action_kind: kind,
                },
            )
            .unwrap();
        s.begin(at(0)).unwrap();
        (s, id)
    }

    fn started_at_invariant(s: &Session) -> bool {
        s.started_at().is_some() == (s.status() == SessionStatus::InProgress)
    }

    #[test]
    fn test_begin_starts_clock_from_zero() {
        let mut s = session();
        assert_eq!(s.status(), SessionStatus::Scheduled);
        s.begin(at(0)).unwrap();
        assert_eq!(s.status(), SessionStatus::InProgress);
        assert_eq!(s.elapsed(at(0)), 0);
        assert_eq!(s.elapsed(at(10)), 10);
        assert!(started_at_invariant(&s));
    }

    #[test]
    fn test_begin_requires_scheduled() {
        let mut s = session();
        s.begin(at(0)).unwrap();
        let err = s.begin(at(5)).unwrap_err();
        assert_eq!(err.to_string(), "cannot begin while in progress");
    }

    #[test]
    fn test_suspend_resume_accumulates_across_cycles() {
        let mut s = session();
        s.begin(at(0)).unwrap();
        s.suspend(at(60)).unwrap();
        assert_eq!(s.status(), SessionStatus::Suspended);
        assert!(started_at_invariant(&s));
        // Constant while suspended.
        assert_eq!(s.elapsed(at(600)), 60);

        s.resume(at(600)).unwrap();
        assert!(started_at_invariant(&s));
        s.suspend(at(640)).unwrap();
        assert_eq!(s.accumulated_secs(), 100);

        s.resume(at(700)).unwrap();
        s.conclude(at(750)).unwrap();
        assert_eq!(s.accumulated_secs(), 150);
        assert_eq!(s.elapsed(at(9000)), 150);
        assert!(started_at_invariant(&s));
    }

    #[test]
    fn test_conclude_from_suspended() {
        let mut s = session();
        s.begin(at(0)).unwrap();
        s.suspend(at(30)).unwrap();
        s.conclude(at(100)).unwrap();
        assert_eq!(s.status(), SessionStatus::Concluded);
        assert_eq!(s.accumulated_secs(), 30);
    }

    #[test]
    fn test_cancel_from_scheduled_keeps_zero_elapsed() {
        let mut s = session();
        s.cancel(at(50)).unwrap();
        assert_eq!(s.status(), SessionStatus::Cancelled);
        assert_eq!(s.elapsed(at(100)), 0);
        assert!(started_at_invariant(&s));
    }

    #[test]
    fn test_terminal_session_rejects_lifecycle_and_items() {
        let (mut s, item) = live_session_with_item(ActionKind::Vote);
        s.conclude(at(10)).unwrap();

        assert!(s.resume(at(20)).is_err());
        assert!(s.suspend(at(20)).is_err());
        assert!(s.cancel(at(20)).is_err());
        assert!(s.start_item(&item, at(20)).is_err());
        assert!(s
            .cast_vote(&item, MemberId::new("m1"), VoteChoice::Yes)
            .is_err());
    }

    #[test]
    fn test_item_commands_require_live_session() {
        let mut s = session();
        let id = s
            .add_item(
                Section::Expediente,
                NewItem {
                    title: "Minutes".into(),
                    description: None,
                    proposition: None,
                    action_kind: ActionKind::Reading,
                },
            )
            .unwrap();
        // Session still scheduled.
        let err = s.start_item(&id, at(0)).unwrap_err();
        assert_eq!(err.to_string(), "cannot start item while scheduled");
    }

    #[test]
    fn test_item_commands_allowed_while_suspended() {
        let (mut s, item) = live_session_with_item(ActionKind::Vote);
        s.start_item(&item, at(0)).unwrap();
        s.suspend(at(10)).unwrap();
        // The two clocks are independent: the item keeps its own state.
        s.pause_item(&item, at(20)).unwrap();
        assert_eq!(s.elapsed_item(&item, at(99)).unwrap(), 20);
        assert_eq!(s.elapsed(at(99)), 10);
    }

    #[test]
    fn test_suspend_leaves_item_timer_running() {
        let (mut s, item) = live_session_with_item(ActionKind::Discussion);
        s.start_item(&item, at(0)).unwrap();
        s.suspend(at(30)).unwrap();
        // Item clock unaffected by the session clock pausing.
        assert_eq!(s.elapsed_item(&item, at(50)).unwrap(), 50);
        assert_eq!(s.elapsed(at(50)), 30);
    }

    #[test]
    fn test_conclude_leaves_dangling_active_item() {
        let (mut s, item) = live_session_with_item(ActionKind::Discussion);
        s.start_item(&item, at(0)).unwrap();
        s.conclude(at(40)).unwrap();
        // History preserved, not auto-closed.
        assert!(s.agenda().get(&item).unwrap().status().is_active());
    }

    #[test]
    fn test_single_active_item_across_commands() {
        let (mut s, first) = live_session_with_item(ActionKind::Vote);
        let second = s
            .add_item(
                Section::Communications,
                NewItem {
                    title: "Announcement".into(),
                    description: None,
                    proposition: None,
                    action_kind: ActionKind::Announcement,
                },
            )
            .unwrap();

        s.start_item(&first, at(0)).unwrap();
        assert!(s.start_item(&second, at(1)).is_err());

        let active: Vec<_> = s
            .agenda()
            .ordered()
            .into_iter()
            .filter(|i| i.status().is_active())
            .collect();
        assert_eq!(active.len(), 1);

        s.finish_item(&first, Some(ItemOutcome::Approved), at(5)).unwrap();
        s.start_item(&second, at(6)).unwrap();
    }

    #[test]
    fn test_withdraw_returns_linked_proposition() {
        let (mut s, item) = live_session_with_item(ActionKind::Vote);
        let freed = s.withdraw_item(&item, "author request", at(3)).unwrap();
        assert_eq!(freed, Some(PropositionId::new("prop-42")));
    }

    #[test]
    fn test_vote_flow_through_session() {
        let (mut s, item) = live_session_with_item(ActionKind::Vote);
        s.start_item(&item, at(0)).unwrap();
        s.open_vote(&item).unwrap();
        s.cast_vote(&item, MemberId::new("m1"), VoteChoice::Yes).unwrap();
        s.cast_vote(&item, MemberId::new("m2"), VoteChoice::No).unwrap();
        // Idempotent replacement.
        s.cast_vote(&item, MemberId::new("m2"), VoteChoice::Yes).unwrap();

        let tally = s.tally(&item).unwrap();
        assert_eq!((tally.yes, tally.no, tally.total), (2, 0, 2));
        assert!(tally.approved);
    }

    #[test]
    fn test_apply_template_only_when_scheduled() {
        use crate::agenda::template::{AgendaTemplate, TemplateItem};
        use crate::core::ids::TemplateId;

        let template = AgendaTemplate {
            id: TemplateId::new("ordinary-day"),
            name: "Ordinary sitting".into(),
            items: vec![
                TemplateItem {
                    section: Section::Expediente,
                    title: "Reading of minutes".into(),
                    description: None,
                    proposition: None,
                    action_kind: ActionKind::Reading,
                },
                TemplateItem {
                    section: Section::OrderOfBusiness,
                    title: "Pending bills".into(),
                    description: None,
                    proposition: None,
                    action_kind: ActionKind::Vote,
                },
            ],
        };

        let mut s = session();
        let ids = s.apply_template(&template, TemplateMode::Replace).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(s.agenda().len(), 2);
        s.agenda().check_sequences().unwrap();

        s.begin(at(0)).unwrap();
        let err = s.apply_template(&template, TemplateMode::Append).unwrap_err();
        assert_eq!(err.to_string(), "cannot apply template while in progress");
    }

    #[test]
    fn test_template_replace_scenario() {
        use crate::agenda::template::{AgendaTemplate, TemplateItem};
        use crate::core::ids::TemplateId;

        let mut s = session();
        for i in 0..3 {
            s.add_item(
                Section::Expediente,
                NewItem {
                    title: format!("old {i}"),
                    description: None,
                    proposition: None,
                    action_kind: ActionKind::Reading,
                },
            )
            .unwrap();
        }

        let template = AgendaTemplate {
            id: TemplateId::new("t"),
            name: "t".into(),
            items: (0..5)
                .map(|i| TemplateItem {
                    section: Section::Expediente,
                    title: format!("new {i}"),
                    description: None,
                    proposition: None,
                    action_kind: ActionKind::Reading,
                })
                .collect(),
        };

        s.apply_template(&template, TemplateMode::Replace).unwrap();
        let items = s.agenda().items_in(Section::Expediente);
        assert_eq!(items.len(), 5);
        let seqs: Vec<u32> = items.iter().map(|i| i.seq()).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4, 5]);
        assert!(items.iter().all(|i| i.title().starts_with("new")));
    }

    #[test]
    fn test_force_status_preserves_accumulation_invariant() {
        let mut s = session();
        s.begin(at(0)).unwrap();
        // Administrator forces the session back to scheduled.
        s.force_status(SessionStatus::Scheduled, at(25));
        assert_eq!(s.status(), SessionStatus::Scheduled);
        assert!(started_at_invariant(&s));
        assert_eq!(s.accumulated_secs(), 25);

        s.force_status(SessionStatus::InProgress, at(100));
        assert!(started_at_invariant(&s));
        assert_eq!(s.elapsed(at(110)), 35);
    }

    #[test]
    fn test_set_presence_replaces_per_member() {
        let mut s = session();
        s.set_presence(MemberId::new("m1"), true, None);
        s.set_presence(MemberId::new("m2"), false, Some("sick".into()));
        s.set_presence(MemberId::new("m1"), false, Some("left early".into()));

        assert_eq!(s.presence().len(), 2);
        let quorum = s.quorum();
        assert_eq!((quorum.total, quorum.present, quorum.absent), (2, 0, 2));
    }

    #[test]
    fn test_allocated_item_ids_are_unique() {
        let mut s = session();
        let a = s
            .add_item(
                Section::Other,
                NewItem {
                    title: "a".into(),
                    description: None,
                    proposition: None,
                    action_kind: ActionKind::Discussion,
                },
            )
            .unwrap();
        let b = s
            .add_item(
                Section::Other,
                NewItem {
                    title: "b".into(),
                    description: None,
                    proposition: None,
                    action_kind: ActionKind::Discussion,
                },
            )
            .unwrap();
        assert_ne!(a, b);
    }
}
