//! Agenda commands: item transitions, reordering and template application.

use super::shared::CommandExecutor;
use crate::error::CommandError;
use crate::locks::SessionLocks;
use crate::ports::{Clock, EventSink, PropositionStore, SessionRepository, TemplateStore};
use crate::snapshot::SessionSnapshot;
use plenum_domain::{
    ItemId, ItemOutcome, MemberId, MoveDirection, NewItem, Section, SessionId, TemplateId,
    TemplateMode,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub struct AgendaCommands<R> {
    exec: CommandExecutor<R>,
    templates: Arc<dyn TemplateStore>,
    propositions: Arc<dyn PropositionStore>,
}

impl<R: SessionRepository> AgendaCommands<R> {
    pub fn new(
        repo: Arc<R>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
        locks: Arc<SessionLocks>,
        templates: Arc<dyn TemplateStore>,
        propositions: Arc<dyn PropositionStore>,
    ) -> Self {
        Self {
            exec: CommandExecutor::new(repo, clock, events, locks),
            templates,
            propositions,
        }
    }

    /// Manually add a pending item at the end of its section.
    pub async fn add_item(
        &self,
        session_id: &SessionId,
        section: Section,
        new: NewItem,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "item_added", |session, _now| {
                let title = new.title.clone();
                let id = session.add_item(section, new)?;
                Ok(json!({ "item": id, "section": section, "title": title }))
            })
            .await
    }

    /// Accept an externally suggested item into the agenda.
    pub async fn accept_suggestion(
        &self,
        session_id: &SessionId,
        section: Section,
        new: NewItem,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "suggestion_accepted", |session, _now| {
                let title = new.title.clone();
                let id = session.accept_suggestion(section, new)?;
                Ok(json!({ "item": id, "section": section, "title": title }))
            })
            .await
    }

    pub async fn start_item(
        &self,
        session_id: &SessionId,
        item_id: &ItemId,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "item_started", |session, now| {
                session.start_item(item_id, now)?;
                Ok(json!({ "item": item_id }))
            })
            .await
    }

    pub async fn pause_item(
        &self,
        session_id: &SessionId,
        item_id: &ItemId,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "item_paused", |session, now| {
                session.pause_item(item_id, now)?;
                Ok(json!({ "item": item_id }))
            })
            .await
    }

    pub async fn resume_item(
        &self,
        session_id: &SessionId,
        item_id: &ItemId,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "item_resumed", |session, now| {
                session.resume_item(item_id, now)?;
                Ok(json!({ "item": item_id }))
            })
            .await
    }

    pub async fn open_vote(
        &self,
        session_id: &SessionId,
        item_id: &ItemId,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "vote_opened", |session, _now| {
                session.open_vote(item_id)?;
                Ok(json!({ "item": item_id }))
            })
            .await
    }

    pub async fn request_review(
        &self,
        session_id: &SessionId,
        item_id: &ItemId,
        member_id: MemberId,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "review_requested", |session, now| {
                session.request_review(item_id, member_id.clone(), now)?;
                Ok(json!({ "item": item_id, "member": member_id }))
            })
            .await
    }

    pub async fn resume_from_review(
        &self,
        session_id: &SessionId,
        item_id: &ItemId,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "review_resumed", |session, now| {
                session.resume_from_review(item_id, now)?;
                Ok(json!({ "item": item_id }))
            })
            .await
    }

    pub async fn finish_item(
        &self,
        session_id: &SessionId,
        item_id: &ItemId,
        outcome: Option<ItemOutcome>,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "item_finished", |session, now| {
                session.finish_item(item_id, outcome, now)?;
                let status = session
                    .agenda()
                    .get(item_id)
                    .map(|i| i.status());
                Ok(json!({ "item": item_id, "status": status }))
            })
            .await
    }

    /// Withdraw an item and release its linked proposition for future
    /// scheduling.
    pub async fn withdraw_item(
        &self,
        session_id: &SessionId,
        item_id: &ItemId,
        reason: impl Into<String>,
    ) -> Result<SessionSnapshot, CommandError> {
        let reason = reason.into();
        let mut freed = None;
        let snapshot = self
            .exec
            .mutate(session_id, "item_withdrawn", |session, now| {
                freed = session.withdraw_item(item_id, reason.clone(), now)?;
                Ok(json!({ "item": item_id, "reason": reason }))
            })
            .await?;

        if let Some(proposition) = freed {
            info!(%proposition, "releasing proposition after withdrawal");
            self.propositions.release(&proposition).await;
        }
        Ok(snapshot)
    }

    /// Swap an item with its neighbor within its section.
    pub async fn move_item(
        &self,
        session_id: &SessionId,
        item_id: &ItemId,
        direction: MoveDirection,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "item_moved", |session, _now| {
                session.move_item(item_id, direction)?;
                Ok(json!({ "item": item_id, "direction": direction }))
            })
            .await
    }

    /// Move an item to a target section and position.
    pub async fn move_item_to(
        &self,
        session_id: &SessionId,
        item_id: &ItemId,
        target_section: Section,
        target_index: u32,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "item_moved", |session, _now| {
                session.move_item_to(item_id, target_section, target_index)?;
                Ok(json!({
                    "item": item_id,
                    "section": target_section,
                    "index": target_index,
                }))
            })
            .await
    }

    /// Populate the agenda from a stored template.
    pub async fn apply_template(
        &self,
        session_id: &SessionId,
        template_id: &TemplateId,
        mode: TemplateMode,
    ) -> Result<SessionSnapshot, CommandError> {
        let template = self
            .templates
            .get(template_id)
            .await
            .ok_or_else(|| CommandError::TemplateNotFound(template_id.clone()))?;

        self.exec
            .mutate(session_id, "template_applied", |session, _now| {
                let ids = session.apply_template(&template, mode)?;
                Ok(json!({
                    "template": template_id,
                    "mode": mode,
                    "items": ids.len(),
                }))
            })
            .await
    }
}
