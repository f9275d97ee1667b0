//! Voting and presence commands.

use super::shared::CommandExecutor;
use crate::error::CommandError;
use crate::locks::SessionLocks;
use crate::ports::{Clock, EventSink, SessionRepository};
use crate::snapshot::SessionSnapshot;
use plenum_domain::{ItemId, MemberId, SessionId, VoteChoice};
use serde_json::json;
use std::sync::Arc;

pub struct VotingCommands<R> {
    exec: CommandExecutor<R>,
}

impl<R: SessionRepository> VotingCommands<R> {
    pub fn new(
        repo: Arc<R>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
        locks: Arc<SessionLocks>,
    ) -> Self {
        Self {
            exec: CommandExecutor::new(repo, clock, events, locks),
        }
    }

    /// Record one member's vote on an item with an open ballot. Voting
    /// again replaces the member's previous choice.
    pub async fn cast_vote(
        &self,
        session_id: &SessionId,
        item_id: &ItemId,
        member_id: MemberId,
        choice: VoteChoice,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "vote_cast", |session, _now| {
                let replaced = session.cast_vote(item_id, member_id.clone(), choice)?;
                Ok(json!({
                    "item": item_id,
                    "member": member_id,
                    "choice": choice,
                    "replaced": replaced,
                }))
            })
            .await
    }

    /// Mark a member present or absent on the session roll.
    pub async fn set_presence(
        &self,
        session_id: &SessionId,
        member_id: MemberId,
        present: bool,
        justification: Option<String>,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(session_id, "presence_set", |session, _now| {
                session.set_presence(member_id.clone(), present, justification.clone());
                Ok(json!({
                    "member": member_id,
                    "present": present,
                    "justification": justification,
                }))
            })
            .await
    }
}
