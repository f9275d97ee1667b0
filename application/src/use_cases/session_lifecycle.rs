//! Session lifecycle commands: begin, suspend, resume, conclude, cancel,
//! plus creation and the administrative status override.

use super::shared::CommandExecutor;
use crate::error::CommandError;
use crate::locks::SessionLocks;
use crate::ports::{Clock, EventSink, SessionEvent, SessionRepository};
use crate::snapshot::SessionSnapshot;
use chrono::{DateTime, Utc};
use plenum_domain::{Session, SessionId, SessionKind, SessionStatus};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub struct SessionCommands<R> {
    exec: CommandExecutor<R>,
}

impl<R: SessionRepository> SessionCommands<R> {
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

    /// Register a new scheduled session.
    pub async fn create(
        &self,
        id: impl Into<SessionId>,
        number: u32,
        kind: SessionKind,
        scheduled_for: DateTime<Utc>,
    ) -> Result<SessionSnapshot, CommandError> {
        let session = Session::new(id, number, kind, scheduled_for);
        let snapshot = SessionSnapshot::capture(&session, self.exec.clock.now());
        let session_id = session.id().clone();
        self.exec.repo.insert(session).await?;
        self.exec.events.record(SessionEvent::new(
            session_id.clone(),
            "session_created",
            json!({ "number": number, "kind": kind }),
        ));
        info!(session = %session_id, number, "session created");
        Ok(snapshot)
    }

    /// Scheduled -> InProgress; the session clock starts.
    pub async fn begin(&self, id: &SessionId) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(id, "session_begun", |session, now| {
                session.begin(now)?;
                Ok(json!({ "started_at": now }))
            })
            .await
    }

    pub async fn suspend(&self, id: &SessionId) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(id, "session_suspended", |session, now| {
                session.suspend(now)?;
                Ok(json!({ "accumulated_secs": session.accumulated_secs() }))
            })
            .await
    }

    pub async fn resume(&self, id: &SessionId) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(id, "session_resumed", |session, now| {
                session.resume(now)?;
                Ok(json!({ "resumed_at": now }))
            })
            .await
    }

    pub async fn conclude(&self, id: &SessionId) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(id, "session_concluded", |session, now| {
                session.conclude(now)?;
                Ok(json!({
                    "accumulated_secs": session.accumulated_secs(),
                    "open_items": session.agenda().open_items(),
                }))
            })
            .await
    }

    pub async fn cancel(&self, id: &SessionId) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(id, "session_cancelled", |session, now| {
                session.cancel(now)?;
                Ok(json!({ "accumulated_secs": session.accumulated_secs() }))
            })
            .await
    }

    /// Delete the session from the repository and prune its lock entry.
    pub async fn remove(&self, id: &SessionId) -> Result<(), CommandError> {
        let guard = self.exec.locks.acquire(id).await;
        self.exec.repo.remove(id).await?;
        self.exec
            .events
            .record(SessionEvent::new(id.clone(), "session_removed", json!({})));
        info!(session = %id, "session removed");
        drop(guard);
        self.exec.locks.release(id).await;
        Ok(())
    }

    /// Administrative escape hatch: overwrite the status directly, keeping
    /// the time accumulation consistent.
    pub async fn override_status(
        &self,
        id: &SessionId,
        status: SessionStatus,
    ) -> Result<SessionSnapshot, CommandError> {
        self.exec
            .mutate(id, "session_status_overridden", |session, now| {
                let from = session.status();
                session.force_status(status, now);
                Ok(json!({ "from": from, "to": status }))
            })
            .await
    }
}
