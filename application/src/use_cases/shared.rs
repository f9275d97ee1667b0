//! Shared command execution path.
//!
//! Every mutating command runs the same critical section: take the
//! session's lock, load a fresh copy, apply the domain transition, save,
//! emit the event, return the snapshot. A transition error aborts before
//! the save, so refused commands leave no trace.

use crate::error::CommandError;
use crate::locks::SessionLocks;
use crate::ports::{Clock, EventSink, SessionEvent, SessionRepository};
use crate::snapshot::SessionSnapshot;
use chrono::{DateTime, Utc};
use plenum_domain::{EngineError, Session, SessionId};
use std::sync::Arc;
use tracing::debug;

pub(crate) struct CommandExecutor<R> {
    pub(crate) repo: Arc<R>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) events: Arc<dyn EventSink>,
    pub(crate) locks: Arc<SessionLocks>,
}

impl<R> Clone for CommandExecutor<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            clock: self.clock.clone(),
            events: self.events.clone(),
            locks: self.locks.clone(),
        }
    }
}

impl<R: SessionRepository> CommandExecutor<R> {
    pub(crate) fn new(
        repo: Arc<R>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
        locks: Arc<SessionLocks>,
    ) -> Self {
        Self {
            repo,
            clock,
            events,
            locks,
        }
    }

    /// Run one serialized load-mutate-save cycle on the session.
    pub(crate) async fn mutate<F>(
        &self,
        id: &SessionId,
        event_type: &'static str,
        f: F,
    ) -> Result<SessionSnapshot, CommandError>
    where
        F: FnOnce(&mut Session, DateTime<Utc>) -> Result<serde_json::Value, EngineError>,
    {
        let _guard = self.locks.acquire(id).await;
        let now = self.clock.now();
        let mut session = self.repo.load(id).await?;
        let payload = f(&mut session, now)?;
        self.repo.save(&mut session).await?;
        self.events
            .record(SessionEvent::new(id.clone(), event_type, payload));
        debug!(session = %id, event = event_type, "command applied");
        Ok(SessionSnapshot::capture(&session, now))
    }
}
