//! In-process fakes for the ports, shared by the use case tests.

use crate::locks::SessionLocks;
use crate::ports::{
    Clock, EventSink, PropositionInfo, PropositionStore, RepositoryError, SessionEvent,
    SessionRepository, TemplateStore,
};
use crate::use_cases::{AgendaCommands, SessionCommands, SessionQueries, VotingCommands};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use plenum_domain::{AgendaTemplate, PropositionId, Session, SessionId, TemplateId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

pub(crate) fn sid() -> SessionId {
    SessionId::new("s1")
}

/// Clock that only moves when a test tells it to.
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    fn new() -> Self {
        Self {
            now: Mutex::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
        }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    pub(crate) fn advance(&self, secs: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        ManualClock::now(self)
    }
}

/// Repository over a map, with the same optimistic version check the real
/// adapter performs.
#[derive(Default)]
pub(crate) struct MemoryRepo {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

#[async_trait]
impl SessionRepository for MemoryRepo {
    async fn load(&self, id: &SessionId) -> Result<Session, RepositoryError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn save(&self, session: &mut Session) -> Result<(), RepositoryError> {
        let mut map = self.sessions.write().await;
        let stored = map
            .get(session.id())
            .ok_or_else(|| RepositoryError::NotFound(session.id().clone()))?;
        if stored.version() != session.version() {
            return Err(RepositoryError::ConcurrentModification(session.id().clone()));
        }
        session.set_version(session.version() + 1);
        map.insert(session.id().clone(), session.clone());
        Ok(())
    }

    async fn insert(&self, session: Session) -> Result<(), RepositoryError> {
        let mut map = self.sessions.write().await;
        if map.contains_key(session.id()) {
            return Err(RepositoryError::Storage(format!(
                "session {} already exists",
                session.id()
            )));
        }
        map.insert(session.id().clone(), session);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SessionId>, RepositoryError> {
        Ok(self.sessions.read().await.keys().cloned().collect())
    }

    async fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingSink {
    pub(crate) fn recorded(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Default)]
pub(crate) struct MapTemplateStore {
    templates: Mutex<HashMap<TemplateId, AgendaTemplate>>,
}

impl MapTemplateStore {
    pub(crate) fn put(&self, template: AgendaTemplate) {
        self.templates
            .lock()
            .unwrap()
            .insert(template.id.clone(), template);
    }
}

#[async_trait]
impl TemplateStore for MapTemplateStore {
    async fn get(&self, id: &TemplateId) -> Option<AgendaTemplate> {
        self.templates.lock().unwrap().get(id).cloned()
    }
}

#[derive(Default)]
pub(crate) struct RecordingPropositionStore {
    released: Mutex<Vec<PropositionId>>,
}

impl RecordingPropositionStore {
    pub(crate) fn released(&self) -> Vec<PropositionId> {
        self.released.lock().unwrap().clone()
    }
}

#[async_trait]
impl PropositionStore for RecordingPropositionStore {
    async fn get(&self, id: &PropositionId) -> Option<PropositionInfo> {
        Some(PropositionInfo {
            id: id.clone(),
            title: format!("proposition {id}"),
            kind: "bill".into(),
        })
    }

    async fn release(&self, id: &PropositionId) {
        self.released.lock().unwrap().push(id.clone());
    }
}

pub(crate) struct Harness {
    pub(crate) repo: Arc<MemoryRepo>,
    pub(crate) clock: Arc<ManualClock>,
    pub(crate) events: Arc<RecordingSink>,
    pub(crate) locks: Arc<SessionLocks>,
    pub(crate) templates: Arc<MapTemplateStore>,
    pub(crate) propositions: Arc<RecordingPropositionStore>,
}

impl Harness {
    pub(crate) fn session_commands(&self) -> SessionCommands<MemoryRepo> {
        SessionCommands::new(
            self.repo.clone(),
            self.clock.clone(),
            self.events.clone(),
            self.locks.clone(),
        )
    }

    pub(crate) fn agenda_commands(&self) -> AgendaCommands<MemoryRepo> {
        AgendaCommands::new(
            self.repo.clone(),
            self.clock.clone(),
            self.events.clone(),
            self.locks.clone(),
            self.templates.clone(),
            self.propositions.clone(),
        )
    }

    pub(crate) fn voting_commands(&self) -> VotingCommands<MemoryRepo> {
        VotingCommands::new(
            self.repo.clone(),
            self.clock.clone(),
            self.events.clone(),
            self.locks.clone(),
        )
    }

    pub(crate) fn queries(&self) -> SessionQueries<MemoryRepo> {
        SessionQueries::new(self.repo.clone(), self.clock.clone())
    }
}

pub(crate) fn harness() -> Harness {
    Harness {
        repo: Arc::new(MemoryRepo::default()),
        clock: Arc::new(ManualClock::new()),
        events: Arc::new(RecordingSink::default()),
        locks: Arc::new(SessionLocks::new()),
        templates: Arc::new(MapTemplateStore::default()),
        propositions: Arc::new(RecordingPropositionStore::default()),
    }
}
