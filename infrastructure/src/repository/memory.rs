//! In-memory session repository.
//!
//! The process is the source of truth for live sessions; everything a
//! display needs is served from here. Saves enforce an optimistic version
//! check so a command working from a stale copy is refused rather than
//! silently overwriting.

use async_trait::async_trait;
use plenum_application::ports::{RepositoryError, SessionRepository};
use plenum_domain::{Session, SessionId};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
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
            return Err(RepositoryError::ConcurrentModification(
                session.id().clone(),
            ));
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use plenum_domain::SessionKind;

    fn session(id: &str) -> Session {
        Session::new(
            id,
            1,
            SessionKind::Ordinary,
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_insert_load_roundtrip() {
        let repo = InMemorySessionRepository::new();
        repo.insert(session("s1")).await.unwrap();

        let loaded = repo.load(&SessionId::new("s1")).await.unwrap();
        assert_eq!(loaded.id().as_str(), "s1");

        let err = repo.load(&SessionId::new("s2")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let repo = InMemorySessionRepository::new();
        repo.insert(session("s1")).await.unwrap();
        let err = repo.insert(session("s1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(_)));
    }

    #[tokio::test]
    async fn test_stale_save_is_refused() {
        let repo = InMemorySessionRepository::new();
        repo.insert(session("s1")).await.unwrap();
        let id = SessionId::new("s1");

        let mut copy_a = repo.load(&id).await.unwrap();
        let mut copy_b = repo.load(&id).await.unwrap();

        repo.save(&mut copy_a).await.unwrap();
        assert_eq!(copy_a.version(), 1);

        let err = repo.save(&mut copy_b).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConcurrentModification(_)));
    }

    #[tokio::test]
    async fn test_remove() {
        let repo = InMemorySessionRepository::new();
        repo.insert(session("s1")).await.unwrap();
        repo.remove(&SessionId::new("s1")).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());

        let err = repo.remove(&SessionId::new("s1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
