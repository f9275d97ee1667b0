//! Session repository port.
//!
//! The persistence collaborator guarantees that a successful save is
//! durably visible to subsequent loads before the command returns.

use async_trait::async_trait;
use plenum_domain::{Session, SessionId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The stored session changed between this command's load and save.
    #[error("session {0} was modified concurrently")]
    ConcurrentModification(SessionId),

    #[error("storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Load a consistent copy of the session.
    async fn load(&self, id: &SessionId) -> Result<Session, RepositoryError>;

    /// Persist the session, enforcing the optimistic version check: fails
    /// with [`RepositoryError::ConcurrentModification`] when the stored
    /// version no longer matches the one this copy was loaded at. On
    /// success the new version is reflected into `session`.
    async fn save(&self, session: &mut Session) -> Result<(), RepositoryError>;

    /// Insert a new session; fails on duplicate id.
    async fn insert(&self, session: Session) -> Result<(), RepositoryError>;

    async fn list(&self) -> Result<Vec<SessionId>, RepositoryError>;

    /// Delete a session. Its items and presence records go with it.
    async fn remove(&self, id: &SessionId) -> Result<(), RepositoryError>;
}
