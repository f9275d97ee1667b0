//! Application-level command errors.
//!
//! Every mutating command returns either the new snapshot or one of these;
//! nothing is partially applied and nothing is auto-retried here.

use crate::ports::RepositoryError;
use plenum_domain::{EngineError, SessionId, TemplateId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("template {0} not found")]
    TemplateNotFound(TemplateId),

    /// Illegal transition, invariant violation or missing item, verbatim
    /// from the engine.
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("session {0} was modified concurrently")]
    ConcurrentModification(SessionId),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for CommandError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => CommandError::SessionNotFound(id),
            RepositoryError::ConcurrentModification(id) => {
                CommandError::ConcurrentModification(id)
            }
            RepositoryError::Storage(msg) => CommandError::Storage(msg),
        }
    }
}

impl CommandError {
    /// Check if this error is an illegal transition (for which the console
    /// lists the currently legal actions instead).
    pub fn is_illegal_transition(&self) -> bool {
        matches!(self, CommandError::Engine(e) if e.is_illegal_transition())
    }
}
