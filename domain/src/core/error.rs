//! Domain error types

use thiserror::Error;

/// Errors raised by the session control engine.
///
/// Every guarded transition is all-or-nothing: when one of these is
/// returned, no state was mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The attempted action is not permitted from the current status.
    #[error("cannot {action} while {status}")]
    IllegalTransition { action: String, status: String },

    /// The operation would break an engine invariant (two active items,
    /// negative elapsed time, non-contiguous sequence numbers).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(String),
}

impl EngineError {
    pub fn illegal(action: impl std::fmt::Display, status: impl std::fmt::Display) -> Self {
        Self::IllegalTransition {
            action: action.to_string(),
            status: status.to_string(),
        }
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    /// Check if this error is an illegal transition.
    pub fn is_illegal_transition(&self) -> bool {
        matches!(self, EngineError::IllegalTransition { .. })
    }
}
