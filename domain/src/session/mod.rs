//! The plenary session: lifecycle state machine and command surface.

pub mod entities;

use serde::{Deserialize, Serialize};

/// Kind of plenary sitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Ordinary,
    Extraordinary,
    Solemn,
    Special,
}

impl SessionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SessionKind::Ordinary => "ordinary",
            SessionKind::Extraordinary => "extraordinary",
            SessionKind::Solemn => "solemn",
            SessionKind::Special => "special",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ordinary" => Ok(SessionKind::Ordinary),
            "extraordinary" => Ok(SessionKind::Extraordinary),
            "solemn" => Ok(SessionKind::Solemn),
            "special" => Ok(SessionKind::Special),
            _ => Err(format!(
                "Unknown session kind: {s}. Valid: ordinary, extraordinary, solemn, special"
            )),
        }
    }
}

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    InProgress,
    Suspended,
    Concluded,
    Cancelled,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Concluded | SessionStatus::Cancelled)
    }

    /// Whether item-level commands are accepted.
    pub fn is_live(&self) -> bool {
        matches!(self, SessionStatus::InProgress | SessionStatus::Suspended)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::InProgress => "in progress",
            SessionStatus::Suspended => "suspended",
            SessionStatus::Concluded => "concluded",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub use entities::Session;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(SessionStatus::Concluded.is_terminal());
        assert!(SessionStatus::Cancelled.is_terminal());
        assert!(!SessionStatus::Suspended.is_terminal());

        assert!(SessionStatus::InProgress.is_live());
        assert!(SessionStatus::Suspended.is_live());
        assert!(!SessionStatus::Scheduled.is_live());
        assert!(!SessionStatus::Concluded.is_live());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(
            "ordinary".parse::<SessionKind>().ok(),
            Some(SessionKind::Ordinary)
        );
        assert!("plenary".parse::<SessionKind>().is_err());
    }
}
