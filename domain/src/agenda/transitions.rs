//! The agenda item transition table.
//!
//! Legality is a pure lookup keyed by `(status, action_kind)` so the full
//! table is auditable in one place and testable as data. The guards in
//! [`crate::agenda::item`] and the operator console's "what is legal now"
//! listing both read from here.

use super::{ActionKind, ItemStatus};
use serde::{Deserialize, Serialize};

/// An action an operator can attempt on an agenda item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemAction {
    Start,
    Pause,
    Resume,
    OpenVote,
    RequestReview,
    ResumeFromReview,
    Finish,
    Withdraw,
    CastVote,
}

impl ItemAction {
    pub fn label(&self) -> &'static str {
        match self {
            ItemAction::Start => "start",
            ItemAction::Pause => "pause",
            ItemAction::Resume => "resume",
            ItemAction::OpenVote => "open vote",
            ItemAction::RequestReview => "request review",
            ItemAction::ResumeFromReview => "resume from review",
            ItemAction::Finish => "finish",
            ItemAction::Withdraw => "withdraw",
            ItemAction::CastVote => "cast vote",
        }
    }
}

impl std::fmt::Display for ItemAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Actions legal from `status` for an item of `kind`.
///
/// Postponed is terminal for every action except `start` (a postponed
/// matter may be taken up again). Other terminal statuses admit nothing.
pub fn legal_actions(status: ItemStatus, kind: ActionKind) -> &'static [ItemAction] {
    use ItemAction::*;
    match (status, kind) {
        (ItemStatus::Pending, _) => &[Start, Withdraw],
        (ItemStatus::Postponed, _) => &[Start],
        (ItemStatus::InDiscussion, ActionKind::Vote) => {
            &[Pause, Resume, OpenVote, RequestReview, Finish, Withdraw]
        }
        (ItemStatus::InDiscussion, _) => &[Pause, Resume, RequestReview, Finish, Withdraw],
        (ItemStatus::InVote, _) => &[CastVote, RequestReview, Finish, Withdraw],
        (ItemStatus::UnderReview, _) => &[ResumeFromReview, Withdraw],
        _ => &[],
    }
}

/// Whether `action` may be attempted from `status` for an item of `kind`.
pub fn is_legal(status: ItemStatus, kind: ActionKind, action: ItemAction) -> bool {
    legal_actions(status, kind).contains(&action)
}
