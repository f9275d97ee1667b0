//! Agenda items, their state machine, and the section-ordered agenda.

pub mod item;
pub mod orchestrator;
pub mod template;
pub mod transitions;

use serde::{Deserialize, Serialize};

macro_rules! fmt_label {
    () => {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.label())
        }
    };
}

/// Fixed phase of the sitting an item belongs to. Declaration order is the
/// section-priority order used when scanning for the current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Expediente,
    OrderOfBusiness,
    Communications,
    Honors,
    Other,
}

impl Section {
    /// All sections in priority order.
    pub const ALL: [Section; 5] = [
        Section::Expediente,
        Section::OrderOfBusiness,
        Section::Communications,
        Section::Honors,
        Section::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Expediente => "expediente",
            Section::OrderOfBusiness => "order of business",
            Section::Communications => "communications",
            Section::Honors => "honors",
            Section::Other => "other",
        }
    }
}

impl std::fmt::Display for Section {
    fmt_label!();
}

impl std::str::FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expediente" => Ok(Section::Expediente),
            "order_of_business" | "order" => Ok(Section::OrderOfBusiness),
            "communications" => Ok(Section::Communications),
            "honors" => Ok(Section::Honors),
            "other" => Ok(Section::Other),
            _ => Err(format!(
                "Unknown section: {s}. Valid: expediente, order_of_business, communications, honors, other"
            )),
        }
    }
}

/// The nature of business an item represents. Constrains which transitions
/// are legal (only VOTE items may open a vote).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Reading,
    Discussion,
    Vote,
    Announcement,
    Tribute,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Reading => "reading",
            ActionKind::Discussion => "discussion",
            ActionKind::Vote => "vote",
            ActionKind::Announcement => "announcement",
            ActionKind::Tribute => "tribute",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fmt_label!();
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reading" => Ok(ActionKind::Reading),
            "discussion" => Ok(ActionKind::Discussion),
            "vote" => Ok(ActionKind::Vote),
            "announcement" => Ok(ActionKind::Announcement),
            "tribute" => Ok(ActionKind::Tribute),
            _ => Err(format!(
                "Unknown action kind: {s}. Valid: reading, discussion, vote, announcement, tribute"
            )),
        }
    }
}

/// Lifecycle status of an agenda item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    InDiscussion,
    InVote,
    /// "Vista": deliberation handed to one member for further study.
    UnderReview,
    Approved,
    Rejected,
    Withdrawn,
    Postponed,
    Concluded,
}

impl ItemStatus {
    /// Terminal statuses are immutable except for administrative
    /// correction; the one carve-out is restarting a postponed item.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ItemStatus::Approved
                | ItemStatus::Rejected
                | ItemStatus::Withdrawn
                | ItemStatus::Postponed
                | ItemStatus::Concluded
        )
    }

    /// Active statuses: at most one item per session may hold one.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ItemStatus::InDiscussion | ItemStatus::InVote | ItemStatus::UnderReview
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::InDiscussion => "in discussion",
            ItemStatus::InVote => "in vote",
            ItemStatus::UnderReview => "under review",
            ItemStatus::Approved => "approved",
            ItemStatus::Rejected => "rejected",
            ItemStatus::Withdrawn => "withdrawn",
            ItemStatus::Postponed => "postponed",
            ItemStatus::Concluded => "concluded",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fmt_label!();
}

/// Outcome supplied to `finish`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOutcome {
    Approved,
    Rejected,
    Withdrawn,
    Postponed,
    Concluded,
}

impl ItemOutcome {
    pub fn status(self) -> ItemStatus {
        match self {
            ItemOutcome::Approved => ItemStatus::Approved,
            ItemOutcome::Rejected => ItemStatus::Rejected,
            ItemOutcome::Withdrawn => ItemStatus::Withdrawn,
            ItemOutcome::Postponed => ItemStatus::Postponed,
            ItemOutcome::Concluded => ItemStatus::Concluded,
        }
    }
}

impl std::str::FromStr for ItemOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approved" | "approve" => Ok(ItemOutcome::Approved),
            "rejected" | "reject" => Ok(ItemOutcome::Rejected),
            "withdrawn" | "withdraw" => Ok(ItemOutcome::Withdrawn),
            "postponed" | "postpone" => Ok(ItemOutcome::Postponed),
            "concluded" | "conclude" => Ok(ItemOutcome::Concluded),
            _ => Err(format!(
                "Unknown outcome: {s}. Valid: approved, rejected, withdrawn, postponed, concluded"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_and_active_partition() {
        for status in [
            ItemStatus::Pending,
            ItemStatus::InDiscussion,
            ItemStatus::InVote,
            ItemStatus::UnderReview,
        ] {
            assert!(!status.is_terminal());
        }
        for status in [
            ItemStatus::Approved,
            ItemStatus::Rejected,
            ItemStatus::Withdrawn,
            ItemStatus::Postponed,
            ItemStatus::Concluded,
        ] {
            assert!(status.is_terminal());
            assert!(!status.is_active());
        }
        assert!(ItemStatus::InDiscussion.is_active());
        assert!(ItemStatus::InVote.is_active());
        assert!(ItemStatus::UnderReview.is_active());
        assert!(!ItemStatus::Pending.is_active());
    }

    #[test]
    fn test_section_priority_order() {
        assert!(Section::Expediente < Section::OrderOfBusiness);
        assert!(Section::OrderOfBusiness < Section::Communications);
        assert!(Section::Honors < Section::Other);
    }

    #[test]
    fn test_outcome_maps_to_status() {
        assert_eq!(ItemOutcome::Approved.status(), ItemStatus::Approved);
        assert_eq!(ItemOutcome::Concluded.status(), ItemStatus::Concluded);
    }

    #[test]
    fn test_parse_section_and_kind() {
        assert_eq!("order".parse::<Section>().ok(), Some(Section::OrderOfBusiness));
        assert_eq!("Honors".parse::<Section>().ok(), Some(Section::Honors));
        assert!("annex".parse::<Section>().is_err());
        assert_eq!("vote".parse::<ActionKind>().ok(), Some(ActionKind::Vote));
        assert!("debate".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_parse_outcome() {
        assert_eq!(
            "approve".parse::<ItemOutcome>().ok(),
            Some(ItemOutcome::Approved)
        );
        assert!("shelved".parse::<ItemOutcome>().is_err());
    }
}
