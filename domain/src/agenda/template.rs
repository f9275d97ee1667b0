//! Agenda templates: reusable item lists applied in bulk.

use super::{ActionKind, Section};
use crate::core::ids::{PropositionId, TemplateId};
use serde::{Deserialize, Serialize};

/// How a template is merged into an existing agenda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateMode {
    /// Drop all non-terminal items, then insert the template list fresh.
    Replace,
    /// Insert after the highest existing sequence in each targeted section.
    Append,
}

impl std::str::FromStr for TemplateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(TemplateMode::Replace),
            "append" => Ok(TemplateMode::Append),
            _ => Err(format!("Unknown template mode: {s}. Valid: replace, append")),
        }
    }
}

/// One item of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateItem {
    pub section: Section,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub proposition: Option<PropositionId>,
    pub action_kind: ActionKind,
}

/// A named, reusable agenda layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaTemplate {
    pub id: TemplateId,
    pub name: String,
    pub items: Vec<TemplateItem>,
}
