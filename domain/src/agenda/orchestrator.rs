//! The agenda: section-partitioned items with contiguous sequences.
//!
//! Owns the ordered item collection and everything that rearranges it:
//! inserts, adjacent swaps, cross-section moves and bulk template
//! application. Also resolves "the current item" and enforces the
//! single-active-item invariant on `start`.
//!
//! The current item is a query over the section-ordered list, not a cached
//! pointer, so it can never go stale.

use super::item::AgendaItem;
use super::template::{TemplateItem, TemplateMode};
use super::Section;
use crate::core::error::EngineError;
use crate::core::ids::{ItemId, PropositionId};
use serde::{Deserialize, Serialize};

/// Fields for a manually added or suggested item, before it gets an id and
/// a sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub proposition: Option<PropositionId>,
    pub action_kind: super::ActionKind,
}

impl From<TemplateItem> for NewItem {
    fn from(t: TemplateItem) -> Self {
        Self {
            title: t.title,
            description: t.description,
            proposition: t.proposition,
            action_kind: t.action_kind,
        }
    }
}

/// Direction for an adjacent swap within a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// The ordered collection of a session's agenda items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Agenda {
    items: Vec<AgendaItem>,
}

impl Agenda {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&AgendaItem> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: &ItemId) -> Option<&mut AgendaItem> {
        self.items.iter_mut().find(|i| i.id() == id)
    }

    fn require_mut(&mut self, id: &ItemId) -> Result<&mut AgendaItem, EngineError> {
        self.items
            .iter_mut()
            .find(|i| i.id() == id)
            .ok_or_else(|| EngineError::not_found(format!("agenda item {id}")))
    }

    /// Items of one section, ordered by sequence number.
    pub fn items_in(&self, section: Section) -> Vec<&AgendaItem> {
        let mut items: Vec<&AgendaItem> =
            self.items.iter().filter(|i| i.section() == section).collect();
        items.sort_by_key(|i| i.seq());
        items
    }

    /// All items in section-priority order, then by sequence.
    pub fn ordered(&self) -> Vec<&AgendaItem> {
        let mut items: Vec<&AgendaItem> = self.items.iter().collect();
        items.sort_by_key(|i| (i.section(), i.seq()));
        items
    }

    /// The unique item currently in an active status, found by
    /// section-priority scan.
    pub fn current_item(&self) -> Option<&AgendaItem> {
        self.ordered().into_iter().find(|i| i.status().is_active())
    }

    /// Next sequence number for a section. Sequences are contiguous, so
    /// this is the section's item count plus one.
    fn next_seq(&self, section: Section) -> u32 {
        self.items.iter().filter(|i| i.section() == section).count() as u32 + 1
    }

    /// Insert a new pending item at the end of its section. Suggestion
    /// acceptance goes through here as well.
    pub fn add_item(&mut self, id: ItemId, section: Section, new: NewItem) {
        let mut item = AgendaItem::new(id, section, self.next_seq(section), new.title, new.action_kind);
        if let Some(description) = new.description {
            item = item.with_description(description);
        }
        if let Some(proposition) = new.proposition {
            item = item.with_proposition(proposition);
        }
        self.items.push(item);
    }

    /// Start discussion on an item, enforcing the single-active-item
    /// invariant before any mutation.
    pub fn start(&mut self, id: &ItemId, now: chrono::DateTime<chrono::Utc>) -> Result<(), EngineError> {
        if let Some(active) = self.current_item()
            && active.id() != id
        {
            return Err(EngineError::InvariantViolation(format!(
                "item {} is already {}",
                active.id(),
                active.status()
            )));
        }
        self.require_mut(id)?.start(now)
    }

    /// Swap the item with its neighbor within the section. A move past the
    /// edge of the section is a no-op.
    pub fn move_item(&mut self, id: &ItemId, direction: MoveDirection) -> Result<(), EngineError> {
        let (section, seq) = {
            let item = self
                .get(id)
                .ok_or_else(|| EngineError::not_found(format!("agenda item {id}")))?;
            (item.section(), item.seq())
        };
        let neighbor_seq = match direction {
            MoveDirection::Up if seq > 1 => seq - 1,
            MoveDirection::Down if seq < self.next_seq(section) - 1 => seq + 1,
            _ => return Ok(()),
        };
        for item in &mut self.items {
            if item.section() == section {
                if item.seq == seq && item.id() == id {
                    item.seq = neighbor_seq;
                } else if item.seq == neighbor_seq {
                    item.seq = seq;
                }
            }
        }
        Ok(())
    }

    /// Move an item to `target_section` at 1-based `target_index`, closing
    /// the gap in the source section and renumbering the destination from
    /// the insertion point, in the same operation.
    ///
    /// `target_index` is clamped to the destination's valid range.
    pub fn move_item_to(
        &mut self,
        id: &ItemId,
        target_section: Section,
        target_index: u32,
    ) -> Result<(), EngineError> {
        let position = self
            .items
            .iter()
            .position(|i| i.id() == id)
            .ok_or_else(|| EngineError::not_found(format!("agenda item {id}")))?;
        let mut item = self.items.remove(position);
        let source = item.section();
        self.renumber(source);

        let dest_len = self.items.iter().filter(|i| i.section() == target_section).count();
        let insert_at = (target_index.max(1) as usize - 1).min(dest_len);

        // Shift everything at or after the insertion point.
        for other in &mut self.items {
            if other.section() == target_section && other.seq as usize > insert_at {
                other.seq += 1;
            }
        }
        item.section = target_section;
        item.seq = insert_at as u32 + 1;
        self.items.push(item);
        Ok(())
    }

    /// Apply a template's realized items. `REPLACE` discards all
    /// non-terminal items first; `APPEND` inserts after each section's
    /// highest sequence. The session guards that it is still scheduled.
    pub fn apply_template(&mut self, items: Vec<(ItemId, TemplateItem)>, mode: TemplateMode) {
        if mode == TemplateMode::Replace {
            self.items.retain(|i| i.status().is_terminal());
            for section in Section::ALL {
                self.renumber(section);
            }
        }
        for (id, template_item) in items {
            let section = template_item.section;
            self.add_item(id, section, template_item.into());
        }
    }

    /// Reassign 1..n within a section, preserving relative order.
    fn renumber(&mut self, section: Section) {
        let mut ids: Vec<(u32, ItemId)> = self
            .items
            .iter()
            .filter(|i| i.section() == section)
            .map(|i| (i.seq(), i.id().clone()))
            .collect();
        ids.sort_by_key(|(seq, _)| *seq);
        for (new_seq, (_, id)) in ids.into_iter().enumerate() {
            if let Some(item) = self.get_mut(&id) {
                item.seq = new_seq as u32 + 1;
            }
        }
    }

    /// Verify per-section sequence contiguity (1..n).
    pub fn check_sequences(&self) -> Result<(), EngineError> {
        for section in Section::ALL {
            let items = self.items_in(section);
            for (idx, item) in items.iter().enumerate() {
                if item.seq() != idx as u32 + 1 {
                    return Err(EngineError::InvariantViolation(format!(
                        "section {section} sequence broken at item {} (seq {})",
                        item.id(),
                        item.seq()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Count of items not yet in a terminal status.
    pub fn open_items(&self) -> usize {
        self.items.iter().filter(|i| !i.status().is_terminal()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::{ActionKind, ItemOutcome, ItemStatus};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn new(title: &str) -> NewItem {
        NewItem {
            title: title.into(),
            description: None,
            proposition: None,
            action_kind: ActionKind::Discussion,
        }
    }

    fn agenda_with(section: Section, titles: &[&str]) -> Agenda {
        let mut agenda = Agenda::new();
        for (i, title) in titles.iter().enumerate() {
            agenda.add_item(ItemId::new(format!("i{i}")), section, new(title));
        }
        agenda
    }

    fn seqs(agenda: &Agenda, section: Section) -> Vec<(String, u32)> {
        agenda
            .items_in(section)
            .iter()
            .map(|i| (i.id().to_string(), i.seq()))
            .collect()
    }

    #[test]
    fn test_add_assigns_contiguous_seq_per_section() {
        let mut agenda = agenda_with(Section::Expediente, &["a", "b"]);
        agenda.add_item(ItemId::new("x"), Section::OrderOfBusiness, new("c"));
        assert_eq!(
            seqs(&agenda, Section::Expediente),
            vec![("i0".into(), 1), ("i1".into(), 2)]
        );
        assert_eq!(seqs(&agenda, Section::OrderOfBusiness), vec![("x".into(), 1)]);
        agenda.check_sequences().unwrap();
    }

    #[test]
    fn test_start_enforces_single_active_item() {
        let mut agenda = agenda_with(Section::OrderOfBusiness, &["a", "b"]);
        agenda.start(&ItemId::new("i0"), at(0)).unwrap();

        let err = agenda.start(&ItemId::new("i1"), at(5)).unwrap_err();
        assert!(matches!(err, EngineError::InvariantViolation(_)));
        // The second item was not touched.
        assert_eq!(
            agenda.get(&ItemId::new("i1")).unwrap().status(),
            ItemStatus::Pending
        );
        // Restarting the already-active item is delegated to the item guard.
        assert!(agenda.start(&ItemId::new("i0"), at(5)).is_err());
    }

    #[test]
    fn test_current_item_scans_by_section_priority() {
        let mut agenda = Agenda::new();
        agenda.add_item(ItemId::new("late"), Section::Honors, new("h"));
        agenda.add_item(ItemId::new("early"), Section::Expediente, new("e"));
        assert!(agenda.current_item().is_none());

        agenda.start(&ItemId::new("late"), at(0)).unwrap();
        assert_eq!(agenda.current_item().unwrap().id(), &ItemId::new("late"));
    }

    #[test]
    fn test_move_up_and_down_swap_adjacent() {
        let mut agenda = agenda_with(Section::Expediente, &["a", "b", "c"]);
        agenda.move_item(&ItemId::new("i2"), MoveDirection::Up).unwrap();
        assert_eq!(
            seqs(&agenda, Section::Expediente),
            vec![("i0".into(), 1), ("i2".into(), 2), ("i1".into(), 3)]
        );

        agenda.move_item(&ItemId::new("i2"), MoveDirection::Down).unwrap();
        assert_eq!(
            seqs(&agenda, Section::Expediente),
            vec![("i0".into(), 1), ("i1".into(), 2), ("i2".into(), 3)]
        );
        agenda.check_sequences().unwrap();
    }

    #[test]
    fn test_move_past_edge_is_noop() {
        let mut agenda = agenda_with(Section::Expediente, &["a", "b"]);
        agenda.move_item(&ItemId::new("i0"), MoveDirection::Up).unwrap();
        agenda.move_item(&ItemId::new("i1"), MoveDirection::Down).unwrap();
        assert_eq!(
            seqs(&agenda, Section::Expediente),
            vec![("i0".into(), 1), ("i1".into(), 2)]
        );
    }

    #[test]
    fn test_move_across_sections_renumbers_both_sides() {
        let mut agenda = agenda_with(Section::Expediente, &["a", "b", "c"]);
        agenda.add_item(ItemId::new("d0"), Section::Communications, new("d"));
        agenda.add_item(ItemId::new("d1"), Section::Communications, new("e"));

        agenda
            .move_item_to(&ItemId::new("i1"), Section::Communications, 2)
            .unwrap();

        // Source gap closed.
        assert_eq!(
            seqs(&agenda, Section::Expediente),
            vec![("i0".into(), 1), ("i2".into(), 2)]
        );
        // Inserted at position 2, rest shifted.
        assert_eq!(
            seqs(&agenda, Section::Communications),
            vec![("d0".into(), 1), ("i1".into(), 2), ("d1".into(), 3)]
        );
        agenda.check_sequences().unwrap();
    }

    #[test]
    fn test_move_to_clamps_index() {
        let mut agenda = agenda_with(Section::Expediente, &["a"]);
        agenda.add_item(ItemId::new("d0"), Section::Other, new("d"));

        agenda.move_item_to(&ItemId::new("i0"), Section::Other, 99).unwrap();
        assert_eq!(
            seqs(&agenda, Section::Other),
            vec![("d0".into(), 1), ("i0".into(), 2)]
        );
        assert!(agenda.items_in(Section::Expediente).is_empty());
    }

    fn template_items(n: usize, section: Section) -> Vec<(ItemId, TemplateItem)> {
        (0..n)
            .map(|i| {
                (
                    ItemId::new(format!("t{i}")),
                    TemplateItem {
                        section,
                        title: format!("template item {i}"),
                        description: None,
                        proposition: None,
                        action_kind: ActionKind::Reading,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_template_replace_drops_non_terminal() {
        let mut agenda = agenda_with(Section::Expediente, &["a", "b", "c"]);
        agenda.apply_template(template_items(5, Section::Expediente), TemplateMode::Replace);

        assert_eq!(agenda.len(), 5);
        let seqs: Vec<u32> = agenda
            .items_in(Section::Expediente)
            .iter()
            .map(|i| i.seq())
            .collect();
        assert_eq!(seqs, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_template_replace_keeps_terminal_items() {
        let mut agenda = agenda_with(Section::Expediente, &["a", "b"]);
        agenda.start(&ItemId::new("i0"), at(0)).unwrap();
        agenda
            .get_mut(&ItemId::new("i0"))
            .unwrap()
            .finish(Some(ItemOutcome::Concluded), at(10))
            .unwrap();

        agenda.apply_template(template_items(2, Section::Expediente), TemplateMode::Replace);

        // Concluded history stays, pending item dropped, template appended.
        assert_eq!(agenda.len(), 3);
        assert_eq!(
            seqs(&agenda, Section::Expediente),
            vec![("i0".into(), 1), ("t0".into(), 2), ("t1".into(), 3)]
        );
    }

    #[test]
    fn test_template_append_inserts_after_highest_seq() {
        let mut agenda = agenda_with(Section::Expediente, &["a", "b"]);
        agenda.apply_template(template_items(2, Section::Expediente), TemplateMode::Append);

        assert_eq!(agenda.len(), 4);
        assert_eq!(
            seqs(&agenda, Section::Expediente),
            vec![
                ("i0".into(), 1),
                ("i1".into(), 2),
                ("t0".into(), 3),
                ("t1".into(), 4)
            ]
        );
    }
}
