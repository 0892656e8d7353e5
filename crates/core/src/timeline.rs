use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ids::{DrillId, ItemId, SectionId};

pub const MIN_ITEM_MINUTES: u32 = 1;

/// One timed unit placed on the timeline. `drill_id` is an opaque reference
/// to the catalog entity; this subsystem never mutates or inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub instance_id: ItemId,
    #[serde(rename = "payloadRef")]
    pub drill_id: DrillId,
    pub duration_minutes: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub section_id: Option<SectionId>,
}

impl Item {
    pub fn new(drill_id: DrillId, duration_minutes: u32) -> Self {
        Self {
            instance_id: ItemId::new(),
            drill_id,
            duration_minutes: duration_minutes.max(MIN_ITEM_MINUTES),
            notes: String::new(),
            section_id: None,
        }
    }
}

/// A named, colored grouping of items. Order is implicit: position in the
/// timeline's section sequence is the display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub color: String,
}

/// A run of the display order: one section with its items, or the trailing
/// ungrouped block (`section: None`).
#[derive(Debug)]
pub struct DisplayGroup<'a> {
    pub section: Option<&'a Section>,
    pub items: Vec<&'a Item>,
}

/// The editor's single source of truth: a flat ordered item list plus an
/// ordered section sequence. Flat order drives cumulative time; sections are
/// a display/ownership grouping over it, not a time partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Timeline {
    pub items: Vec<Item>,
    pub sections: Vec<Section>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.sections.is_empty()
    }

    pub fn item_index(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.instance_id == id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.instance_id == id)
    }

    pub fn section_index(&self, id: SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Appends an item at the end of the flat list.
    pub fn push_item(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<Item, CoreError> {
        let index = self
            .item_index(id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    /// Sets an item's duration, clamped to the one-minute floor.
    pub fn set_item_duration(&mut self, id: ItemId, minutes: u32) -> Result<(), CoreError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.instance_id == id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
        item.duration_minutes = minutes.max(MIN_ITEM_MINUTES);
        Ok(())
    }

    pub fn set_item_notes(&mut self, id: ItemId, notes: impl Into<String>) -> Result<(), CoreError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.instance_id == id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
        item.notes = notes.into();
        Ok(())
    }

    pub fn rename_section(&mut self, id: SectionId, name: impl Into<String>) -> Result<(), CoreError> {
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::SectionNotFound(id.to_string()))?;
        section.name = name.into();
        Ok(())
    }

    /// Moves an item one slot up (`-1`) or down (`+1`) in the flat list,
    /// adopting the section of the neighbour it moved past when the move
    /// crosses a group boundary. A move off either end is a no-op and
    /// returns `Ok(false)`.
    pub fn move_item_step(&mut self, id: ItemId, delta: isize) -> Result<bool, CoreError> {
        let index = self
            .item_index(id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
        let new_index = index as isize + delta;
        if new_index < 0 || new_index >= self.items.len() as isize {
            return Ok(false);
        }
        let new_index = new_index as usize;

        let mut moved = self.items.remove(index);
        let neighbour_index = if delta > 0 { new_index - 1 } else { new_index + 1 };
        if let Some(neighbour) = self.items.get(neighbour_index) {
            if neighbour.section_id != moved.section_id {
                moved.section_id = neighbour.section_id;
            }
        }
        self.items.insert(new_index, moved);
        Ok(true)
    }

    /// Items assigned to the given section, in flat order.
    pub fn items_in_section(&self, id: SectionId) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|i| i.section_id == Some(id))
            .collect()
    }

    /// Items with no section, or whose section no longer exists. The latter
    /// should never persist past a lifecycle operation, but stored drafts
    /// are not trusted to uphold that.
    pub fn ungrouped_items(&self) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|i| match i.section_id {
                None => true,
                Some(sid) => self.section_index(sid).is_none(),
            })
            .collect()
    }

    /// Display order: each section in sequence with its items, then the
    /// ungrouped block last (omitted when empty).
    pub fn display_groups(&self) -> Vec<DisplayGroup<'_>> {
        let mut groups: Vec<DisplayGroup<'_>> = self
            .sections
            .iter()
            .map(|section| DisplayGroup {
                section: Some(section),
                items: self.items_in_section(section.id),
            })
            .collect();

        let ungrouped = self.ungrouped_items();
        if !ungrouped.is_empty() {
            groups.push(DisplayGroup {
                section: None,
                items: ungrouped,
            });
        }
        groups
    }

    /// Checks the no-dangling-reference invariant.
    pub fn validate(&self) -> Result<(), CoreError> {
        for item in &self.items {
            if let Some(sid) = item.section_id {
                if self.section_index(sid).is_none() {
                    return Err(CoreError::DanglingSectionRef {
                        item: item.instance_id.to_string(),
                        section: sid.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.sections.clear();
    }
}
