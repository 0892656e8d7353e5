//! Drag-gesture interpretation. Every entry point takes the current model by
//! reference and returns a new one; the caller decides whether to commit it.
//!
//! Re-parenting happens live, mid-gesture: an item dragged over a section
//! adopts that section immediately, and a cancelled gesture keeps whatever
//! the last hover produced. There is no rollback state.

use drillplan_core::ids::{ItemId, SectionId};
use drillplan_core::timeline::{Item, Timeline};

/// A draggable element: items and sections live in separate id namespaces,
/// and the pairing of dragged/target namespaces selects the gesture class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragNode {
    Item(ItemId),
    Section(SectionId),
}

/// Applies one drag gesture and returns the resulting model. Unknown ids,
/// a node dropped onto itself, and a section dragged onto an item all leave
/// the model unchanged.
pub fn apply_drag(timeline: &Timeline, dragged: DragNode, target: DragNode) -> Timeline {
    match (dragged, target) {
        (DragNode::Item(a), DragNode::Item(b)) => move_item_to_item(timeline, a, b),
        (DragNode::Item(a), DragNode::Section(s)) => hover_item_over_section(timeline, a, s),
        (DragNode::Section(a), DragNode::Section(b)) => move_section_to_section(timeline, a, b),
        (DragNode::Section(_), DragNode::Item(_)) => timeline.clone(),
    }
}

/// Item onto item: the dragged item leaves its slot, lands at the target's
/// position, and adopts the target's section (dropping onto an ungrouped
/// item clears the assignment).
fn move_item_to_item(timeline: &Timeline, dragged: ItemId, target: ItemId) -> Timeline {
    if dragged == target {
        return timeline.clone();
    }
    let (Some(from), Some(_)) = (timeline.item_index(dragged), timeline.item_index(target)) else {
        return timeline.clone();
    };

    let mut next = timeline.clone();
    let mut moved = next.items.remove(from);
    // Target index re-resolved after removal so the insert lands where the
    // target currently sits.
    let Some(to) = next.item_index(target) else {
        return timeline.clone();
    };
    moved.section_id = next.items[to].section_id;
    next.items.insert(to, moved);
    next
}

/// Item hovered over a section header: re-parent immediately. Position in
/// the flat list is untouched; only ownership changes.
fn hover_item_over_section(timeline: &Timeline, dragged: ItemId, section: SectionId) -> Timeline {
    if timeline.section_index(section).is_none() {
        return timeline.clone();
    }
    let Some(index) = timeline.item_index(dragged) else {
        return timeline.clone();
    };
    if timeline.items[index].section_id == Some(section) {
        return timeline.clone();
    }

    let mut next = timeline.clone();
    next.items[index].section_id = Some(section);
    next
}

/// Section onto section: reorder the section sequence, then rebuild the flat
/// item list by walking the new order: each section's items in their prior
/// relative order, ungrouped items appended at the end. The one gesture that
/// rewrites both orders.
fn move_section_to_section(timeline: &Timeline, dragged: SectionId, target: SectionId) -> Timeline {
    if dragged == target {
        return timeline.clone();
    }
    let (Some(from), Some(_)) = (
        timeline.section_index(dragged),
        timeline.section_index(target),
    ) else {
        return timeline.clone();
    };

    let mut next = timeline.clone();
    let moved = next.sections.remove(from);
    let Some(to) = next.section_index(target) else {
        return timeline.clone();
    };
    next.sections.insert(to, moved);

    let mut rebuilt: Vec<Item> = Vec::with_capacity(next.items.len());
    for section in &next.sections {
        rebuilt.extend(
            next.items
                .iter()
                .filter(|i| i.section_id == Some(section.id))
                .cloned(),
        );
    }
    rebuilt.extend(
        next.items
            .iter()
            .filter(|i| match i.section_id {
                None => true,
                Some(sid) => next.section_index(sid).is_none(),
            })
            .cloned(),
    );
    next.items = rebuilt;
    next
}
