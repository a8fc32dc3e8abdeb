#![forbid(unsafe_code)]

//! Working-set item configuration used as scratch space for one placement
//! attempt.

use dashgrid_core::{CellAndSpan, GridRect, ItemId};
use rustc_hash::FxHashMap;

/// A candidate layout under construction: every item's working placement, a
/// checkpoint for rollback, and the proposed placement of the item being
/// dragged.
///
/// One configuration lives for one placement attempt. It is populated from
/// the committed state, mutated freely by the displacement strategies, and
/// either promoted into temporary/permanent coordinates or discarded whole.
#[derive(Debug, Default)]
pub(crate) struct ItemConfiguration {
    /// Current working placement per item.
    pub map: FxHashMap<ItemId, CellAndSpan>,
    /// Checkpoint written by [`save`](Self::save), read by
    /// [`restore`](Self::restore).
    saved: FxHashMap<ItemId, CellAndSpan>,
    /// Item handles in mutable processing order; the push pass re-sorts this
    /// by the leading edge.
    pub sorted_items: Vec<ItemId>,
    /// Items that intersected the drop rectangle in the last attempt.
    pub intersecting: Vec<ItemId>,
    /// Whether this configuration represents a valid solution.
    pub is_solution: bool,
    /// Proposed cell and span for the subject (dragged) item.
    pub placement: CellAndSpan,
}

impl ItemConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all state so the configuration can be repopulated for another
    /// span candidate.
    pub fn reset(&mut self) {
        self.map.clear();
        self.saved.clear();
        self.sorted_items.clear();
        self.intersecting.clear();
        self.is_solution = false;
        self.placement = CellAndSpan::default();
    }

    /// Register an item with its working placement.
    pub fn add(&mut self, id: ItemId, cell: CellAndSpan) {
        self.map.insert(id, cell);
        self.saved.insert(id, CellAndSpan::default());
        self.sorted_items.push(id);
    }

    /// Checkpoint the current working placements.
    pub fn save(&mut self) {
        for (id, cell) in &self.map {
            if let Some(slot) = self.saved.get_mut(id) {
                *slot = *cell;
            }
        }
    }

    /// Roll the working placements back to the last checkpoint.
    pub fn restore(&mut self) {
        for (id, cell) in &self.saved {
            if let Some(slot) = self.map.get_mut(id) {
                *slot = *cell;
            }
        }
    }

    /// Area of the subject placement, in cells.
    pub fn area(&self) -> i32 {
        self.placement.area()
    }

    /// Bounding rectangle over a group of items' working placements.
    ///
    /// Returns an empty rectangle for an empty group.
    pub fn bounding_rect(&self, items: &[ItemId]) -> GridRect {
        let mut out = GridRect::default();
        let mut first = true;
        for id in items {
            if let Some(c) = self.map.get(id) {
                if first {
                    out = c.rect();
                    first = false;
                } else {
                    out = out.union(&c.rect());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_round_trips() {
        let mut config = ItemConfiguration::new();
        config.add(ItemId::new(1), CellAndSpan::new(0, 0, 1, 1));
        config.add(ItemId::new(2), CellAndSpan::new(2, 2, 2, 1));
        config.save();

        config.map.get_mut(&ItemId::new(1)).unwrap().cell_x = 3;
        config.map.get_mut(&ItemId::new(2)).unwrap().cell_y = 0;
        config.restore();

        assert_eq!(config.map[&ItemId::new(1)], CellAndSpan::new(0, 0, 1, 1));
        assert_eq!(config.map[&ItemId::new(2)], CellAndSpan::new(2, 2, 2, 1));
    }

    #[test]
    fn bounding_rect_unions_members() {
        let mut config = ItemConfiguration::new();
        let a = ItemId::new(1);
        let b = ItemId::new(2);
        config.add(a, CellAndSpan::new(0, 0, 1, 1));
        config.add(b, CellAndSpan::new(3, 2, 2, 2));
        assert_eq!(config.bounding_rect(&[a, b]), GridRect::new(0, 0, 5, 4));
        assert_eq!(config.bounding_rect(&[a]), GridRect::new(0, 0, 1, 1));
    }

    #[test]
    fn area_tracks_subject_placement() {
        let mut config = ItemConfiguration::new();
        assert_eq!(config.area(), 0);
        config.placement = CellAndSpan::new(0, 0, 3, 2);
        assert_eq!(config.area(), 6);
    }
}
