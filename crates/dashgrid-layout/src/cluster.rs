#![forbid(unsafe_code)]

//! Rigid-body grouping of colliding items for the push pass.

use bitflags::bitflags;
use dashgrid_core::{GridRect, ItemId};

use crate::solution::ItemConfiguration;

/// One cardinal edge of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

impl Edge {
    const fn flag(self) -> EdgeSet {
        match self {
            Edge::Left => EdgeSet::LEFT,
            Edge::Top => EdgeSet::TOP,
            Edge::Right => EdgeSet::RIGHT,
            Edge::Bottom => EdgeSet::BOTTOM,
        }
    }
}

bitflags! {
    /// Set of edges whose profiles need recomputation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct EdgeSet: u8 {
        const LEFT = 1 << 0;
        const TOP = 1 << 1;
        const RIGHT = 1 << 2;
        const BOTTOM = 1 << 3;
    }
}

/// A set of items treated as one rigid body while it is pushed in a cardinal
/// direction.
///
/// The cluster maintains, lazily and per direction, an edge profile: for the
/// left/right edges one column index per grid row reached by any member
/// occupying that row, and symmetrically per column for top/bottom. The
/// profile is a fine-grained boundary, more precise than the bounding box,
/// and drives the contact test that sweeps further items into the cluster as
/// it advances.
#[derive(Debug)]
pub(crate) struct ItemCluster {
    pub items: Vec<ItemId>,
    left_edge: Vec<i32>,
    right_edge: Vec<i32>,
    top_edge: Vec<i32>,
    bottom_edge: Vec<i32>,
    dirty_edges: EdgeSet,
    bounding: GridRect,
    bounding_dirty: bool,
}

impl ItemCluster {
    pub fn new(items: Vec<ItemId>, count_x: i32, count_y: i32) -> Self {
        let mut cluster = Self {
            items,
            left_edge: vec![-1; count_y as usize],
            right_edge: vec![-1; count_y as usize],
            top_edge: vec![-1; count_x as usize],
            bottom_edge: vec![-1; count_x as usize],
            dirty_edges: EdgeSet::all(),
            bounding: GridRect::default(),
            bounding_dirty: true,
        };
        cluster.reset_edges();
        cluster
    }

    fn reset_edges(&mut self) {
        self.left_edge.fill(-1);
        self.right_edge.fill(-1);
        self.top_edge.fill(-1);
        self.bottom_edge.fill(-1);
        self.dirty_edges = EdgeSet::all();
        self.bounding_dirty = true;
    }

    fn compute_edge(&mut self, edge: Edge, config: &ItemConfiguration) {
        for id in &self.items {
            let Some(cs) = config.map.get(id) else {
                continue;
            };
            match edge {
                Edge::Left => {
                    let left = cs.cell_x;
                    for j in cs.cell_y..cs.cell_y + cs.span_y {
                        let Some(slot) = usize::try_from(j).ok().and_then(|j| self.left_edge.get_mut(j))
                        else {
                            continue;
                        };
                        if left < *slot || *slot < 0 {
                            *slot = left;
                        }
                    }
                }
                Edge::Right => {
                    let right = cs.cell_x + cs.span_x;
                    for j in cs.cell_y..cs.cell_y + cs.span_y {
                        let Some(slot) = usize::try_from(j).ok().and_then(|j| self.right_edge.get_mut(j))
                        else {
                            continue;
                        };
                        if right > *slot {
                            *slot = right;
                        }
                    }
                }
                Edge::Top => {
                    let top = cs.cell_y;
                    for j in cs.cell_x..cs.cell_x + cs.span_x {
                        let Some(slot) = usize::try_from(j).ok().and_then(|j| self.top_edge.get_mut(j))
                        else {
                            continue;
                        };
                        if top < *slot || *slot < 0 {
                            *slot = top;
                        }
                    }
                }
                Edge::Bottom => {
                    let bottom = cs.cell_y + cs.span_y;
                    for j in cs.cell_x..cs.cell_x + cs.span_x {
                        let Some(slot) = usize::try_from(j).ok().and_then(|j| self.bottom_edge.get_mut(j))
                        else {
                            continue;
                        };
                        if bottom > *slot {
                            *slot = bottom;
                        }
                    }
                }
            }
        }
    }

    /// Whether a non-member item's opposing boundary exactly abuts the
    /// cluster's leading edge on some row/column the item occupies.
    pub fn is_item_touching_edge(
        &mut self,
        id: ItemId,
        edge: Edge,
        config: &ItemConfiguration,
    ) -> bool {
        let Some(cs) = config.map.get(&id).copied() else {
            return false;
        };

        if self.dirty_edges.contains(edge.flag()) {
            self.compute_edge(edge, config);
            self.dirty_edges.remove(edge.flag());
        }

        match edge {
            Edge::Left => (cs.cell_y..cs.cell_y + cs.span_y).any(|i| {
                usize::try_from(i)
                    .ok()
                    .and_then(|i| self.left_edge.get(i))
                    .is_some_and(|&e| e == cs.cell_x + cs.span_x)
            }),
            Edge::Right => (cs.cell_y..cs.cell_y + cs.span_y).any(|i| {
                usize::try_from(i)
                    .ok()
                    .and_then(|i| self.right_edge.get(i))
                    .is_some_and(|&e| e == cs.cell_x)
            }),
            Edge::Top => (cs.cell_x..cs.cell_x + cs.span_x).any(|i| {
                usize::try_from(i)
                    .ok()
                    .and_then(|i| self.top_edge.get(i))
                    .is_some_and(|&e| e == cs.cell_y + cs.span_y)
            }),
            Edge::Bottom => (cs.cell_x..cs.cell_x + cs.span_x).any(|i| {
                usize::try_from(i)
                    .ok()
                    .and_then(|i| self.bottom_edge.get(i))
                    .is_some_and(|&e| e == cs.cell_y)
            }),
        }
    }

    /// Move every member one or more cells along the push axis, toward the
    /// leading edge.
    pub fn shift(&mut self, edge: Edge, delta: i32, config: &mut ItemConfiguration) {
        for id in &self.items {
            let Some(c) = config.map.get_mut(id) else {
                continue;
            };
            match edge {
                Edge::Left => c.cell_x -= delta,
                Edge::Right => c.cell_x += delta,
                Edge::Top => c.cell_y -= delta,
                Edge::Bottom => c.cell_y += delta,
            }
        }
        self.reset_edges();
    }

    /// Absorb another item into the cluster.
    pub fn add_item(&mut self, id: ItemId) {
        self.items.push(id);
        self.reset_edges();
    }

    /// Bounding rectangle over the members' working placements, cached until
    /// the cluster mutates.
    pub fn bounding_rect(&mut self, config: &ItemConfiguration) -> GridRect {
        if self.bounding_dirty {
            self.bounding = config.bounding_rect(&self.items);
            self.bounding_dirty = false;
        }
        self.bounding
    }

    /// Re-sort the configuration's processing order for a push leading with
    /// `edge`: items whose trailing edge is farthest from the push origin
    /// come first, so contact checks proceed from the pushed frontier
    /// outward.
    pub fn sort_for_edge_push(&self, edge: Edge, config: &mut ItemConfiguration) {
        let mut items = std::mem::take(&mut config.sorted_items);
        items.sort_by(|l, r| {
            let lc = config.map[l];
            let rc = config.map[r];
            match edge {
                Edge::Left => (rc.cell_x + rc.span_x).cmp(&(lc.cell_x + lc.span_x)),
                Edge::Right => lc.cell_x.cmp(&rc.cell_x),
                Edge::Top => (rc.cell_y + rc.span_y).cmp(&(lc.cell_y + lc.span_y)),
                Edge::Bottom => lc.cell_y.cmp(&rc.cell_y),
            }
        });
        config.sorted_items = items;
    }
}
