#![forbid(unsafe_code)]

//! The placement/reorder engine.
//!
//! [`CellGrid`] owns the authoritative occupancy for one launcher screen and
//! answers every placement question a drag-drop controller can ask: where a
//! dragged item should land, which neighbors must move out of the way, and
//! what the grid looks like if the drop is committed.
//!
//! A reorder never mutates authoritative state mid-search. Each attempt
//! works on a scratch [`ItemConfiguration`] guarded by a mirrored scratch
//! occupancy; the chosen configuration is first projected into temporary
//! coordinates (what rendering shows during the drag) and only promoted to
//! permanent coordinates, atomically, when the drop commits.

use dashgrid_core::{CellAndSpan, GridConfig, GridRect, ItemId, ItemSpec};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::cluster::{Edge, ItemCluster};
use crate::occupancy::GridOccupancy;
use crate::solution::ItemConfiguration;

/// What a reorder call is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReorderMode {
    /// Compute hint-animation targets only; no state changes.
    Hint,
    /// Provisionally apply the solution to temporary coordinates.
    DragOver,
    /// Commit the solution to permanent coordinates and occupancy.
    Drop,
    /// Commit for an item arriving from outside this grid.
    DropExternal,
    /// Report whether a solution exists; touch nothing.
    AcceptDrop,
}

/// A direction hint quantized to `{-1, 0, 1}` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DirectionVector {
    pub x: i32,
    pub y: i32,
}

impl DirectionVector {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    #[must_use]
    pub const fn negated(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }

    #[inline]
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }
}

/// One item's animation target: where it sits now and where the chosen
/// solution sends it. The engine supplies these as data; it never animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemMove {
    pub id: ItemId,
    pub from: CellAndSpan,
    pub to: CellAndSpan,
}

/// Outcome of a reorder request.
///
/// `(-1, -1)` cells with `found == false` is the "no solution" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderResult {
    pub cell_x: i32,
    pub cell_y: i32,
    pub span_x: i32,
    pub span_y: i32,
    pub found: bool,
    /// Displaced items and their targets, for the host's animations.
    pub moves: Vec<ItemMove>,
}

impl ReorderResult {
    fn not_found() -> Self {
        Self {
            cell_x: -1,
            cell_y: -1,
            span_x: -1,
            span_y: -1,
            found: false,
            moves: Vec::new(),
        }
    }

    fn solved(placement: CellAndSpan, moves: Vec<ItemMove>) -> Self {
        Self {
            cell_x: placement.cell_x,
            cell_y: placement.cell_y,
            span_x: placement.span_x,
            span_y: placement.span_y,
            found: true,
            moves,
        }
    }

    /// The solved anchor, if one was found.
    #[inline]
    pub fn cell(&self) -> Option<(i32, i32)> {
        self.found.then_some((self.cell_x, self.cell_y))
    }
}

/// Quantize a continuous delta to a direction vector using the angle
/// `atan(dy/dx)`: the X component is `sign(dx)` iff `|cos| > 0.5`, the Y
/// component is `sign(dy)` iff `|sin| > 0.5`.
///
/// The rule is deliberately reproduced as specified rather than via
/// rounding: at 45 degrees both components are set, and a zero delta (NaN
/// angle) quantizes to `(0, 0)`.
pub fn compute_direction_vector(delta_x: f32, delta_y: f32) -> DirectionVector {
    let angle = f64::from(delta_y / delta_x).atan();
    let mut result = DirectionVector::ZERO;
    if angle.cos().abs() > 0.5 {
        result.x = int_sign(delta_x);
    }
    if angle.sin().abs() > 0.5 {
        result.y = int_sign(delta_y);
    }
    result
}

/// Sign with a true zero (unlike `f32::signum`, which maps `0.0` to `1.0`).
/// NaN maps to zero.
fn int_sign(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy)]
struct PlacedItem {
    /// Committed placement.
    cell: CellAndSpan,
    /// Provisional placement staged by an in-flight reorder. The solver may
    /// shrink the span here; nothing reaches `cell` until a commit.
    tmp: CellAndSpan,
    reorderable: bool,
}

/// Grid occupancy and item-placement/reorder engine for one launcher screen.
///
/// Single-threaded and synchronous: every operation is a bounded computation
/// over at most `count_x * count_y` anchors, and scratch state is owned
/// exclusively by the in-flight call. Cancellation is a revert; an aborted
/// drag never leaves authoritative occupancy partially mutated.
#[derive(Debug)]
pub struct CellGrid {
    config: GridConfig,
    occupied: GridOccupancy,
    tmp_occupied: GridOccupancy,
    items: FxHashMap<ItemId, PlacedItem>,
    /// Insertion order; drives deterministic iteration everywhere the
    /// solver walks "all items".
    order: Vec<ItemId>,
    /// Direction computed during drag-over, reused on drop so the committed
    /// solution matches the preview.
    previous_reorder_direction: Option<DirectionVector>,
    use_temp_coords: bool,
    item_placement_dirty: bool,
    dragging: bool,
}

impl CellGrid {
    /// Create an empty grid for the given configuration.
    pub fn new(config: GridConfig) -> Self {
        Self {
            occupied: GridOccupancy::new(config.count_x(), config.count_y()),
            tmp_occupied: GridOccupancy::new(config.count_x(), config.count_y()),
            config,
            items: FxHashMap::default(),
            order: Vec::new(),
            previous_reorder_direction: None,
            use_temp_coords: false,
            item_placement_dirty: false,
            dragging: false,
        }
    }

    #[inline]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    #[inline]
    pub const fn count_x(&self) -> i32 {
        self.config.count_x()
    }

    #[inline]
    pub const fn count_y(&self) -> i32 {
        self.config.count_y()
    }

    /// Resize the grid. Occupancy is rebuilt empty; the host re-marks items
    /// when it reloads the screen. Panics on a grid smaller than 1x1.
    pub fn set_grid_size(&mut self, count_x: i32, count_y: i32) {
        self.config = self.config.resized(count_x, count_y);
        self.occupied = GridOccupancy::new(count_x, count_y);
        self.tmp_occupied = GridOccupancy::new(count_x, count_y);
    }

    /// Change the pixel size of a cell. Panics on a cell smaller than 1x1 px.
    pub fn set_cell_dimensions(&mut self, cell_width: i32, cell_height: i32) {
        self.config = self.config.with_cell_dimensions(cell_width, cell_height);
    }

    // ─── Item registry ───────────────────────────────────────────────────

    /// Register an item at a committed placement.
    ///
    /// Spans of `-1` mean "the full extent of the grid". Returns false when
    /// the anchor lies outside the grid or the id is already present.
    pub fn add_item(
        &mut self,
        id: ItemId,
        mut cell: CellAndSpan,
        reorderable: bool,
        mark_cells: bool,
    ) -> bool {
        if self.items.contains_key(&id) {
            return false;
        }
        if cell.cell_x < 0
            || cell.cell_x > self.count_x() - 1
            || cell.cell_y < 0
            || cell.cell_y > self.count_y() - 1
        {
            return false;
        }
        if cell.span_x < 0 {
            cell.span_x = self.count_x();
        }
        if cell.span_y < 0 {
            cell.span_y = self.count_y();
        }
        self.items.insert(
            id,
            PlacedItem {
                cell,
                tmp: cell,
                reorderable,
            },
        );
        self.order.push(id);
        if mark_cells {
            self.occupied.mark_cell_span(&cell, true);
        }
        true
    }

    /// Remove an item, releasing its committed cells.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let Some(item) = self.items.remove(&id) else {
            return false;
        };
        self.occupied.mark_cell_span(&item.cell, false);
        self.order.retain(|&v| v != id);
        true
    }

    /// Remove every item and clear the occupancy.
    pub fn remove_all_items(&mut self) {
        self.items.clear();
        self.order.clear();
        self.occupied.clear();
    }

    /// Mark an item's committed cells occupied (initial load path).
    pub fn mark_cells_occupied(&mut self, id: ItemId) {
        if let Some(item) = self.items.get(&id) {
            let cell = item.cell;
            self.occupied.mark_cell_span(&cell, true);
        }
    }

    /// Mark an item's committed cells unoccupied.
    pub fn mark_cells_unoccupied(&mut self, id: ItemId) {
        if let Some(item) = self.items.get(&id) {
            let cell = item.cell;
            self.occupied.mark_cell_span(&cell, false);
        }
    }

    /// Committed placement of an item.
    pub fn item_cell(&self, id: ItemId) -> Option<CellAndSpan> {
        self.items.get(&id).map(|i| i.cell)
    }

    /// Temporary placement of an item (valid while a reorder is in flight).
    pub fn item_temp_cell(&self, id: ItemId) -> Option<CellAndSpan> {
        self.items.get(&id).map(|i| i.tmp)
    }

    /// The placement rendering should use right now: temporary coordinates
    /// during a reorder, committed coordinates otherwise.
    pub fn item_render_cell(&self, id: ItemId) -> Option<CellAndSpan> {
        self.items.get(&id).map(|i| {
            if self.use_temp_coords {
                i.tmp
            } else {
                i.cell
            }
        })
    }

    /// Item handles in insertion order.
    pub fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.order.iter().copied()
    }

    pub fn item_count(&self) -> usize {
        self.order.len()
    }

    // ─── Occupancy queries ───────────────────────────────────────────────

    /// First-fit anchor for a span, or `None` when the grid is too full.
    pub fn find_cell_for_span(&self, span_x: i32, span_y: i32) -> Option<(i32, i32)> {
        self.occupied.find_vacant_cell(span_x, span_y)
    }

    /// Whether any single cell is still free.
    pub fn exists_empty_cell(&self) -> bool {
        self.find_cell_for_span(1, 1).is_some()
    }

    pub fn is_region_vacant(&self, x: i32, y: i32, span_x: i32, span_y: i32) -> bool {
        self.occupied.is_region_vacant(x, y, span_x, span_y)
    }

    /// Whether a cell is occupied. Panics when the cell lies outside the
    /// grid; asking about a nonexistent cell is a host programming error.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        assert!(
            x >= 0 && x < self.count_x() && y >= 0 && y < self.count_y(),
            "cell ({x}, {y}) exceeds the bounds of this grid"
        );
        self.occupied.is_set(x, y)
    }

    /// Snapshot of the authoritative occupancy (migration checks).
    pub fn clone_grid_occupancy(&self) -> GridOccupancy {
        self.occupied.clone()
    }

    // ─── Drag session ────────────────────────────────────────────────────

    /// A drag has entered this grid.
    pub fn on_drag_enter(&mut self) {
        self.dragging = true;
    }

    /// The drag left this grid or completed. Reverts temporary state and
    /// returns the items that must animate home.
    pub fn on_drag_exit(&mut self) -> Vec<ItemMove> {
        self.dragging = false;
        self.revert_temp_state()
    }

    #[inline]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Toggle whether rendering should read temporary coordinates.
    pub fn set_use_temp_coords(&mut self, use_temp: bool) {
        self.use_temp_coords = use_temp;
    }

    #[inline]
    pub const fn using_temp_coords(&self) -> bool {
        self.use_temp_coords
    }

    /// Discard temporary coordinates, restoring every item to its committed
    /// placement. Idempotent; authoritative occupancy is never touched by a
    /// preview, so there is nothing else to undo.
    pub fn revert_temp_state(&mut self) -> Vec<ItemMove> {
        let mut moves = Vec::new();
        if !self.item_placement_dirty {
            return moves;
        }
        for i in 0..self.order.len() {
            let id = self.order[i];
            let Some(item) = self.items.get_mut(&id) else {
                continue;
            };
            if item.tmp != item.cell {
                moves.push(ItemMove {
                    id,
                    from: item.tmp,
                    to: item.cell,
                });
                item.tmp = item.cell;
            }
        }
        self.item_placement_dirty = false;
        moves
    }

    // ─── Nearest-area searches ───────────────────────────────────────────

    /// Nearest anchor for a span around a pixel point, ignoring occupancy.
    /// This is the candidate anchor a drag is aiming at.
    pub fn find_nearest_anchor(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        span_x: i32,
        span_y: i32,
    ) -> Option<(i32, i32)> {
        self.find_nearest_area(pixel_x, pixel_y, span_x, span_y, span_x, span_y, false)
            .0
    }

    /// Nearest fully vacant area for a span around a pixel point, growing
    /// from the minimum span toward the requested span. Returns the anchor
    /// and the fitted span.
    pub fn find_nearest_vacant_area(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        min_span_x: i32,
        min_span_y: i32,
        span_x: i32,
        span_y: i32,
    ) -> Option<CellAndSpan> {
        let (cell, (fit_x, fit_y)) = self.find_nearest_area(
            pixel_x, pixel_y, min_span_x, min_span_y, span_x, span_y, true,
        );
        cell.map(|(x, y)| CellAndSpan::new(x, y, fit_x, fit_y))
    }

    /// Whether the nearest drop anchor currently collides with any item.
    pub fn is_nearest_drop_location_occupied(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        span_x: i32,
        span_y: i32,
        drag_item: Option<ItemId>,
    ) -> bool {
        match self.find_nearest_anchor(pixel_x, pixel_y, span_x, span_y) {
            Some((x, y)) => {
                !self
                    .items_intersecting_region(x, y, span_x, span_y, drag_item)
                    .1
                    .is_empty()
            }
            None => false,
        }
    }

    /// Pixel-anchored nearest-area scan.
    ///
    /// With `ignore_occupied` set, every anchor whose minimum-span block is
    /// collision-free is considered, and the fitted rectangle is grown
    /// alternately in X then Y toward the requested span, each axis stopping
    /// independently at a collision, the grid edge, or the request. Without
    /// it, every anchor is considered and only the distance score applies.
    ///
    /// Candidates are scored by Euclidean distance from the anchor cell's
    /// center to the span-offset-adjusted target pixel. A candidate that is
    /// a sub-rectangle of an already-accepted better candidate is
    /// disqualified; a candidate that contains the current best always wins,
    /// even when it is farther (preserved quirk, see DESIGN notes). Distance
    /// ties keep the first candidate in row-major scan order.
    fn find_nearest_area(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        min_span_x: i32,
        min_span_y: i32,
        span_x: i32,
        span_y: i32,
        ignore_occupied: bool,
    ) -> (Option<(i32, i32)>, (i32, i32)) {
        // The incoming point is the item's center; the scan works on
        // top-left anchors, so translate the target over.
        let pixel_x =
            (pixel_x as f32 - self.config.cell_width() as f32 * (span_x - 1) as f32 / 2.0) as i32;
        let pixel_y =
            (pixel_y as f32 - self.config.cell_height() as f32 * (span_y - 1) as f32 / 2.0) as i32;

        if min_span_x <= 0
            || min_span_y <= 0
            || span_x <= 0
            || span_y <= 0
            || span_x < min_span_x
            || span_y < min_span_y
        {
            return (None, (-1, -1));
        }

        let count_x = self.count_x();
        let count_y = self.count_y();
        if min_span_x > count_x || min_span_y > count_y {
            return (None, (-1, -1));
        }

        let mut best: Option<(i32, i32)> = None;
        let mut best_span = (-1, -1);
        let mut best_distance = f64::MAX;
        let mut best_rect = GridRect::new(-1, -1, -1, -1);
        let mut valid_regions: Vec<GridRect> = Vec::new();

        for y in 0..=count_y - min_span_y {
            'anchors: for x in 0..=count_x - min_span_x {
                let mut x_size = -1;
                let mut y_size = -1;
                if ignore_occupied {
                    // The minimum block must fit here at all.
                    for i in 0..min_span_x {
                        for j in 0..min_span_y {
                            if self.occupied.is_set(x + i, y + j) {
                                continue 'anchors;
                            }
                        }
                    }
                    x_size = min_span_x;
                    y_size = min_span_y;

                    // Grow toward the requested span, alternating axes, each
                    // axis stopping independently at a collision or edge.
                    let mut inc_x = true;
                    let mut hit_max_x = x_size >= span_x;
                    let mut hit_max_y = y_size >= span_y;
                    while !(hit_max_x && hit_max_y) {
                        if inc_x && !hit_max_x {
                            for j in 0..y_size {
                                if x + x_size > count_x - 1 || self.occupied.is_set(x + x_size, y + j)
                                {
                                    hit_max_x = true;
                                }
                            }
                            if !hit_max_x {
                                x_size += 1;
                            }
                        } else if !hit_max_y {
                            for i in 0..x_size {
                                if y + y_size > count_y - 1 || self.occupied.is_set(x + i, y + y_size)
                                {
                                    hit_max_y = true;
                                }
                            }
                            if !hit_max_y {
                                y_size += 1;
                            }
                        }
                        hit_max_x |= x_size >= span_x;
                        hit_max_y |= y_size >= span_y;
                        inc_x = !inc_x;
                    }
                }

                let (center_x, center_y) = self.config.cell_to_center_point(x, y);
                let current = GridRect::new(x, y, x + x_size, y + y_size);
                let contained = valid_regions.iter().any(|r| r.contains_rect(&current));
                valid_regions.push(current);

                let distance =
                    f64::from(center_x - pixel_x).hypot(f64::from(center_y - pixel_y));
                if (distance < best_distance && !contained) || current.contains_rect(&best_rect) {
                    best_distance = distance;
                    best = Some((x, y));
                    best_span = (x_size, y_size);
                    best_rect = current;
                }
            }
        }

        (best, best_span)
    }

    /// Cell-anchored directional scan over a supplied occupancy matrix.
    ///
    /// Scores by integer grid distance; ties are broken by the dot product
    /// between the requested direction and the candidate's own quantized
    /// direction, higher (more aligned) winning. `block_occupied` masks
    /// which cells of the moving block are solid, allowing interlocking
    /// group relocation.
    fn find_nearest_area_in_direction(
        &self,
        cell_x: i32,
        cell_y: i32,
        span_x: i32,
        span_y: i32,
        direction: DirectionVector,
        occupied: &GridOccupancy,
        block_occupied: Option<&GridOccupancy>,
    ) -> Option<(i32, i32)> {
        let count_x = self.count_x();
        let count_y = self.count_y();
        if span_x < 1 || span_y < 1 || span_x > count_x || span_y > count_y {
            return None;
        }

        let mut best: Option<(i32, i32)> = None;
        let mut best_distance = f32::MAX;
        let mut best_direction_score = i32::MIN;

        for y in 0..=count_y - span_y {
            'anchors: for x in 0..=count_x - span_x {
                for i in 0..span_x {
                    for j in 0..span_y {
                        if occupied.is_set(x + i, y + j)
                            && block_occupied.is_none_or(|b| b.is_set(i, j))
                        {
                            continue 'anchors;
                        }
                    }
                }

                let distance = ((x - cell_x) as f32).hypot((y - cell_y) as f32);
                let candidate = compute_direction_vector((x - cell_x) as f32, (y - cell_y) as f32);
                let score = direction.x * candidate.x + direction.y * candidate.y;
                match distance.total_cmp(&best_distance) {
                    std::cmp::Ordering::Less => {
                        best_distance = distance;
                        best_direction_score = score;
                        best = Some((x, y));
                    }
                    std::cmp::Ordering::Equal if score > best_direction_score => {
                        best_distance = distance;
                        best_direction_score = score;
                        best = Some((x, y));
                    }
                    _ => {}
                }
            }
        }

        best
    }

    // ─── Displacement strategies ─────────────────────────────────────────

    /// Relocate a single item out of the drop rectangle via the directional
    /// scan. The permissive last resort: displaced items are not rechecked
    /// against each other.
    fn add_item_to_temp_location(
        &mut self,
        id: ItemId,
        rect_occupied_by_drop: GridRect,
        direction: DirectionVector,
        state: &mut ItemConfiguration,
    ) -> bool {
        let Some(c) = state.map.get(&id).copied() else {
            return false;
        };
        self.tmp_occupied.mark_cell_span(&c, false);
        self.tmp_occupied.mark_rect(&rect_occupied_by_drop, true);

        let found = self.find_nearest_area_in_direction(
            c.cell_x,
            c.cell_y,
            c.span_x,
            c.span_y,
            direction,
            &self.tmp_occupied,
            None,
        );

        let mut success = false;
        let mut placed = c;
        if let Some((x, y)) = found {
            placed.cell_x = x;
            placed.cell_y = y;
            if let Some(slot) = state.map.get_mut(&id) {
                *slot = placed;
            }
            success = true;
        }
        self.tmp_occupied.mark_cell_span(&placed, true);
        success
    }

    /// Relocate the whole colliding set as one non-deformable block.
    fn add_items_to_temp_location(
        &mut self,
        items: &[ItemId],
        rect_occupied_by_drop: GridRect,
        direction: DirectionVector,
        state: &mut ItemConfiguration,
    ) -> bool {
        if items.is_empty() {
            return true;
        }

        let bounding = state.bounding_rect(items);
        for id in items {
            if let Some(c) = state.map.get(id).copied() {
                self.tmp_occupied.mark_cell_span(&c, false);
            }
        }

        // Mark precisely which cells of the bounding rect are solid so the
        // block can interlock with the drop rectangle.
        let mut block = GridOccupancy::new(bounding.width(), bounding.height());
        for id in items {
            if let Some(c) = state.map.get(id) {
                block.mark_cells(
                    c.cell_x - bounding.left,
                    c.cell_y - bounding.top,
                    c.span_x,
                    c.span_y,
                    true,
                );
            }
        }

        self.tmp_occupied.mark_rect(&rect_occupied_by_drop, true);

        let found = self.find_nearest_area_in_direction(
            bounding.left,
            bounding.top,
            bounding.width(),
            bounding.height(),
            direction,
            &self.tmp_occupied,
            Some(&block),
        );

        let mut success = false;
        if let Some((x, y)) = found {
            let delta_x = x - bounding.left;
            let delta_y = y - bounding.top;
            for id in items {
                if let Some(c) = state.map.get_mut(id) {
                    c.cell_x += delta_x;
                    c.cell_y += delta_y;
                }
            }
            success = true;
        }

        for id in items {
            if let Some(c) = state.map.get(id).copied() {
                self.tmp_occupied.mark_cell_span(&c, true);
            }
        }
        success
    }

    /// Push the colliding items as a rigid cluster one cell at a time along
    /// one cardinal direction, sweeping up items the advancing edge touches.
    fn push_items_to_temp_location(
        &mut self,
        items: &[ItemId],
        rect_occupied_by_drop: GridRect,
        direction: DirectionVector,
        drag_item: Option<ItemId>,
        state: &mut ItemConfiguration,
    ) -> bool {
        let mut cluster = ItemCluster::new(items.to_vec(), self.count_x(), self.count_y());
        let cluster_rect = cluster.bounding_rect(state);

        // The leading edge and how far the cluster must travel for its
        // current bounds to clear the drop rectangle.
        let (edge, mut push_distance) = if direction.x < 0 {
            (Edge::Left, cluster_rect.right - rect_occupied_by_drop.left)
        } else if direction.x > 0 {
            (Edge::Right, rect_occupied_by_drop.right - cluster_rect.left)
        } else if direction.y < 0 {
            (Edge::Top, cluster_rect.bottom - rect_occupied_by_drop.top)
        } else {
            (Edge::Bottom, rect_occupied_by_drop.bottom - cluster_rect.top)
        };

        if push_distance <= 0 {
            return false;
        }

        for id in items {
            if let Some(c) = state.map.get(id).copied() {
                self.tmp_occupied.mark_cell_span(&c, false);
            }
        }

        // Finding a solution mutates the configuration in place; checkpoint
        // so a failed push can roll back.
        state.save();
        cluster.sort_for_edge_push(edge, state);
        let mut fail = false;

        while push_distance > 0 && !fail {
            // Sweep: any non-member the leading edge currently touches joins
            // the cluster before this unit of travel.
            for idx in 0..state.sorted_items.len() {
                let v = state.sorted_items[idx];
                if cluster.items.contains(&v) || Some(v) == drag_item {
                    continue;
                }
                if cluster.is_item_touching_edge(v, edge, state) {
                    if !self.items.get(&v).is_some_and(|item| item.reorderable) {
                        // The push would displace a protected item; the whole
                        // direction is not viable.
                        fail = true;
                        break;
                    }
                    cluster.add_item(v);
                    if let Some(c) = state.map.get(&v).copied() {
                        self.tmp_occupied.mark_cell_span(&c, false);
                    }
                }
            }
            push_distance -= 1;
            cluster.shift(edge, 1, state);
        }

        // The only validity check needed after the travel: the finished
        // cluster must lie entirely inside the grid.
        let cluster_rect = cluster.bounding_rect(state);
        let found_solution = !fail
            && cluster_rect.left >= 0
            && cluster_rect.right <= self.count_x()
            && cluster_rect.top >= 0
            && cluster_rect.bottom <= self.count_y();

        if !found_solution {
            state.restore();
        }

        // Either way, re-mark the cluster members where they now stand.
        for id in &cluster.items {
            if let Some(c) = state.map.get(id).copied() {
                self.tmp_occupied.mark_cell_span(&c, true);
            }
        }

        found_solution
    }

    /// Try the push in a fixed order of directions derived from the hint
    /// vector. The ordering decides which of several valid displacement
    /// solutions wins and is part of the engine's observable contract.
    fn attempt_push_in_direction(
        &mut self,
        intersecting: &[ItemId],
        rect_occupied_by_drop: GridRect,
        direction: DirectionVector,
        drag_item: Option<ItemId>,
        state: &mut ItemConfiguration,
    ) -> bool {
        let tries = if direction.x.abs() + direction.y.abs() > 1 {
            // Two non-zero components: each component alone, then each
            // component of the negated vector.
            [
                DirectionVector::new(direction.x, 0),
                DirectionVector::new(0, direction.y),
                DirectionVector::new(-direction.x, 0),
                DirectionVector::new(0, -direction.y),
            ]
        } else {
            // Single axis: the hint, its opposite, then the perpendicular
            // axis and its opposite.
            [
                direction,
                direction.negated(),
                direction.swapped(),
                direction.swapped().negated(),
            ]
        };

        tries.into_iter().any(|d| {
            self.push_items_to_temp_location(intersecting, rect_occupied_by_drop, d, drag_item, state)
        })
    }

    /// Whether the items colliding with the target rectangle can be moved
    /// out of the way: push first, then block relocation, then individual
    /// relocation, short-circuiting on the first success.
    fn rearrangement_exists(
        &mut self,
        cell_x: i32,
        cell_y: i32,
        span_x: i32,
        span_y: i32,
        direction: DirectionVector,
        drag_item: Option<ItemId>,
        solution: &mut ItemConfiguration,
    ) -> bool {
        if cell_x < 0 || cell_y < 0 {
            return false;
        }

        let occupied_rect = GridRect::from_cell_span(cell_x, cell_y, span_x, span_y);

        // Stage the dragged item at the target so the strategies see it.
        if let Some(drag) = drag_item {
            if let Some(c) = solution.map.get_mut(&drag) {
                c.cell_x = cell_x;
                c.cell_y = cell_y;
            }
        }

        let mut intersecting = Vec::new();
        for i in 0..self.order.len() {
            let id = self.order[i];
            if Some(id) == drag_item {
                continue;
            }
            let Some(c) = solution.map.get(&id) else {
                continue;
            };
            if occupied_rect.intersects(&c.rect()) {
                if !self.items.get(&id).is_some_and(|item| item.reorderable) {
                    return false;
                }
                intersecting.push(id);
            }
        }
        solution.intersecting = intersecting.clone();

        if self.attempt_push_in_direction(
            &intersecting,
            occupied_rect,
            direction,
            drag_item,
            solution,
        ) {
            return true;
        }

        if self.add_items_to_temp_location(&intersecting, occupied_rect, direction, solution) {
            return true;
        }

        for &id in &intersecting {
            if !self.add_item_to_temp_location(id, occupied_rect, direction, solution) {
                return false;
            }
        }
        true
    }

    // ─── Solution selection ──────────────────────────────────────────────

    /// Find a displacement solution at the nearest anchor, shrinking the
    /// span one unit at a time (alternating X and Y, never below the
    /// minimums) until an arrangement exists or no candidate remains.
    fn find_reorder_solution(
        &mut self,
        pixel_x: i32,
        pixel_y: i32,
        min_span_x: i32,
        min_span_y: i32,
        span_x: i32,
        span_y: i32,
        direction: DirectionVector,
        drag_item: Option<ItemId>,
        solution: &mut ItemConfiguration,
    ) {
        // Reject malformed requests before building candidates; the
        // per-candidate anchor search only ever sees min == span and would
        // not catch a minimum above the requested span.
        if min_span_x <= 0
            || min_span_y <= 0
            || span_x < min_span_x
            || span_y < min_span_y
            || min_span_x > self.count_x()
            || min_span_y > self.count_y()
        {
            solution.is_solution = false;
            return;
        }

        // Candidate spans in shrink order.
        let mut candidates = Vec::new();
        let (mut sx, mut sy, mut dec_x) = (span_x, span_y, true);
        loop {
            candidates.push((sx, sy));
            if sx > min_span_x && (min_span_y == sy || dec_x) {
                sx -= 1;
                dec_x = false;
            } else if sy > min_span_y {
                sy -= 1;
                dec_x = true;
            } else {
                break;
            }
        }

        for (sx, sy) in candidates {
            // Fresh scratch state per candidate: the working configuration
            // mirrors committed placements and the scratch occupancy mirrors
            // the authoritative grid.
            self.copy_current_state_to_solution(solution);
            self.occupied.copy_to(&mut self.tmp_occupied);

            let (anchor_x, anchor_y) = self
                .find_nearest_area(pixel_x, pixel_y, sx, sy, sx, sy, false)
                .0
                .unwrap_or((-1, -1));

            if self.rearrangement_exists(
                anchor_x, anchor_y, sx, sy, direction, drag_item, solution,
            ) {
                solution.is_solution = true;
                solution.placement = CellAndSpan::new(anchor_x, anchor_y, sx, sy);
                return;
            }
        }
        solution.is_solution = false;
    }

    fn copy_current_state_to_solution(&self, solution: &mut ItemConfiguration) {
        solution.reset();
        for &id in &self.order {
            if let Some(item) = self.items.get(&id) {
                solution.add(id, item.cell);
            }
        }
    }

    /// Placement into a fully vacant area, disturbing nothing.
    fn find_configuration_no_shuffle(
        &self,
        pixel_x: i32,
        pixel_y: i32,
        min_span_x: i32,
        min_span_y: i32,
        span_x: i32,
        span_y: i32,
        solution: &mut ItemConfiguration,
    ) {
        let (cell, (fit_x, fit_y)) = self.find_nearest_area(
            pixel_x, pixel_y, min_span_x, min_span_y, span_x, span_y, true,
        );
        if let Some((x, y)) = cell {
            self.copy_current_state_to_solution(solution);
            solution.placement = CellAndSpan::new(x, y, fit_x, fit_y);
            solution.is_solution = true;
        } else {
            solution.is_solution = false;
        }
    }

    /// Infer the preferred displacement direction from how far the drop
    /// point sits from the center of the region it collides with.
    fn get_direction_vector_for_drop(
        &self,
        drag_center_x: i32,
        drag_center_y: i32,
        span_x: i32,
        span_y: i32,
        drag_item: Option<ItemId>,
    ) -> DirectionVector {
        let Some((target_x, target_y)) =
            self.find_nearest_anchor(drag_center_x, drag_center_y, span_x, span_y)
        else {
            return DirectionVector::new(1, 0);
        };

        let (drop_region, _) =
            self.items_intersecting_region(target_x, target_y, span_x, span_y, drag_item);
        let drop_region_span_x = drop_region.width();
        let drop_region_span_y = drop_region.height();
        let region_px = self.config.region_to_rect(
            drop_region.left,
            drop_region.top,
            drop_region_span_x,
            drop_region_span_y,
        );

        let mut delta_x = (region_px.center_x() - drag_center_x) / span_x;
        let mut delta_y = (region_px.center_y() - drag_center_y) / span_y;

        // An item or region spanning the whole axis cannot meaningfully be
        // pushed along it.
        if drop_region_span_x == self.count_x() || span_x == self.count_x() {
            delta_x = 0;
        }
        if drop_region_span_y == self.count_y() || span_y == self.count_y() {
            delta_y = 0;
        }

        if delta_x == 0 && delta_y == 0 {
            // Dead center over the region: fall back to an arbitrary fixed
            // direction.
            DirectionVector::new(1, 0)
        } else {
            compute_direction_vector(delta_x as f32, delta_y as f32)
        }
    }

    /// Items whose committed rectangles intersect the region, plus the
    /// bounding rectangle over the region and those items.
    fn items_intersecting_region(
        &self,
        cell_x: i32,
        cell_y: i32,
        span_x: i32,
        span_y: i32,
        drag_item: Option<ItemId>,
    ) -> (GridRect, Vec<ItemId>) {
        let r0 = GridRect::from_cell_span(cell_x, cell_y, span_x, span_y);
        let mut bounding = r0;
        let mut intersecting = Vec::new();
        for &id in &self.order {
            if Some(id) == drag_item {
                continue;
            }
            let Some(item) = self.items.get(&id) else {
                continue;
            };
            let r1 = item.cell.rect();
            if r0.intersects(&r1) {
                intersecting.push(id);
                bounding = bounding.union(&r1);
            }
        }
        (bounding, intersecting)
    }

    // ─── Temp/commit plumbing ────────────────────────────────────────────

    /// Project a solution into temporary coordinates and rebuild the scratch
    /// occupancy to match. Returns the animation targets for items that
    /// moved.
    fn copy_solution_to_temp_state(
        &mut self,
        solution: &ItemConfiguration,
        drag_item: Option<ItemId>,
    ) -> Vec<ItemMove> {
        self.tmp_occupied.clear();
        let mut moves = Vec::new();

        for i in 0..self.order.len() {
            let id = self.order[i];
            if Some(id) == drag_item {
                continue;
            }
            let Some(c) = solution.map.get(&id).copied() else {
                continue;
            };
            if let Some(item) = self.items.get_mut(&id) {
                if item.cell.cell_x != c.cell_x || item.cell.cell_y != c.cell_y {
                    moves.push(ItemMove {
                        id,
                        from: item.cell,
                        to: c,
                    });
                }
                item.tmp = c;
            }
            self.tmp_occupied.mark_cell_span(&c, true);
        }

        // The dragged item (when it lives in this grid) follows the subject
        // placement so a commit promotes everything uniformly.
        if let Some(drag) = drag_item {
            if let Some(item) = self.items.get_mut(&drag) {
                item.tmp = solution.placement;
            }
        }
        self.tmp_occupied.mark_cell_span(&solution.placement, true);

        moves
    }

    /// Promote temporary coordinates and the scratch occupancy into
    /// authoritative state.
    fn commit_temp_placement(&mut self) {
        self.tmp_occupied.copy_to(&mut self.occupied);
        for item in self.items.values_mut() {
            item.cell = item.tmp;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(items = self.order.len(), "grid placement committed");
    }

    /// Hint-animation targets: only the items that collided with the drop
    /// rectangle, and only those the solution actually moves.
    fn hint_moves(&self, solution: &ItemConfiguration, drag_item: Option<ItemId>) -> Vec<ItemMove> {
        let mut moves = Vec::new();
        for &id in &self.order {
            if Some(id) == drag_item {
                continue;
            }
            if !solution.intersecting.contains(&id) {
                continue;
            }
            let Some(c) = solution.map.get(&id) else {
                continue;
            };
            let Some(item) = self.items.get(&id) else {
                continue;
            };
            if item.cell.cell_x != c.cell_x || item.cell.cell_y != c.cell_y {
                moves.push(ItemMove {
                    id,
                    from: item.cell,
                    to: *c,
                });
            }
        }
        moves
    }

    // ─── Entry points ────────────────────────────────────────────────────

    /// The drag-time entry point: find where the dragged item lands and how
    /// the grid reacts, with `mode` selecting whether the call previews,
    /// provisionally applies, or commits the outcome.
    #[allow(clippy::too_many_arguments)]
    pub fn perform_reorder(
        &mut self,
        pixel_x: i32,
        pixel_y: i32,
        min_span_x: i32,
        min_span_y: i32,
        span_x: i32,
        span_y: i32,
        drag_item: Option<ItemId>,
        mode: ReorderMode,
    ) -> ReorderResult {
        // Drop and validity checks reuse the direction computed during
        // drag-over so the committed solution matches the preview even if
        // the pointer drifted.
        let direction = match (mode, self.previous_reorder_direction) {
            (
                ReorderMode::Drop | ReorderMode::DropExternal | ReorderMode::AcceptDrop,
                Some(previous),
            ) => {
                if matches!(mode, ReorderMode::Drop | ReorderMode::DropExternal) {
                    self.previous_reorder_direction = None;
                }
                previous
            }
            _ => {
                let d =
                    self.get_direction_vector_for_drop(pixel_x, pixel_y, span_x, span_y, drag_item);
                self.previous_reorder_direction = Some(d);
                d
            }
        };

        let mut swap_solution = ItemConfiguration::new();
        self.find_reorder_solution(
            pixel_x,
            pixel_y,
            min_span_x,
            min_span_y,
            span_x,
            span_y,
            direction,
            drag_item,
            &mut swap_solution,
        );

        let mut no_shuffle = ItemConfiguration::new();
        self.find_configuration_no_shuffle(
            pixel_x,
            pixel_y,
            min_span_x,
            min_span_y,
            span_x,
            span_y,
            &mut no_shuffle,
        );

        // Displacing neighbors must buy strictly more area than leaving them
        // alone; on equal area the undisturbed layout wins.
        let final_solution = if swap_solution.is_solution
            && swap_solution.area() > no_shuffle.area()
        {
            Some(&swap_solution)
        } else if no_shuffle.is_solution {
            Some(&no_shuffle)
        } else {
            None
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            ?mode,
            pixel_x,
            pixel_y,
            span_x,
            span_y,
            found = final_solution.is_some(),
            "reorder solved"
        );

        if mode == ReorderMode::Hint {
            return match final_solution {
                Some(sol) => {
                    let moves = self.hint_moves(sol, drag_item);
                    ReorderResult::solved(sol.placement, moves)
                }
                None => ReorderResult::not_found(),
            };
        }

        self.use_temp_coords = true;
        let result = if let Some(sol) = final_solution {
            let mut moves = Vec::new();
            if matches!(
                mode,
                ReorderMode::DragOver | ReorderMode::Drop | ReorderMode::DropExternal
            ) {
                moves = self.copy_solution_to_temp_state(sol, drag_item);
                self.item_placement_dirty = true;
                if matches!(mode, ReorderMode::Drop | ReorderMode::DropExternal) {
                    self.commit_temp_placement();
                    self.item_placement_dirty = false;
                }
            }
            ReorderResult::solved(sol.placement, moves)
        } else {
            ReorderResult::not_found()
        };

        if mode == ReorderMode::Drop || !result.found {
            self.use_temp_coords = false;
        }
        result
    }

    /// Resize-time entry point: make room for an item growing to
    /// `span_x x span_y` at the given anchor, using the same solver with the
    /// span fixed at both ends.
    pub fn create_area_for_resize(
        &mut self,
        cell_x: i32,
        cell_y: i32,
        span_x: i32,
        span_y: i32,
        drag_item: Option<ItemId>,
        direction: DirectionVector,
        commit: bool,
    ) -> bool {
        let (pixel_x, pixel_y) = self
            .config
            .region_to_center_point(cell_x, cell_y, span_x, span_y);

        let mut swap_solution = ItemConfiguration::new();
        self.find_reorder_solution(
            pixel_x,
            pixel_y,
            span_x,
            span_y,
            span_x,
            span_y,
            direction,
            drag_item,
            &mut swap_solution,
        );

        self.use_temp_coords = true;
        if swap_solution.is_solution {
            self.copy_solution_to_temp_state(&swap_solution, drag_item);
            self.item_placement_dirty = true;
            if commit {
                self.commit_temp_placement();
                self.item_placement_dirty = false;
            }
        }
        swap_solution.is_solution
    }

    /// Whether an item with this spec could be placed at all, rearranging
    /// and shrinking as needed. Tries every cell as a candidate anchor, so
    /// this runs the full solver `count_x * count_y` times; it is meant for
    /// rare migration checks, not the drag path.
    pub fn has_reorder_solution(&mut self, spec: &ItemSpec) -> bool {
        for cell_x in 0..self.count_x() {
            for cell_y in 0..self.count_y() {
                let (pixel_x, pixel_y) = self.config.cell_to_point(cell_x, cell_y);
                let mut solution = ItemConfiguration::new();
                self.find_reorder_solution(
                    pixel_x,
                    pixel_y,
                    spec.min_span_x,
                    spec.min_span_y,
                    spec.span_x,
                    spec.span_y,
                    DirectionVector::ZERO,
                    None,
                    &mut solution,
                );
                if solution.is_solution {
                    return true;
                }
            }
        }
        false
    }

    /// Clear the bottom row by pushing its occupants upward, making room
    /// for a migrating dock item. Commits the rearrangement when asked; the
    /// freed row itself stays unoccupied because nothing is placed yet.
    pub fn make_space_for_dock_migration(&mut self, commit: bool) -> bool {
        let (pixel_x, pixel_y) = self.config.cell_to_point(0, self.count_y());
        let direction = DirectionVector::new(0, -1);

        let mut configuration = ItemConfiguration::new();
        self.find_reorder_solution(
            pixel_x,
            pixel_y,
            self.count_x(),
            1,
            self.count_x(),
            1,
            direction,
            None,
            &mut configuration,
        );
        if !configuration.is_solution {
            return false;
        }
        if commit {
            self.copy_solution_to_temp_state(&configuration, None);
            self.commit_temp_placement();
            self.occupied
                .mark_cells(0, self.count_y() - 1, self.count_x(), 1, false);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashgrid_core::GridConfig;

    const CELL: i32 = 100;

    fn grid(count_x: i32, count_y: i32) -> CellGrid {
        CellGrid::new(GridConfig::new(count_x, count_y, CELL, CELL).unwrap())
    }

    fn id(raw: u64) -> ItemId {
        ItemId::new(raw)
    }

    fn cell_center(grid: &CellGrid, x: i32, y: i32) -> (i32, i32) {
        grid.config().cell_to_center_point(x, y)
    }

    #[test]
    fn direction_quantization_matches_contract() {
        assert_eq!(compute_direction_vector(10.0, 0.0), DirectionVector::new(1, 0));
        assert_eq!(compute_direction_vector(0.0, 10.0), DirectionVector::new(0, 1));
        assert_eq!(compute_direction_vector(10.0, 10.0), DirectionVector::new(1, 1));
        assert_eq!(compute_direction_vector(-10.0, 0.0), DirectionVector::new(-1, 0));
        assert_eq!(compute_direction_vector(0.0, -10.0), DirectionVector::new(0, -1));
        assert_eq!(compute_direction_vector(0.0, 0.0), DirectionVector::ZERO);
    }

    #[test]
    fn vacant_search_grows_alternately() {
        let mut g = grid(4, 4);
        // Occupy column 2 fully: a 2x2 request anchored at (0, 0) can still
        // grow to its full span in the left 2x4 region.
        g.add_item(id(1), CellAndSpan::new(2, 0, 1, 4), true, true);
        let (px, py) = cell_center(&g, 0, 0);
        let fit = g.find_nearest_vacant_area(px, py, 1, 1, 2, 2).unwrap();
        assert_eq!(fit, CellAndSpan::new(0, 0, 2, 2));
    }

    #[test]
    fn vacant_search_stops_growth_at_collisions() {
        let mut g = grid(4, 4);
        g.add_item(id(1), CellAndSpan::new(1, 0, 1, 1), true, true);
        let (px, py) = cell_center(&g, 0, 0);
        // Requested 2x2 around the top-left corner: X growth collides with
        // the item at (1, 0), so the fit is 1 wide.
        let fit = g.find_nearest_vacant_area(px, py, 1, 1, 2, 2).unwrap();
        assert_eq!((fit.cell_x, fit.cell_y), (0, 0));
        assert_eq!((fit.span_x, fit.span_y), (1, 2));
    }

    #[test]
    fn push_chain_shifts_full_row_when_room_exists() {
        // Making room at cell 0 in a nearly full row pushes every occupant
        // right by one; the chain absorbs items one abutment at a time.
        let mut g = grid(6, 1);
        for i in 0..5 {
            g.add_item(id(i + 1), CellAndSpan::new(i as i32, 0, 1, 1), true, true);
        }
        let ok = g.create_area_for_resize(0, 0, 1, 1, None, DirectionVector::new(1, 0), true);
        assert!(ok);
        for i in 0..5 {
            assert_eq!(
                g.item_cell(id(i + 1)).unwrap(),
                CellAndSpan::new(i as i32 + 1, 0, 1, 1)
            );
        }
        // The freed cell is reserved for the incoming item.
        for x in 0..6 {
            assert!(g.is_occupied(x, 0));
        }
    }

    #[test]
    fn push_chain_fails_when_row_has_no_room() {
        let mut g = grid(5, 1);
        for i in 0..5 {
            g.add_item(id(i + 1), CellAndSpan::new(i as i32, 0, 1, 1), true, true);
        }
        let ok = g.create_area_for_resize(0, 0, 1, 1, None, DirectionVector::new(1, 0), true);
        assert!(!ok);
        // Nothing moved.
        for i in 0..5 {
            assert_eq!(
                g.item_cell(id(i + 1)).unwrap(),
                CellAndSpan::new(i as i32, 0, 1, 1)
            );
        }
    }

    #[test]
    fn protected_item_blocks_the_push_direction() {
        // Row of four with a pinned item at the right end; pushing right
        // must not displace it, but the perpendicular fallback on a second
        // row can still resolve the collision.
        let mut g = grid(4, 2);
        g.add_item(id(1), CellAndSpan::new(0, 0, 1, 1), true, true);
        g.add_item(id(2), CellAndSpan::new(1, 0, 1, 1), true, true);
        g.add_item(id(3), CellAndSpan::new(2, 0, 1, 1), true, true);
        g.add_item(id(4), CellAndSpan::new(3, 0, 1, 1), false, true);
        // Fill the second row except under the target column so the
        // displaced item has exactly one place to go.
        g.add_item(id(5), CellAndSpan::new(1, 1, 1, 1), true, true);
        g.add_item(id(6), CellAndSpan::new(2, 1, 1, 1), true, true);
        g.add_item(id(7), CellAndSpan::new(3, 1, 1, 1), true, true);

        let ok = g.create_area_for_resize(0, 0, 1, 1, None, DirectionVector::new(1, 0), true);
        assert!(ok);
        // The pinned item never moved.
        assert_eq!(g.item_cell(id(4)).unwrap(), CellAndSpan::new(3, 0, 1, 1));
        // The collision resolved downward into the free cell at (0, 1).
        assert_eq!(g.item_cell(id(1)).unwrap(), CellAndSpan::new(0, 1, 1, 1));
    }

    #[test]
    fn drop_on_pinned_item_fails_outright() {
        let mut g = grid(2, 1);
        g.add_item(id(1), CellAndSpan::new(0, 0, 1, 1), false, true);
        g.add_item(id(2), CellAndSpan::new(1, 0, 1, 1), true, true);
        let (px, py) = cell_center(&g, 0, 0);
        let result = g.perform_reorder(px, py, 1, 1, 1, 1, None, ReorderMode::AcceptDrop);
        assert!(!result.found);
    }

    #[test]
    fn no_shuffle_wins_on_equal_area() {
        // Displacing the occupants and taking the free cell both place the
        // full span; on the tie the occupants stay put and the item lands
        // on the vacant cell instead.
        let mut g = grid(3, 1);
        g.add_item(id(1), CellAndSpan::new(0, 0, 1, 1), true, true);
        g.add_item(id(2), CellAndSpan::new(1, 0, 1, 1), true, true);
        let (px, py) = cell_center(&g, 0, 0);
        let result = g.perform_reorder(px, py, 1, 1, 1, 1, None, ReorderMode::Drop);
        assert!(result.found);
        assert_eq!(result.cell(), Some((2, 0)));
        assert!(result.moves.is_empty());
        assert_eq!(g.item_cell(id(1)).unwrap(), CellAndSpan::new(0, 0, 1, 1));
        assert_eq!(g.item_cell(id(2)).unwrap(), CellAndSpan::new(1, 0, 1, 1));
    }

    #[test]
    fn no_shuffle_used_when_displacement_fails() {
        // The collided item is pinned, so the only solution is the vacant
        // cell nearest the pointer.
        let mut g = grid(3, 1);
        g.add_item(id(1), CellAndSpan::new(0, 0, 1, 1), false, true);
        let (px, py) = cell_center(&g, 0, 0);
        let result = g.perform_reorder(px, py, 1, 1, 1, 1, None, ReorderMode::Drop);
        assert!(result.found);
        assert_eq!(result.cell(), Some((1, 0)));
        assert!(result.moves.is_empty());
        assert_eq!(g.item_cell(id(1)).unwrap(), CellAndSpan::new(0, 0, 1, 1));
    }

    #[test]
    fn drag_over_is_provisional_and_revert_is_bit_for_bit() {
        let mut g = grid(3, 1);
        g.add_item(id(1), CellAndSpan::new(0, 0, 1, 1), true, true);
        g.add_item(id(2), CellAndSpan::new(1, 0, 1, 1), true, true);
        g.add_item(id(3), CellAndSpan::new(2, 0, 1, 1), true, true);
        let before = g.clone_grid_occupancy();

        g.on_drag_enter();
        let (px, py) = cell_center(&g, 0, 0);
        for _ in 0..3 {
            let result =
                g.perform_reorder(px, py, 1, 1, 1, 1, Some(id(3)), ReorderMode::DragOver);
            assert!(result.found);
        }
        // Temporary coordinates moved, committed ones did not.
        assert_eq!(g.item_cell(id(1)).unwrap(), CellAndSpan::new(0, 0, 1, 1));
        assert_ne!(
            g.item_temp_cell(id(1)).unwrap(),
            g.item_cell(id(1)).unwrap()
        );

        let moves = g.on_drag_exit();
        assert!(!moves.is_empty());
        assert_eq!(g.clone_grid_occupancy(), before);
        assert_eq!(
            g.item_temp_cell(id(1)).unwrap(),
            g.item_cell(id(1)).unwrap()
        );
        // A second revert is a no-op.
        assert!(g.revert_temp_state().is_empty());
    }

    #[test]
    fn cancelled_shrink_preview_keeps_committed_span() {
        // A preview that only fits by shrinking the span stages the smaller
        // span provisionally; cancelling restores the full committed span.
        let mut g = grid(2, 2);
        g.add_item(id(1), CellAndSpan::new(0, 0, 2, 1), true, true);
        g.add_item(id(2), CellAndSpan::new(1, 1, 1, 1), false, true);

        g.on_drag_enter();
        g.mark_cells_unoccupied(id(1));
        let (px, py) = cell_center(&g, 0, 1);
        let result = g.perform_reorder(px, py, 1, 1, 2, 1, Some(id(1)), ReorderMode::DragOver);
        assert!(result.found);
        assert_eq!((result.span_x, result.span_y), (1, 1));
        assert_eq!(g.item_temp_cell(id(1)).unwrap(), CellAndSpan::new(0, 1, 1, 1));
        assert_eq!(g.item_cell(id(1)).unwrap(), CellAndSpan::new(0, 0, 2, 1));

        g.on_drag_exit();
        g.mark_cells_occupied(id(1));
        assert_eq!(g.item_cell(id(1)).unwrap(), CellAndSpan::new(0, 0, 2, 1));
        assert_eq!(g.item_temp_cell(id(1)).unwrap(), CellAndSpan::new(0, 0, 2, 1));
        assert!(g.is_occupied(0, 0) && g.is_occupied(1, 0));
    }

    #[test]
    fn drop_commits_drag_item_placement() {
        let mut g = grid(3, 1);
        g.add_item(id(1), CellAndSpan::new(0, 0, 1, 1), true, true);
        g.add_item(id(2), CellAndSpan::new(2, 0, 1, 1), true, true);
        // Drag item 2 onto the free middle cell and drop.
        g.mark_cells_unoccupied(id(2));
        let (px, py) = cell_center(&g, 1, 0);
        let result = g.perform_reorder(px, py, 1, 1, 1, 1, Some(id(2)), ReorderMode::Drop);
        assert!(result.found);
        assert_eq!(result.cell(), Some((1, 0)));
        assert_eq!(g.item_cell(id(2)).unwrap(), CellAndSpan::new(1, 0, 1, 1));
        assert!(g.is_occupied(1, 0));
        assert!(!g.is_occupied(2, 0));
    }

    #[test]
    fn hint_reports_targets_without_touching_state() {
        let mut g = grid(3, 1);
        g.add_item(id(1), CellAndSpan::new(0, 0, 1, 1), true, true);
        let before = g.clone_grid_occupancy();
        let (px, py) = cell_center(&g, 0, 0);
        // Grid has a free cell, so the no-shuffle solution wins and nothing
        // needs to move.
        let result = g.perform_reorder(px, py, 1, 1, 1, 1, None, ReorderMode::Hint);
        assert!(result.found);
        assert!(result.moves.is_empty());
        assert_eq!(g.clone_grid_occupancy(), before);
        assert!(!g.using_temp_coords());
    }

    #[test]
    fn relocation_fallback_resolves_when_push_cannot() {
        // An L-shaped pair blocks the corner and a third item denies the
        // only vacant 2x2, so the solver has to relocate the collided items
        // individually to open the requested region.
        let mut g = grid(3, 3);
        g.add_item(id(1), CellAndSpan::new(0, 0, 2, 1), true, true);
        g.add_item(id(2), CellAndSpan::new(0, 1, 1, 1), true, true);
        g.add_item(id(3), CellAndSpan::new(2, 2, 1, 1), true, true);
        let (px, py) = cell_center(&g, 0, 0);
        let result = g.perform_reorder(px, py, 2, 2, 2, 2, None, ReorderMode::AcceptDrop);
        assert!(result.found);
        assert_eq!(result.cell(), Some((0, 0)));
        // A validity probe never touches committed placements.
        assert_eq!(g.item_cell(id(1)).unwrap(), CellAndSpan::new(0, 0, 2, 1));
        assert_eq!(g.item_cell(id(2)).unwrap(), CellAndSpan::new(0, 1, 1, 1));
    }

    #[test]
    fn resize_pushes_neighbor_away() {
        let mut g = grid(4, 1);
        g.add_item(id(1), CellAndSpan::new(0, 0, 1, 1), true, true);
        g.add_item(id(2), CellAndSpan::new(1, 0, 1, 1), true, true);
        // Item 1 grows to 2x1; item 2 must slide right.
        g.mark_cells_unoccupied(id(1));
        let ok = g.create_area_for_resize(
            0,
            0,
            2,
            1,
            Some(id(1)),
            DirectionVector::new(1, 0),
            true,
        );
        assert!(ok);
        assert_eq!(g.item_cell(id(2)).unwrap(), CellAndSpan::new(2, 0, 1, 1));
        assert_eq!(g.item_cell(id(1)).unwrap(), CellAndSpan::new(0, 0, 2, 1));
    }

    #[test]
    fn has_reorder_solution_probes_exhaustively() {
        let mut g = grid(2, 2);
        g.add_item(id(1), CellAndSpan::new(0, 0, 2, 2), false, true);
        assert!(!g.has_reorder_solution(&ItemSpec::new(1, 1)));

        let mut g = grid(2, 2);
        g.add_item(id(1), CellAndSpan::new(0, 0, 2, 1), true, true);
        assert!(g.has_reorder_solution(&ItemSpec::new(2, 2).with_min_span(1, 1)));
    }

    #[test]
    fn dock_migration_clears_bottom_row() {
        let mut g = grid(2, 3);
        g.add_item(id(1), CellAndSpan::new(0, 2, 1, 1), true, true);
        g.add_item(id(2), CellAndSpan::new(1, 2, 1, 1), true, true);
        assert!(g.make_space_for_dock_migration(true));
        // Occupants of the bottom row moved up; the row itself is free.
        assert!(!g.is_occupied(0, 2));
        assert!(!g.is_occupied(1, 2));
        assert_ne!(g.item_cell(id(1)).unwrap().cell_y, 2);
        assert_ne!(g.item_cell(id(2)).unwrap().cell_y, 2);
    }

    #[test]
    fn reorder_rejects_invalid_span_requests() {
        let mut g = grid(4, 4);
        let (px, py) = cell_center(&g, 0, 0);
        let result = g.perform_reorder(px, py, 3, 1, 2, 1, None, ReorderMode::AcceptDrop);
        assert!(!result.found);
        assert_eq!((result.cell_x, result.cell_y), (-1, -1));
    }

    #[test]
    fn nearest_drop_location_occupancy_check() {
        let mut g = grid(3, 1);
        g.add_item(id(1), CellAndSpan::new(0, 0, 1, 1), true, true);
        let (px0, py0) = cell_center(&g, 0, 0);
        let (px2, py2) = cell_center(&g, 2, 0);
        assert!(g.is_nearest_drop_location_occupied(px0, py0, 1, 1, None));
        assert!(!g.is_nearest_drop_location_occupied(px2, py2, 1, 1, None));
    }

    #[test]
    #[should_panic(expected = "exceeds the bounds")]
    fn is_occupied_panics_out_of_range() {
        let g = grid(2, 2);
        let _ = g.is_occupied(2, 0);
    }

    #[test]
    fn external_drop_marks_landing_area() {
        let mut g = grid(3, 1);
        g.add_item(id(1), CellAndSpan::new(0, 0, 1, 1), true, true);
        let (px, py) = cell_center(&g, 2, 0);
        let result = g.perform_reorder(px, py, 1, 1, 1, 1, None, ReorderMode::DropExternal);
        assert!(result.found);
        assert_eq!(result.cell(), Some((2, 0)));
        assert!(g.is_occupied(2, 0));
        // The host registers the arriving item without re-marking.
        assert!(g.add_item(id(9), CellAndSpan::new(2, 0, 1, 1), true, false));
    }
}
