#![forbid(unsafe_code)]

//! Boolean occupancy matrix over grid cells.

use dashgrid_core::{CellAndSpan, GridRect};

/// Tracks which cells of a `count_x x count_y` grid are covered by a placed
/// item.
///
/// Outside an in-progress placement attempt, a cell is `true` iff some
/// committed item's rectangle covers it. Scratch copies are mutated freely
/// during a search and either promoted or discarded whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOccupancy {
    count_x: i32,
    count_y: i32,
    cells: Vec<bool>,
}

impl GridOccupancy {
    /// Create an empty occupancy matrix.
    ///
    /// Panics when either count is negative; a zero-sized matrix is allowed
    /// so an unsized grid can hold a placeholder.
    pub fn new(count_x: i32, count_y: i32) -> Self {
        assert!(
            count_x >= 0 && count_y >= 0,
            "occupancy dimensions must be non-negative, got {count_x}x{count_y}"
        );
        Self {
            count_x,
            count_y,
            cells: vec![false; (count_x * count_y) as usize],
        }
    }

    #[inline]
    pub const fn count_x(&self) -> i32 {
        self.count_x
    }

    #[inline]
    pub const fn count_y(&self) -> i32 {
        self.count_y
    }

    /// Whether the cell at `(x, y)` is occupied. Out-of-range reads false.
    #[inline]
    pub fn is_set(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.count_x || y >= self.count_y {
            return false;
        }
        self.cells[(y * self.count_x + x) as usize]
    }

    /// Set every cell of the given rectangle to `value`.
    ///
    /// Clips silently to the grid bounds; a rectangle anchored at a negative
    /// coordinate is a no-op.
    pub fn mark_cells(&mut self, cell_x: i32, cell_y: i32, span_x: i32, span_y: i32, value: bool) {
        if cell_x < 0 || cell_y < 0 {
            return;
        }
        let mut x = cell_x;
        while x < cell_x + span_x && x < self.count_x {
            let mut y = cell_y;
            while y < cell_y + span_y && y < self.count_y {
                self.cells[(y * self.count_x + x) as usize] = value;
                y += 1;
            }
            x += 1;
        }
    }

    /// [`mark_cells`](Self::mark_cells) for a cell rectangle.
    pub fn mark_rect(&mut self, r: &GridRect, value: bool) {
        self.mark_cells(r.left, r.top, r.width(), r.height(), value);
    }

    /// [`mark_cells`](Self::mark_cells) for an item placement.
    pub fn mark_cell_span(&mut self, cell: &CellAndSpan, value: bool) {
        self.mark_cells(cell.cell_x, cell.cell_y, cell.span_x, cell.span_y, value);
    }

    /// First top-left anchor whose `span_x x span_y` block is entirely
    /// vacant, scanning rows top-to-bottom and columns left-to-right.
    ///
    /// The scan order is a contract: it decides which "first empty cell" a
    /// no-shuffle placement lands in.
    pub fn find_vacant_cell(&self, span_x: i32, span_y: i32) -> Option<(i32, i32)> {
        if span_x < 1 || span_y < 1 {
            return None;
        }
        let mut y = 0;
        while y + span_y <= self.count_y {
            let mut x = 0;
            while x + span_x <= self.count_x {
                let mut available = true;
                'block: for i in x..x + span_x {
                    for j in y..y + span_y {
                        if self.is_set(i, j) {
                            available = false;
                            break 'block;
                        }
                    }
                }
                if available {
                    return Some((x, y));
                }
                x += 1;
            }
            y += 1;
        }
        None
    }

    /// Whether the whole region lies inside the grid and is unoccupied.
    pub fn is_region_vacant(&self, x: i32, y: i32, span_x: i32, span_y: i32) -> bool {
        let x2 = x + span_x - 1;
        let y2 = y + span_y - 1;
        if x < 0 || y < 0 || x2 >= self.count_x || y2 >= self.count_y {
            return false;
        }
        for i in x..=x2 {
            for j in y..=y2 {
                if self.is_set(i, j) {
                    return false;
                }
            }
        }
        true
    }

    /// Copy this matrix into `dest`. Panics when the dimensions differ.
    pub fn copy_to(&self, dest: &mut GridOccupancy) {
        assert!(
            self.count_x == dest.count_x && self.count_y == dest.count_y,
            "occupancy copy between different grid sizes"
        );
        dest.cells.copy_from_slice(&self.cells);
    }

    /// Clear every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }
}
