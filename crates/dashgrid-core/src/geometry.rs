#![forbid(unsafe_code)]

//! Geometric primitives in grid-cell and pixel units.

use serde::{Deserialize, Serialize};

/// A rectangle over grid cells or pixels, with exclusive right/bottom edges.
///
/// Signed coordinates are deliberate: displacement searches move rectangles
/// transiently outside the grid before the final bounds check rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridRect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl GridRect {
    /// Create a new rectangle from edges.
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from a top-left anchor and a span.
    #[inline]
    pub const fn from_cell_span(cell_x: i32, cell_y: i32, span_x: i32, span_y: i32) -> Self {
        Self::new(cell_x, cell_y, cell_x + span_x, cell_y + span_y)
    }

    /// Width of the rectangle.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height of the rectangle.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Check whether the rectangle has no area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Horizontal center.
    #[inline]
    pub const fn center_x(&self) -> i32 {
        (self.left + self.right) / 2
    }

    /// Vertical center.
    #[inline]
    pub const fn center_y(&self) -> i32 {
        (self.top + self.bottom) / 2
    }

    /// Check whether this rectangle fully contains `other`.
    ///
    /// An empty receiver contains nothing; the search tie-break rules depend
    /// on that behavior for sentinel rectangles.
    #[inline]
    pub const fn contains_rect(&self, other: &GridRect) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    /// Check whether two rectangles overlap.
    #[inline]
    pub const fn intersects(&self, other: &GridRect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Smallest rectangle containing both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn union(&self, other: &GridRect) -> GridRect {
        GridRect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Translate the rectangle by a delta.
    #[inline]
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> GridRect {
        GridRect::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }
}

/// A mutable (position, span) record in grid-cell units.
///
/// Represents the half-open rectangle
/// `[cell_x, cell_x + span_x) x [cell_y, cell_y + span_y)`. Copied by value,
/// never aliased across working configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAndSpan {
    pub cell_x: i32,
    pub cell_y: i32,
    pub span_x: i32,
    pub span_y: i32,
}

impl CellAndSpan {
    /// Create a record from an anchor cell and a span.
    #[inline]
    pub const fn new(cell_x: i32, cell_y: i32, span_x: i32, span_y: i32) -> Self {
        Self {
            cell_x,
            cell_y,
            span_x,
            span_y,
        }
    }

    /// The covered cell rectangle.
    #[inline]
    pub const fn rect(&self) -> GridRect {
        GridRect::from_cell_span(self.cell_x, self.cell_y, self.span_x, self.span_y)
    }

    /// Covered area in cells.
    #[inline]
    pub const fn area(&self) -> i32 {
        self.span_x * self.span_y
    }
}

impl Default for CellAndSpan {
    /// Unplaced sentinel: no cell, zero span.
    fn default() -> Self {
        Self::new(-1, -1, 0, 0)
    }
}

/// Pixel padding around the grid surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Padding {
    /// Uniform padding on all sides.
    #[inline]
    pub const fn uniform(value: i32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}
