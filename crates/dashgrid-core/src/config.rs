#![forbid(unsafe_code)]

//! Grid configuration and pixel<->cell mapping.
//!
//! All conversions are pure functions of the configuration; callers that
//! resize the grid build a new configuration rather than mutating one that a
//! search may still be reading.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{GridRect, Padding};

/// Validation failure when constructing a [`GridConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridConfigError {
    /// Grid must have at least one column and one row.
    InvalidGridCount { count_x: i32, count_y: i32 },
    /// Cells must be at least one pixel in each dimension.
    InvalidCellSize { cell_width: i32, cell_height: i32 },
}

impl fmt::Display for GridConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGridCount { count_x, count_y } => {
                write!(f, "grid must be at least 1x1, got {count_x}x{count_y}")
            }
            Self::InvalidCellSize {
                cell_width,
                cell_height,
            } => {
                write!(
                    f,
                    "cell size must be at least 1x1 px, got {cell_width}x{cell_height}"
                )
            }
        }
    }
}

impl std::error::Error for GridConfigError {}

/// Fixed geometry of a launcher grid: cell counts, cell pixel dimensions,
/// border spacing, and surface padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    count_x: i32,
    count_y: i32,
    cell_width: i32,
    cell_height: i32,
    border_spacing: i32,
    padding: Padding,
}

impl GridConfig {
    /// Create a validated configuration with zero padding and spacing.
    pub fn new(
        count_x: i32,
        count_y: i32,
        cell_width: i32,
        cell_height: i32,
    ) -> Result<Self, GridConfigError> {
        if count_x < 1 || count_y < 1 {
            return Err(GridConfigError::InvalidGridCount { count_x, count_y });
        }
        if cell_width < 1 || cell_height < 1 {
            return Err(GridConfigError::InvalidCellSize {
                cell_width,
                cell_height,
            });
        }
        Ok(Self {
            count_x,
            count_y,
            cell_width,
            cell_height,
            border_spacing: 0,
            padding: Padding::default(),
        })
    }

    /// Set the surface padding.
    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Set the border spacing used by the derived-size helpers.
    #[must_use]
    pub fn with_border_spacing(mut self, border_spacing: i32) -> Self {
        self.border_spacing = border_spacing;
        self
    }

    /// New configuration with a different cell count.
    ///
    /// Panics if the counts are not at least 1x1; resizing to an invalid
    /// grid is a host programming error.
    #[must_use]
    pub fn resized(&self, count_x: i32, count_y: i32) -> Self {
        assert!(
            count_x >= 1 && count_y >= 1,
            "grid must be at least 1x1, got {count_x}x{count_y}"
        );
        Self {
            count_x,
            count_y,
            ..*self
        }
    }

    /// New configuration with different cell pixel dimensions.
    ///
    /// Panics if the dimensions are not at least 1x1 px.
    #[must_use]
    pub fn with_cell_dimensions(&self, cell_width: i32, cell_height: i32) -> Self {
        assert!(
            cell_width >= 1 && cell_height >= 1,
            "cell size must be at least 1x1 px, got {cell_width}x{cell_height}"
        );
        Self {
            cell_width,
            cell_height,
            ..*self
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

    #[inline]
    pub const fn cell_width(&self) -> i32 {
        self.cell_width
    }

    #[inline]
    pub const fn cell_height(&self) -> i32 {
        self.cell_height
    }

    #[inline]
    pub const fn border_spacing(&self) -> i32 {
        self.border_spacing
    }

    #[inline]
    pub const fn padding(&self) -> Padding {
        self.padding
    }

    /// The cell that strictly encloses a pixel point, clamped to the grid.
    pub fn point_to_cell_exact(&self, x: i32, y: i32) -> (i32, i32) {
        let cx = (x - self.padding.left) / self.cell_width;
        let cy = (y - self.padding.top) / self.cell_height;
        (
            cx.clamp(0, self.count_x - 1),
            cy.clamp(0, self.count_y - 1),
        )
    }

    /// The cell that most closely encloses a pixel point: offsets by half a
    /// cell so the result biases toward the nearest cell rather than the
    /// containing one.
    pub fn point_to_cell_rounded(&self, x: i32, y: i32) -> (i32, i32) {
        self.point_to_cell_exact(x + self.cell_width / 2, y + self.cell_height / 2)
    }

    /// Pixel position of a cell's upper-left corner.
    pub fn cell_to_point(&self, cell_x: i32, cell_y: i32) -> (i32, i32) {
        (
            self.padding.left + cell_x * self.cell_width,
            self.padding.top + cell_y * self.cell_height,
        )
    }

    /// Pixel position of a cell's center.
    pub fn cell_to_center_point(&self, cell_x: i32, cell_y: i32) -> (i32, i32) {
        self.region_to_center_point(cell_x, cell_y, 1, 1)
    }

    /// Pixel position of the center of a cell region.
    pub fn region_to_center_point(
        &self,
        cell_x: i32,
        cell_y: i32,
        span_x: i32,
        span_y: i32,
    ) -> (i32, i32) {
        (
            self.padding.left + cell_x * self.cell_width + (span_x * self.cell_width) / 2,
            self.padding.top + cell_y * self.cell_height + (span_y * self.cell_height) / 2,
        )
    }

    /// Pixel rectangle covered by a cell region.
    pub fn region_to_rect(&self, cell_x: i32, cell_y: i32, span_x: i32, span_y: i32) -> GridRect {
        let left = self.padding.left + cell_x * self.cell_width;
        let top = self.padding.top + cell_y * self.cell_height;
        GridRect::new(
            left,
            top,
            left + span_x * self.cell_width,
            top + span_y * self.cell_height,
        )
    }

    /// Euclidean pixel distance from a point to a cell's center.
    pub fn distance_from_cell(&self, x: f32, y: f32, cell_x: i32, cell_y: i32) -> f32 {
        let (cx, cy) = self.cell_to_center_point(cell_x, cell_y);
        (x - cx as f32).hypot(y - cy as f32)
    }

    /// Cell width that fits `count_x` columns into `width` pixels with the
    /// given spacing between columns.
    pub const fn cell_width_for_bounds(width: i32, border_spacing: i32, count_x: i32) -> i32 {
        (width - (count_x - 1) * border_spacing) / count_x
    }

    /// Cell height that fits `count_y` rows into `height` pixels.
    pub const fn cell_height_for_bounds(height: i32, border_spacing: i32, count_y: i32) -> i32 {
        (height - (count_y - 1) * border_spacing) / count_y
    }

    /// Total pixel width of the configured grid, padding included.
    pub const fn grid_width_px(&self) -> i32 {
        self.padding.left + self.padding.right + self.count_x * self.cell_width
    }

    /// Total pixel height of the configured grid, padding included.
    pub const fn grid_height_px(&self) -> i32 {
        self.padding.top + self.padding.bottom + self.count_y * self.cell_height
    }
}
