#![forbid(unsafe_code)]

//! Grid occupancy and item placement/reorder engine.
//!
//! The entry point is [`CellGrid`]: register items with [`CellGrid::add_item`],
//! then drive a drag session with [`CellGrid::perform_reorder`] in its
//! different [`ReorderMode`]s. [`GridOccupancy`] is the underlying boolean
//! cell matrix, exposed for hosts that run their own migration checks.
//!
//! ```
//! use dashgrid_layout::{CellAndSpan, CellGrid, GridConfig, ItemId, ReorderMode};
//!
//! let config = GridConfig::new(4, 4, 100, 100)?;
//! let mut grid = CellGrid::new(config);
//! grid.add_item(ItemId::new(1), CellAndSpan::new(0, 0, 1, 1), true, true);
//!
//! // Drop a new 1x1 item as close to pixel (50, 50) as possible.
//! let result = grid.perform_reorder(50, 50, 1, 1, 1, 1, None, ReorderMode::DropExternal);
//! assert!(result.found);
//! # Ok::<(), dashgrid_layout::GridConfigError>(())
//! ```

mod cluster;
pub mod engine;
pub mod occupancy;
mod solution;

pub use engine::{
    CellGrid, DirectionVector, ItemMove, ReorderMode, ReorderResult, compute_direction_vector,
};
pub use occupancy::GridOccupancy;

pub use dashgrid_core::{
    CellAndSpan, GridConfig, GridConfigError, GridRect, ItemId, ItemSpec, Padding,
};
