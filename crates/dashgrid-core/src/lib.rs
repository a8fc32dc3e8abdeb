#![forbid(unsafe_code)]

//! Core primitives for the dashgrid launcher engine.
//!
//! This crate holds the leaf value types the placement engine is built on:
//! grid geometry ([`GridRect`], [`CellAndSpan`]), the validated grid
//! configuration with its pixel<->cell conversions ([`GridConfig`]), and item
//! identity ([`ItemId`], [`ItemSpec`]). It contains no placement logic.

pub mod config;
pub mod geometry;
pub mod item;

pub use config::{GridConfig, GridConfigError};
pub use geometry::{CellAndSpan, GridRect, Padding};
pub use item::{ItemId, ItemSpec};
