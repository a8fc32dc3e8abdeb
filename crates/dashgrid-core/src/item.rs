#![forbid(unsafe_code)]

//! Item identity and placement requirements.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable identifier for a placed launcher item (app icon or widget).
///
/// The engine never interprets the value; hosts typically derive it from a
/// database row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Wrap a raw identifier.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Placement requirements for an item: the span it wants, the smallest span
/// it tolerates, and whether the engine may displace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub span_x: i32,
    pub span_y: i32,
    pub min_span_x: i32,
    pub min_span_y: i32,
    /// False only for protected fixed items; those are never displaced by a
    /// reorder.
    pub reorderable: bool,
}

impl ItemSpec {
    /// Spec for an item that requires exactly `span_x x span_y` cells.
    pub const fn new(span_x: i32, span_y: i32) -> Self {
        Self {
            span_x,
            span_y,
            min_span_x: span_x,
            min_span_y: span_y,
            reorderable: true,
        }
    }

    /// Allow the engine to shrink the item down to a minimum span.
    #[must_use]
    pub const fn with_min_span(mut self, min_span_x: i32, min_span_y: i32) -> Self {
        self.min_span_x = min_span_x;
        self.min_span_y = min_span_y;
        self
    }

    /// Mark the item as protected: it holds its cells against any push.
    #[must_use]
    pub const fn pinned(mut self) -> Self {
        self.reorderable = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_defaults_to_rigid_span() {
        let spec = ItemSpec::new(2, 3);
        assert_eq!((spec.min_span_x, spec.min_span_y), (2, 3));
        assert!(spec.reorderable);
    }

    #[test]
    fn pinned_items_are_not_reorderable() {
        assert!(!ItemSpec::new(1, 1).pinned().reorderable);
    }

    #[test]
    fn display_is_stable() {
        assert_eq!(ItemId::new(42).to_string(), "item#42");
    }
}
