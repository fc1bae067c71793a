//! Content regions and their current geometry.

use std::ops::Range;

/// A named, vertically extended block of the document.
///
/// Geometry is measured in rows from the top of the laid-out document.
/// Regions are derived fresh on every registry query and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Stable identifier shared with the nav item list
    pub id: String,
    /// First row of the region
    pub top: i64,
    /// Number of rows the region spans
    pub height: i64,
}

impl Region {
    pub fn new(id: impl Into<String>, top: i64, height: i64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Scroll offsets for which this region counts as active.
    ///
    /// The window is half-open: `[top - nav_offset, top + height)`. A region
    /// without height has an empty window so collapsed sections never
    /// become active.
    pub fn activation_window(&self, nav_offset: i64) -> Range<i64> {
        if self.height <= 0 {
            return self.top..self.top;
        }
        (self.top - nav_offset)..(self.top + self.height)
    }
}

/// Source of the document's identifiable regions.
///
/// Implementations must report the current layout every time they are
/// asked; an empty snapshot means there is nothing to resolve against.
pub trait RegionRegistry {
    /// Regions in document order, top to bottom.
    fn snapshot(&self) -> Vec<Region>;

    /// Look up a single region by id in a fresh snapshot.
    fn region(&self, id: &str) -> Option<Region> {
        self.snapshot().into_iter().find(|region| region.id == id)
    }
}

impl RegionRegistry for Vec<Region> {
    fn snapshot(&self) -> Vec<Region> {
        self.clone()
    }
}
