//! Programmatic scrolling toward a region.

use super::registry::Region;

/// A scrollable surface the controller can drive.
pub trait ScrollSurface {
    /// Current scroll offset in rows.
    fn scroll_offset(&self) -> usize;
    /// Largest offset the surface accepts.
    fn max_scroll_offset(&self) -> usize;
    /// Move to `offset`, clamped to the scrollable range.
    fn set_scroll_offset(&mut self, offset: usize);
}

/// Offset that puts the top of `region` directly below a fixed nav bar.
pub const fn scroll_target(region: &Region, nav_height: i64) -> i64 {
    region.top - nav_height
}

/// Clamp a signed target into a surface's scrollable range.
pub fn clamp_target(target: i64, max_offset: usize) -> usize {
    usize::try_from(target.max(0)).map_or(max_offset, |t| t.min(max_offset))
}

/// Ease-out animation toward a target offset.
///
/// Each step covers a fixed fraction of the remaining distance, and at
/// least one row, so motion decelerates into the target and always ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothScroll {
    target: Option<usize>,
    /// Fraction of the remaining distance covered per step
    ease: f64,
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(0.35)
    }
}

impl SmoothScroll {
    pub fn new(ease: f64) -> Self {
        Self {
            target: None,
            ease: ease.clamp(0.05, 1.0),
        }
    }

    pub const fn start(&mut self, target: usize) {
        self.target = Some(target);
    }

    pub const fn cancel(&mut self) {
        self.target = None;
    }

    pub const fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    pub const fn target(&self) -> Option<usize> {
        self.target
    }

    /// Advance one frame. Returns the new offset when the surface moved.
    pub fn step(&mut self, surface: &mut impl ScrollSurface) -> Option<usize> {
        let target = self.target?.min(surface.max_scroll_offset());
        let current = surface.scroll_offset();
        if current == target {
            self.target = None;
            return None;
        }

        let distance = current.abs_diff(target);
        // Distances are terminal rows, far below f64 precision limits
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let stride = ((distance as f64 * self.ease).round() as usize).clamp(1, distance);
        let next = if target > current {
            current + stride
        } else {
            current - stride
        };

        surface.set_scroll_offset(next);
        if next == target {
            self.target = None;
        }
        Some(next)
    }
}
