//! The scrollable window onto the laid-out portfolio.

use std::ops::Range;

use crate::nav::ScrollSurface;

/// Visible slice of the document.
///
/// The offset is the document row shown at the very top of the screen,
/// underneath the fixed nav bar. It is always within `0..=max_offset()`.
///
/// # Example
///
/// ```
/// use folio::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 20, 50);
/// vp.scroll_down(100);
/// assert_eq!(vp.offset(), 30);
/// assert_eq!(vp.visible_range(), 30..50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// `height` is the document area only, excluding the status bar.
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Largest offset that still fills the screen.
    pub const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }

    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_lines);
        self.offset.min(end)..end
    }

    /// How far down the document is, 0-100.
    pub fn scroll_percent(&self) -> u8 {
        let max = self.max_offset();
        if max == 0 {
            return 100;
        }
        // offset <= max, so the quotient is within 0..=100
        #[allow(clippy::cast_possible_truncation)]
        {
            ((self.offset * 100 + max / 2) / max).min(100) as u8
        }
    }

    /// Jump to `offset`, clamped. Returns whether the offset moved.
    pub fn scroll_to(&mut self, offset: usize) -> bool {
        let clamped = offset.min(self.max_offset());
        let moved = clamped != self.offset;
        self.offset = clamped;
        moved
    }

    pub fn scroll_up(&mut self, rows: usize) -> bool {
        self.scroll_to(self.offset.saturating_sub(rows))
    }

    pub fn scroll_down(&mut self, rows: usize) -> bool {
        self.scroll_to(self.offset.saturating_add(rows))
    }

    /// Rows a page scroll moves: one screen minus the rows the nav bar hides.
    pub fn page_rows(&self, nav_height: u16) -> usize {
        usize::from(self.height.saturating_sub(nav_height)).max(1)
    }

    pub fn half_page_rows(&self) -> usize {
        (usize::from(self.height) / 2).max(1)
    }

    pub fn go_to_top(&mut self) -> bool {
        self.scroll_to(0)
    }

    pub fn go_to_bottom(&mut self) -> bool {
        self.scroll_to(self.max_offset())
    }

    /// New terminal size; the offset is re-clamped.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// New document length after a relayout or reload.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }
}

impl ScrollSurface for Viewport {
    fn scroll_offset(&self) -> usize {
        self.offset
    }

    fn max_scroll_offset(&self) -> usize {
        self.max_offset()
    }

    fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_to(offset);
    }
}
