//! Nav bar geometry and hit-testing.
//!
//! The bar occupies the top [`NAV_HEIGHT`] rows: a blank row, the row with
//! the brand and items, and a bottom border. When the items do not fit the
//! width the bar turns compact and shows a menu button that opens a
//! dropdown below it.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use crate::nav::NAV_HEIGHT;

/// Columns kept clear at both ends of the bar.
const EDGE_PADDING: u16 = 2;
/// Columns between adjacent items.
const ITEM_GAP: u16 = 1;

pub const MENU_CLOSED: &str = " ☰ ";
pub const MENU_OPEN: &str = " ✕ ";

/// Something clickable in the nav bar or its dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavHit {
    Brand,
    Item(usize),
    MenuButton,
}

/// Where everything in the nav bar is drawn for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBarLayout {
    pub bar: Rect,
    pub brand: Rect,
    /// Inline item cells; empty in compact mode
    pub items: Vec<Rect>,
    pub compact: bool,
    pub menu_button: Option<Rect>,
    /// Dropdown frame, present when compact and open
    pub dropdown: Option<Rect>,
    /// One row per item inside the dropdown
    pub dropdown_items: Vec<Rect>,
}

/// Text of an inline nav cell.
pub fn item_cell(label: &str) -> String {
    format!(" {label} ")
}

fn text_width(text: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(text)).unwrap_or(u16::MAX)
}

impl NavBarLayout {
    /// Compute the bar for `area` (the whole screen).
    pub fn compute(area: Rect, brand: &str, labels: &[&str], menu_open: bool) -> Self {
        let bar = Rect {
            height: NAV_HEIGHT.min(area.height),
            ..area
        };
        let row = bar.y + (bar.height.saturating_sub(1) / 2).min(1);
        let brand_width = text_width(brand);
        let brand_rect = Rect::new(
            bar.x + EDGE_PADDING.min(bar.width),
            row,
            brand_width.min(bar.width.saturating_sub(EDGE_PADDING)),
            1,
        );

        let cell_widths: Vec<u16> = labels.iter().map(|l| text_width(&item_cell(l))).collect();
        let gaps = u16::try_from(labels.len().saturating_sub(1)).unwrap_or(u16::MAX);
        let items_width = cell_widths
            .iter()
            .fold(0u16, |acc, w| acc.saturating_add(*w))
            .saturating_add(ITEM_GAP.saturating_mul(gaps));
        let needed = EDGE_PADDING
            .saturating_mul(2)
            .saturating_add(brand_width)
            .saturating_add(ITEM_GAP * 2)
            .saturating_add(items_width);

        if needed <= bar.width {
            let mut x = bar.x + bar.width - EDGE_PADDING - items_width;
            let items = cell_widths
                .iter()
                .map(|w| {
                    let rect = Rect::new(x, row, *w, 1);
                    x += w + ITEM_GAP;
                    rect
                })
                .collect();
            return Self {
                bar,
                brand: brand_rect,
                items,
                compact: false,
                menu_button: None,
                dropdown: None,
                dropdown_items: Vec::new(),
            };
        }

        let button_width = text_width(MENU_CLOSED).min(bar.width);
        let menu_button = Rect::new(
            (bar.x + bar.width).saturating_sub(EDGE_PADDING + button_width).max(bar.x),
            row,
            button_width,
            1,
        );

        let (dropdown, dropdown_items) = if menu_open {
            let below = bar.y + bar.height;
            let available = (area.y + area.height).saturating_sub(below);
            let rows = u16::try_from(labels.len()).unwrap_or(u16::MAX);
            let height = rows.saturating_add(1).min(available);
            let frame = Rect::new(bar.x, below, bar.width, height);
            let visible = height.saturating_sub(1);
            let item_rects = (0..visible)
                .map(|i| Rect::new(bar.x, below + i, bar.width, 1))
                .collect();
            (Some(frame), item_rects)
        } else {
            (None, Vec::new())
        };

        Self {
            bar,
            brand: brand_rect,
            items: Vec::new(),
            compact: true,
            menu_button: Some(menu_button),
            dropdown,
            dropdown_items,
        }
    }

    /// What, if anything, sits under a mouse position.
    pub fn hit(&self, column: u16, row: u16) -> Option<NavHit> {
        if contains(self.brand, column, row) {
            return Some(NavHit::Brand);
        }
        if self.menu_button.is_some_and(|r| contains(r, column, row)) {
            return Some(NavHit::MenuButton);
        }
        self.items
            .iter()
            .chain(&self.dropdown_items)
            .position(|r| contains(*r, column, row))
            .map(NavHit::Item)
    }

    /// Whether a position falls on the bar or its open dropdown.
    pub fn covers(&self, column: u16, row: u16) -> bool {
        contains(self.bar, column, row) || self.dropdown.is_some_and(|r| contains(r, column, row))
    }
}

const fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
