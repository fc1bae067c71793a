//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`nav_bar`]: Fixed nav bar geometry and hit-testing
//! - [`style`]: Theming and colors

pub mod nav_bar;
pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{contact_form_rect, help_rect};
pub use render::{document_content_width, render};

/// Blank columns on each side of the document text.
pub const DOCUMENT_SIDE_PADDING: u16 = 2;
