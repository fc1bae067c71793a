// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. nav::NavConfig)
    clippy::module_name_repetitions
)]

//! # Folio
//!
//! A terminal portfolio with scroll-synchronized navigation.
//!
//! Folio renders a single long portfolio page in the terminal with:
//! - A fixed nav bar whose active item follows the scroll position
//! - Smooth scrolling to a section when a nav item is chosen
//! - A compact dropdown menu on narrow terminals
//! - A contact form that delivers through a mail service or a local outbox
//! - File watching for live preview of the content file
//!
//! ## Architecture
//!
//! Folio uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`nav`]: Section registry, active-section resolution and scroll timing
//! - [`content`]: Portfolio model and layout into lines
//! - [`contact`]: Contact form state and delivery
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved command-line defaults
//! - [`watcher`]: File watching

pub mod app;
pub mod config;
pub mod contact;
pub mod content;
pub mod nav;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::content::{Document, Portfolio};
    pub use crate::nav::{NavConfig, Navigator, Region, RegionRegistry};
    pub use crate::ui::viewport::Viewport;
}
