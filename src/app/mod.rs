//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::config::ThemeMode;
use crate::nav::NavConfig;

/// Main application struct that owns the terminal and runs the event loop.
#[derive(Debug)]
pub struct App {
    content_path: Option<PathBuf>,
    watch_enabled: bool,
    nav_config: NavConfig,
    theme: ThemeMode,
    outbox: Option<PathBuf>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application for a content file, or the built-in portfolio.
    pub fn new(content_path: Option<PathBuf>) -> Self {
        Self {
            content_path,
            watch_enabled: false,
            nav_config: NavConfig::default(),
            theme: ThemeMode::Auto,
            outbox: None,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Enable or disable file watching.
    pub fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Override scroll debounce and smooth scrolling.
    pub const fn with_nav_config(mut self, config: NavConfig) -> Self {
        self.nav_config = config;
        self
    }

    pub const fn with_theme(mut self, theme: ThemeMode) -> Self {
        self.theme = theme;
        self
    }

    /// File that receives contact messages when no mail service is set up.
    pub fn with_outbox(mut self, path: Option<PathBuf>) -> Self {
        self.outbox = path;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;
