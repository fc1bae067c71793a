//! Navigation state owned by the application model.

/// Which region is active and whether the compact menu is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub active_id: String,
    pub menu_open: bool,
}

/// Single source of truth for [`NavigationState`].
///
/// Only the UI event loop writes to the store, one event at a time, so it
/// needs no synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavStore {
    state: NavigationState,
}

impl NavStore {
    /// Create a store with `initial_id` active and the menu closed.
    pub fn new(initial_id: impl Into<String>) -> Self {
        Self {
            state: NavigationState {
                active_id: initial_id.into(),
                menu_open: false,
            },
        }
    }

    /// Mark `id` active. Empty ids are ignored.
    ///
    /// Returns true when the active id changed.
    pub fn set_active(&mut self, id: &str) -> bool {
        if id.is_empty() || self.state.active_id == id {
            return false;
        }
        id.clone_into(&mut self.state.active_id);
        true
    }

    pub const fn toggle_menu(&mut self) {
        self.state.menu_open = !self.state.menu_open;
    }

    /// Close the menu. Returns true if it was open.
    pub const fn close_menu(&mut self) -> bool {
        let was_open = self.state.menu_open;
        self.state.menu_open = false;
        was_open
    }

    pub fn active_id(&self) -> &str {
        &self.state.active_id
    }

    pub const fn menu_open(&self) -> bool {
        self.state.menu_open
    }

    pub const fn state(&self) -> &NavigationState {
        &self.state
    }
}
