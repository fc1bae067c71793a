use tracing::debug;

use crate::app::{Model, ToastLevel};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Scrolling
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,
    /// Scroll up half page
    HalfPageUp,
    /// Scroll down half page
    HalfPageDown,
    /// Go to beginning of document
    GoToTop,
    /// Go to end of document
    GoToBottom,

    // Sections
    /// Scroll to the section with this id
    NavigateTo(String),
    /// Activate the nav item at this index
    NavActivate(usize),
    /// Move keyboard focus to the next nav item
    NavFocusNext,
    /// Move keyboard focus to the previous nav item
    NavFocusPrev,
    /// Activate the focused nav item
    NavFocusActivate,
    /// Open or close the compact menu
    ToggleMenu,
    /// Close the compact menu and drop nav focus
    CloseMenu,

    // Help
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    HelpScrollUp,
    HelpScrollDown,

    // Contact
    OpenContactForm,
    CloseContactForm,
    /// Type a character into the focused field
    FormInput(char),
    /// Delete the last character of the focused field
    FormBackspace,
    FormNextField,
    FormPrevField,
    /// Validate and send
    FormSubmit,
    /// A send finished
    ContactDelivered(Result<(), String>),

    // Content
    /// Toggle file watching
    ToggleWatch,
    /// Content file changed externally, reload
    FileChanged,
    /// Force reload content
    ForceReload,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// Reloading and mail delivery happen afterwards in the event loop.
pub fn update(mut model: Model, msg: Message) -> Model {
    let nav_height = model.navigator.config().nav_height;

    match msg {
        // Scrolling
        Message::ScrollUp(n) => {
            let moved = model.viewport.scroll_up(n);
            model.user_scrolled(moved);
        }
        Message::ScrollDown(n) => {
            let moved = model.viewport.scroll_down(n);
            model.user_scrolled(moved);
        }
        Message::PageUp => {
            let rows = model.viewport.page_rows(nav_height);
            let moved = model.viewport.scroll_up(rows);
            model.user_scrolled(moved);
        }
        Message::PageDown => {
            let rows = model.viewport.page_rows(nav_height);
            let moved = model.viewport.scroll_down(rows);
            model.user_scrolled(moved);
        }
        Message::HalfPageUp => {
            let rows = model.viewport.half_page_rows();
            let moved = model.viewport.scroll_up(rows);
            model.user_scrolled(moved);
        }
        Message::HalfPageDown => {
            let rows = model.viewport.half_page_rows();
            let moved = model.viewport.scroll_down(rows);
            model.user_scrolled(moved);
        }
        Message::GoToTop => {
            let moved = model.viewport.go_to_top();
            model.user_scrolled(moved);
        }
        Message::GoToBottom => {
            let moved = model.viewport.go_to_bottom();
            model.user_scrolled(moved);
        }

        // Sections
        Message::NavigateTo(id) => {
            if model.navigate_to(&id) {
                model.nav_focus = None;
            }
        }
        Message::NavActivate(idx) => {
            if let Some(target) = model.nav_items.get(idx).map(|item| item.target.clone())
                && model.navigate_to(&target)
            {
                model.nav_focus = None;
            }
        }
        Message::NavFocusNext | Message::NavFocusPrev => {
            let count = model.nav_items.len();
            if count > 0 {
                let forward = matches!(msg, Message::NavFocusNext);
                model.nav_focus = Some(match (model.nav_focus, forward) {
                    (None, true) => 0,
                    (None, false) => count - 1,
                    (Some(i), true) => (i + 1) % count,
                    (Some(i), false) => (i + count - 1) % count,
                });
                if model.nav_layout().compact && !model.navigator.menu_open() {
                    model.navigator.toggle_menu();
                }
            }
        }
        Message::NavFocusActivate => {
            if let Some(idx) = model.nav_focus {
                return update(model, Message::NavActivate(idx));
            }
        }
        Message::ToggleMenu => {
            model.navigator.toggle_menu();
            if !model.navigator.menu_open() {
                model.nav_focus = None;
            }
        }
        Message::CloseMenu => {
            model.navigator.close_menu();
            model.nav_focus = None;
        }

        // Help
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            model.help_scroll = 0;
        }
        Message::HideHelp => {
            model.help_visible = false;
            model.help_scroll = 0;
        }
        Message::HelpScrollUp => {
            model.help_scroll = model.help_scroll.saturating_sub(1);
        }
        Message::HelpScrollDown => {
            model.help_scroll = model.help_scroll.saturating_add(1);
        }

        // Contact
        Message::OpenContactForm => {
            if model.contact.recipient().is_empty() {
                model.show_toast(ToastLevel::Warning, "No contact address configured");
            } else {
                model.form_visible = true;
                model.form_error = None;
                model.navigator.close_menu();
                model.nav_focus = None;
            }
        }
        Message::CloseContactForm => {
            model.form_visible = false;
            model.form_error = None;
        }
        Message::FormInput(ch) => {
            if model.contact.insert_char(ch) {
                model.form_error = None;
            }
        }
        Message::FormBackspace => {
            if model.contact.backspace() {
                model.form_error = None;
            }
        }
        Message::FormNextField => model.contact.focus_next(),
        Message::FormPrevField => model.contact.focus_prev(),
        Message::FormSubmit => match model.contact.submit(model.now_ms()) {
            Ok(payload) => {
                model.form_error = None;
                debug!(subject = %payload.subject, "contact message queued");
                model.queue_outgoing(payload);
            }
            Err(err) => model.form_error = Some(err.to_string()),
        },
        Message::ContactDelivered(result) => {
            if !model.form_visible {
                match &result {
                    Ok(()) => model.show_toast(ToastLevel::Info, "Message sent"),
                    Err(reason) => {
                        model.show_toast(ToastLevel::Error, format!("Send failed: {reason}"));
                    }
                }
            }
            let now = model.now_ms();
            model.contact.complete(result, now);
        }

        // Content
        Message::ToggleWatch => {
            model.watch_enabled = !model.watch_enabled;
        }
        Message::FileChanged | Message::ForceReload => {
            // Handled in the event loop
        }

        // Window
        Message::Resize(width, height) => {
            model.viewport.resize(width, height.saturating_sub(1));
            model.relayout();
        }
        Message::Redraw => {}

        // Application
        Message::Quit => {
            model.should_quit = true;
        }
    }

    model
}
