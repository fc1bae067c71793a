use tracing::{info, warn};

use crate::app::{App, Message, Model, ToastLevel};
use crate::contact::Dispatcher;
use crate::watcher::{ContentWatcher, RELOAD_DEBOUNCE_MS};

impl App {
    /// Build a watcher for the model's content file.
    ///
    /// Turns watching off with a toast when there is no file or the OS
    /// refuses the watch.
    pub(super) fn make_content_watcher(model: &mut Model) -> Option<ContentWatcher> {
        let Some(path) = model.content_path.clone() else {
            model.watch_enabled = false;
            model.show_toast(ToastLevel::Warning, "Nothing to watch: built-in portfolio");
            return None;
        };
        match ContentWatcher::new(&path, RELOAD_DEBOUNCE_MS) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                model.watch_enabled = false;
                model.show_toast(ToastLevel::Warning, format!("Watch unavailable: {err}"));
                warn!(path = %path.display(), %err, "failed to watch content");
                None
            }
        }
    }

    pub(super) fn handle_message_side_effects(
        model: &mut Model,
        watcher: &mut Option<ContentWatcher>,
        dispatcher: &mut Dispatcher,
        msg: &Message,
    ) {
        match msg {
            Message::ToggleWatch => {
                if model.watch_enabled {
                    *watcher = Self::make_content_watcher(model);
                    if watcher.is_some() {
                        model.show_toast(ToastLevel::Info, "Watching content changes");
                    }
                } else {
                    *watcher = None;
                    model.show_toast(ToastLevel::Info, "Watch disabled");
                }
            }
            Message::ForceReload | Message::FileChanged => {
                if let Err(err) = model.reload_content() {
                    model.show_toast(ToastLevel::Error, format!("Reload failed: {err:#}"));
                    warn!(err = %format!("{err:#}"), "reload failed");
                } else if matches!(msg, Message::ForceReload) {
                    model.show_toast(ToastLevel::Info, "Reloaded");
                }
            }
            Message::FormSubmit => {
                if let Some(payload) = model.take_outgoing() {
                    info!(via = %dispatcher.describe(), "sending contact message");
                    dispatcher.submit(payload);
                }
            }
            _ => {}
        }
    }
}
