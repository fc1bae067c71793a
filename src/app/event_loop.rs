use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{debug, info, trace, warn};

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::config::default_outbox_path;
use crate::contact::{Dispatcher, mailer_from_env};
use crate::content::Portfolio;
use crate::nav::Debouncer;
use crate::ui::style::{Palette, Theme};
use crate::watcher::ContentWatcher;

/// Quiet period before a terminal resize triggers a relayout.
pub(super) const RESIZE_DEBOUNCE_MS: u64 = 100;

/// Longest the loop sleeps when nothing is scheduled.
const IDLE_POLL_MS: u64 = 250;

/// Poll interval while a message is being sent.
const SENDING_POLL_MS: u64 = 50;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be loaded, the terminal cannot
    /// be initialized, or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        // Theme detection reads the environment before raw mode starts.
        let theme = Theme::resolve(self.theme);
        let portfolio = self.load_portfolio()?;
        let dangling = portfolio.dangling_nav_targets().join(", ");

        let outbox = self.outbox.clone().unwrap_or_else(default_outbox_path);
        let mut dispatcher = Dispatcher::new(mailer_from_env(&outbox));
        info!(mailer = %dispatcher.describe(), ?theme, "starting");

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal: folio requires an interactive terminal")?;
        let size = match terminal.size() {
            Ok(size) => size,
            Err(err) => {
                ratatui::restore();
                return Err(err).context("Failed to read terminal size");
            }
        };

        let mut model = Model::new(portfolio, (size.width, size.height), self.nav_config);
        model.palette = Palette::new(theme);
        model.watch_enabled = self.watch_enabled;
        model.content_path.clone_from(&self.content_path);
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model.mailer_label = Some(dispatcher.describe());
        if !dangling.is_empty() {
            warn!(targets = %dangling, "nav items point at missing sections");
            model.show_toast(
                ToastLevel::Warning,
                format!("Nav links to missing sections: {dangling}"),
            );
        }

        let mut resize_debouncer = Debouncer::new(RESIZE_DEBOUNCE_MS);
        let result = Self::event_loop(
            &mut terminal,
            &mut model,
            &mut dispatcher,
            &mut resize_debouncer,
        );
        Self::teardown(&mut model, &mut resize_debouncer);
        if let Err(err) = &result {
            warn!("event loop failed: {err:#}");
        }

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn load_portfolio(&self) -> Result<Portfolio> {
        match &self.content_path {
            Some(path) => Portfolio::load(path)
                .with_context(|| format!("Failed to load {}", path.display())),
            None => Portfolio::builtin().context("Built-in portfolio is invalid"),
        }
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        dispatcher: &mut Dispatcher,
        resize_debouncer: &mut Debouncer<(u16, u16)>,
    ) -> Result<()> {
        let start = Instant::now();
        let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut watcher = if model.watch_enabled {
            Self::make_content_watcher(model)
        } else {
            None
        };
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        execute!(stdout(), EnableMouseCapture)?;

        loop {
            let now_ms = elapsed_ms();
            model.set_clock(now_ms);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                debug!(width, height, "resize applied");
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            if model.poll_timers(now_ms) {
                needs_render = true;
            }

            while let Some(result) = dispatcher.poll() {
                match &result {
                    Ok(()) => info!("contact message delivered"),
                    Err(reason) => warn!(%reason, "contact message failed"),
                }
                *model = update(std::mem::take(model), Message::ContactDelivered(result));
                needs_render = true;
            }

            if model.watch_enabled
                && watcher
                    .as_mut()
                    .is_some_and(|w| w.take_change_ready(now_ms))
            {
                *model = update(std::mem::take(model), Message::FileChanged);
                Self::handle_message_side_effects(
                    model,
                    &mut watcher,
                    dispatcher,
                    &Message::FileChanged,
                );
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else {
                Self::poll_timeout_ms(model, resize_debouncer, watcher.as_ref(), dispatcher, now_ms)
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Coalesce key repeat bursts into a single render.
                loop {
                    let event_ms = elapsed_ms();
                    model.set_clock(event_ms);
                    let msg = Self::handle_event(
                        &event::read()?,
                        model,
                        event_ms,
                        resize_debouncer,
                    );
                    if let Some(msg) = msg {
                        trace!(frame = frame_idx, ?msg, "message");
                        let side_msg = msg.clone();
                        *model = update(std::mem::take(model), msg);
                        Self::handle_message_side_effects(
                            model,
                            &mut watcher,
                            dispatcher,
                            &side_msg,
                        );
                        needs_render = true;
                    }
                    if !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }

            if needs_render {
                frame_idx += 1;
                terminal.draw(|frame| Self::view(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }

        debug!(frames = frame_idx, "event loop finished");
        Ok(())
    }

    /// Cancel every pending timer. Runs however the loop ended.
    pub(super) fn teardown(model: &mut Model, resize_debouncer: &mut Debouncer<(u16, u16)>) {
        resize_debouncer.teardown();
        model.navigator.teardown();
        debug!("timers torn down");
    }

    /// How long to block for input before a timer needs servicing.
    pub(super) fn poll_timeout_ms(
        model: &Model,
        resize_debouncer: &Debouncer<(u16, u16)>,
        watcher: Option<&ContentWatcher>,
        dispatcher: &Dispatcher,
        now_ms: u64,
    ) -> u64 {
        let idle = if dispatcher.in_flight() > 0 {
            SENDING_POLL_MS
        } else {
            IDLE_POLL_MS
        };
        [
            model.next_deadline_ms(),
            resize_debouncer.deadline_ms(),
            watcher.and_then(ContentWatcher::deadline_ms),
        ]
        .into_iter()
        .flatten()
        .min()
        .map_or(idle, |deadline| deadline.saturating_sub(now_ms).min(idle))
    }
}
