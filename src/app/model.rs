use std::path::PathBuf;

use anyhow::{Context, Result};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::contact::{ContactForm, ContactPayload};
use crate::content::{Document, NavItem, Portfolio};
use crate::nav::{NavConfig, Navigator};
use crate::ui::document_content_width;
use crate::ui::nav_bar::NavBarLayout;
use crate::ui::style::Palette;
use crate::ui::viewport::Viewport;

/// How long a toast stays on screen.
const TOAST_MS: u64 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at_ms: u64,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. Time enters only
/// through [`Model::set_clock`], so every transition is reproducible.
#[derive(Debug, Default)]
pub struct Model {
    /// Loaded portfolio content
    pub portfolio: Portfolio,
    /// Nav bar entries in display order
    pub nav_items: Vec<NavItem>,
    /// Mark shown at the left of the nav bar
    pub brand: String,
    /// Content laid out at the current width
    pub document: Document,
    /// Viewport managing scroll position
    pub viewport: Viewport,
    /// Active section tracking and scroll animation
    pub navigator: Navigator,
    /// Contact form fields and submit status
    pub contact: ContactForm,
    /// Whether the contact form popup is open
    pub form_visible: bool,
    /// Last validation problem, shown inside the form
    pub form_error: Option<String>,
    /// Nav item with keyboard focus
    pub nav_focus: Option<usize>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    pub help_scroll: usize,
    /// Whether file watching is enabled
    pub watch_enabled: bool,
    /// Content file; `None` means the built-in portfolio
    pub content_path: Option<PathBuf>,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Where contact messages go, shown in help
    pub mailer_label: Option<String>,
    pub palette: Palette,
    /// Whether the app should quit
    pub should_quit: bool,
    clock_ms: u64,
    toast: Option<Toast>,
    outgoing: Option<ContactPayload>,
}

impl Model {
    /// Create a model for `portfolio` on a terminal of `terminal_size`.
    ///
    /// The active section is resolved once right away so the nav bar is
    /// correct on the first frame.
    pub fn new(portfolio: Portfolio, terminal_size: (u16, u16), nav_config: NavConfig) -> Self {
        let (width, height) = terminal_size;
        let view_height = height.saturating_sub(1);
        let mut document = Document::layout(&portfolio, document_content_width(width));
        document.pad_for_viewport(view_height);
        let viewport = Viewport::new(width, view_height, document.line_count());
        let mut navigator = Navigator::new(nav_config, portfolio.initial_section_id());
        navigator.mount(&document, viewport.offset());

        Self {
            nav_items: portfolio.nav_items(),
            brand: portfolio.brand(),
            contact: ContactForm::new(portfolio.email.clone().unwrap_or_default()),
            portfolio,
            document,
            viewport,
            navigator,
            ..Self::default()
        }
    }

    pub const fn set_clock(&mut self, now_ms: u64) {
        if now_ms > self.clock_ms {
            self.clock_ms = now_ms;
        }
    }

    pub const fn now_ms(&self) -> u64 {
        self.clock_ms
    }

    /// The whole terminal, status bar included.
    pub const fn screen_area(&self) -> Rect {
        Rect::new(
            0,
            0,
            self.viewport.width(),
            self.viewport.height().saturating_add(1),
        )
    }

    pub fn nav_layout(&self) -> NavBarLayout {
        let labels: Vec<&str> = self.nav_items.iter().map(|i| i.label.as_str()).collect();
        NavBarLayout::compute(
            self.screen_area(),
            &self.brand,
            &labels,
            self.navigator.menu_open(),
        )
    }

    /// Human-readable name of the active section.
    pub fn active_label(&self) -> String {
        let active = self.navigator.active_id();
        self.nav_items
            .iter()
            .find(|item| item.target == active)
            .map(|item| item.label.clone())
            .or_else(|| {
                self.document
                    .section(active)
                    .and_then(|span| span.title.clone())
            })
            .unwrap_or_else(|| active.to_string())
    }

    /// Scroll to a section through the navigator.
    pub fn navigate_to(&mut self, id: &str) -> bool {
        self.navigator
            .navigate_to(id, &self.document, &mut self.viewport, self.clock_ms)
    }

    /// Report a scroll the user made directly.
    pub(super) fn user_scrolled(&mut self, moved: bool) {
        if moved {
            self.navigator
                .on_user_scroll(self.viewport.offset(), self.clock_ms);
        }
    }

    /// Lay the content out again at the current size and re-resolve.
    ///
    /// A smooth scroll in flight is pointed at the new position of its
    /// section instead of the row it was computed from.
    pub(super) fn relayout(&mut self) {
        self.document = Document::layout(
            &self.portfolio,
            document_content_width(self.viewport.width()),
        );
        self.document.pad_for_viewport(self.viewport.height());
        self.viewport.set_total_lines(self.document.line_count());
        // A running animation confirms its own section once it settles.
        if !self.navigator.retarget(&self.document, &self.viewport) {
            self.navigator
                .resolve_now(&self.document, self.viewport.offset());
        }
        debug!(
            width = self.viewport.width(),
            lines = self.document.line_count(),
            "relayout"
        );
    }

    /// Replace the portfolio and relayout.
    pub(super) fn set_portfolio(&mut self, portfolio: Portfolio) {
        self.nav_items = portfolio.nav_items();
        self.brand = portfolio.brand();
        self.portfolio = portfolio;
        if let Some(focus) = self.nav_focus
            && focus >= self.nav_items.len()
        {
            self.nav_focus = None;
        }
        self.relayout();
    }

    /// Re-read the content file (or the built-in portfolio).
    pub(super) fn reload_content(&mut self) -> Result<()> {
        let portfolio = match &self.content_path {
            Some(path) => Portfolio::load(path)
                .with_context(|| format!("Failed to reload {}", path.display()))?,
            None => Portfolio::builtin().context("Built-in portfolio is invalid")?,
        };
        self.set_portfolio(portfolio);
        info!(sections = self.document.sections().len(), "content reloaded");
        Ok(())
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at_ms: self.clock_ms.saturating_add(TOAST_MS),
        });
    }

    fn expire_toast(&mut self, now_ms: u64) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at_ms <= now_ms)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    pub(super) fn queue_outgoing(&mut self, payload: ContactPayload) {
        self.outgoing = Some(payload);
    }

    /// Message waiting to be handed to the mailer.
    pub fn take_outgoing(&mut self) -> Option<ContactPayload> {
        self.outgoing.take()
    }

    /// Advance every timer to `now_ms`. Returns whether a redraw is needed.
    pub fn poll_timers(&mut self, now_ms: u64) -> bool {
        self.set_clock(now_ms);
        let now = self.clock_ms;
        let animated = self.navigator.tick_animation(&mut self.viewport, now);
        let resolved = self.navigator.poll(&self.document, now);
        let form = self.contact.tick(now);
        let toast = self.expire_toast(now);
        animated || resolved || form || toast
    }

    /// Earliest time a timer needs servicing.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        [
            self.navigator.next_deadline_ms(),
            self.contact.status_deadline_ms(),
            self.toast.as_ref().map(|toast| toast.expires_at_ms),
        ]
        .into_iter()
        .flatten()
        .min()
    }
}
