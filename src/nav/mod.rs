//! Scroll-synchronized navigation.
//!
//! The nav bar highlights whichever section is in view. The pipeline is:
//!
//! - the viewport reports scroll offsets to a trailing-edge [`Debouncer`]
//! - once scrolling settles, a [`RegionRegistry`] snapshot is taken
//! - [`resolve`] picks the active region by first match in document order
//! - the [`NavStore`] records it for the next render
//!
//! Activating a nav item goes through [`Navigator::navigate_to`], which
//! starts a [`SmoothScroll`] toward the region and marks it active right
//! away. The animation's own scroll steps re-enter the pipeline and
//! confirm the same region when motion stops.

mod registry;
mod resolver;
mod scroll;
mod state;
mod throttle;

pub use registry::{Region, RegionRegistry};
pub use resolver::resolve;
pub use scroll::{ScrollSurface, SmoothScroll, clamp_target, scroll_target};
pub use state::{NavStore, NavigationState};
pub use throttle::Debouncer;

use tracing::debug;

/// Rows covered by the fixed nav bar.
///
/// Used both as the activation offset for resolution and as the gap left
/// above a section when scrolling to it.
pub const NAV_HEIGHT: u16 = 3;

/// Quiet period before a scroll position is resolved.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Interval between smooth-scroll animation frames.
pub const ANIMATION_FRAME_MS: u64 = 16;

/// Tunables for the navigation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavConfig {
    pub nav_height: u16,
    pub debounce_ms: u64,
    pub smooth_scroll: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            nav_height: NAV_HEIGHT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            smooth_scroll: true,
        }
    }
}

/// Owns navigation state and the timers that keep it in sync with scrolling.
#[derive(Debug, Clone)]
pub struct Navigator {
    config: NavConfig,
    store: NavStore,
    scroll_debouncer: Debouncer<usize>,
    animation: SmoothScroll,
    /// Region the animation is heading for
    animating_to: Option<String>,
    next_frame_ms: u64,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(NavConfig::default(), "")
    }
}

impl Navigator {
    pub fn new(config: NavConfig, initial_id: impl Into<String>) -> Self {
        Self {
            config,
            store: NavStore::new(initial_id),
            scroll_debouncer: Debouncer::new(config.debounce_ms),
            animation: SmoothScroll::default(),
            animating_to: None,
            next_frame_ms: 0,
        }
    }

    pub const fn config(&self) -> NavConfig {
        self.config
    }

    fn nav_offset(&self) -> i64 {
        i64::from(self.config.nav_height)
    }

    /// Resolve once without waiting, so the bar is correct before any scroll.
    pub fn mount(&mut self, registry: &impl RegionRegistry, scroll_offset: usize) -> bool {
        self.resolve_now(registry, scroll_offset)
    }

    /// Resolve `scroll_offset` against a fresh snapshot immediately.
    ///
    /// Returns true when the active region changed.
    pub fn resolve_now(&mut self, registry: &impl RegionRegistry, scroll_offset: usize) -> bool {
        let regions = registry.snapshot();
        let scroll_y = i64::try_from(scroll_offset).unwrap_or(i64::MAX);
        let Some(id) = resolve(scroll_y, &regions, self.nav_offset()) else {
            debug!(scroll_y, regions = regions.len(), "no region at offset, keeping active");
            return false;
        };
        let changed = self.store.set_active(id);
        if changed {
            debug!(scroll_y, active = id, "active region resolved");
        }
        changed
    }

    /// Record a raw scroll notification. Resolution waits for the quiet period.
    pub fn on_scroll(&mut self, scroll_offset: usize, now_ms: u64) {
        self.scroll_debouncer.notify(scroll_offset, now_ms);
    }

    /// A scroll the user performed directly; it overrides any animation.
    pub fn on_user_scroll(&mut self, scroll_offset: usize, now_ms: u64) {
        self.animation.cancel();
        self.on_scroll(scroll_offset, now_ms);
    }

    /// Resolve the settled scroll position if the quiet period has elapsed.
    pub fn poll(&mut self, registry: &impl RegionRegistry, now_ms: u64) -> bool {
        let Some(offset) = self.scroll_debouncer.take_ready(now_ms) else {
            return false;
        };
        self.resolve_now(registry, offset)
    }

    /// Scroll to the region `id` and mark it active immediately.
    ///
    /// Unknown ids are ignored. Returns whether navigation happened.
    pub fn navigate_to(
        &mut self,
        id: &str,
        registry: &impl RegionRegistry,
        surface: &mut impl ScrollSurface,
        now_ms: u64,
    ) -> bool {
        let Some(region) = registry.region(id) else {
            debug!(id, "navigation target not found");
            return false;
        };
        let target = clamp_target(
            scroll_target(&region, self.nav_offset()),
            surface.max_scroll_offset(),
        );

        if self.config.smooth_scroll {
            self.animation.start(target);
            self.animating_to = Some(region.id.clone());
            self.next_frame_ms = now_ms;
            self.tick_animation(surface, now_ms);
        } else {
            self.animation.cancel();
            if surface.scroll_offset() != target {
                surface.set_scroll_offset(target);
                self.on_scroll(surface.scroll_offset(), now_ms);
            }
        }

        self.store.close_menu();
        self.store.set_active(&region.id);
        debug!(id, target, "navigated");
        true
    }

    /// Point a smooth scroll in flight at its region's current position.
    ///
    /// Call after the registry's geometry changed. The animation stops if
    /// its region is gone. Returns whether an animation is still running.
    pub fn retarget(
        &mut self,
        registry: &impl RegionRegistry,
        surface: &impl ScrollSurface,
    ) -> bool {
        if !self.animation.is_animating() {
            return false;
        }
        let region = self
            .animating_to
            .as_deref()
            .and_then(|id| registry.region(id));
        let Some(region) = region else {
            debug!(id = ?self.animating_to, "animation target vanished");
            self.animation.cancel();
            return false;
        };
        let target = clamp_target(
            scroll_target(&region, self.nav_offset()),
            surface.max_scroll_offset(),
        );
        debug!(id = %region.id, target, "animation retargeted");
        self.animation.start(target);
        true
    }

    /// Advance the smooth scroll by one frame if one is due.
    ///
    /// Every frame that moves the surface counts as a scroll notification.
    pub fn tick_animation(&mut self, surface: &mut impl ScrollSurface, now_ms: u64) -> bool {
        if !self.animation.is_animating() || now_ms < self.next_frame_ms {
            return false;
        }
        self.next_frame_ms = now_ms.saturating_add(ANIMATION_FRAME_MS);
        match self.animation.step(surface) {
            Some(offset) => {
                self.on_scroll(offset, now_ms);
                true
            }
            None => false,
        }
    }

    pub const fn is_animating(&self) -> bool {
        self.animation.is_animating()
    }

    /// Earliest time the event loop must wake up for this navigator.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        let frame = self.animation.is_animating().then_some(self.next_frame_ms);
        match (frame, self.scroll_debouncer.deadline_ms()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub const fn is_settling(&self) -> bool {
        self.scroll_debouncer.is_pending()
    }

    pub const fn toggle_menu(&mut self) {
        self.store.toggle_menu();
    }

    pub const fn close_menu(&mut self) -> bool {
        self.store.close_menu()
    }

    pub fn active_id(&self) -> &str {
        self.store.active_id()
    }

    pub const fn menu_open(&self) -> bool {
        self.store.menu_open()
    }

    pub const fn state(&self) -> &NavigationState {
        self.store.state()
    }

    /// Cancel pending work before the view goes away.
    pub fn teardown(&mut self) {
        self.scroll_debouncer.teardown();
        self.animation.cancel();
    }
}
