//! Trailing-edge debouncing for high-frequency notifications.
//!
//! The event loop owns a monotonic millisecond clock and feeds it into
//! [`Debouncer::notify`] and [`Debouncer::take_ready`]; nothing here reads
//! the wall clock, so behavior is deterministic under test.

/// A scheduled deadline carrying the most recent value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingTimer<T> {
    value: T,
    deadline_ms: u64,
}

/// Coalesces bursts of notifications into one delivery after a quiet period.
///
/// Every notification cancels the pending timer and schedules a new one
/// `delay_ms` later, carrying the latest value. A value is released at
/// most once per quiet period. After [`Debouncer::teardown`] nothing is
/// scheduled or released again.
///
/// # Example
///
/// ```
/// use folio::nav::Debouncer;
///
/// let mut scroll = Debouncer::new(100);
/// scroll.notify(10_usize, 0);
/// scroll.notify(25, 40);
/// assert_eq!(scroll.take_ready(120), None);
/// assert_eq!(scroll.take_ready(140), Some(25));
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<PendingTimer<T>>,
    torn_down: bool,
}

impl<T> Debouncer<T> {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
            torn_down: false,
        }
    }

    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Record a notification, rescheduling the deadline.
    ///
    /// Returns false when the debouncer has been torn down.
    pub fn notify(&mut self, value: T, now_ms: u64) -> bool {
        if self.torn_down {
            return false;
        }
        self.pending = Some(PendingTimer {
            value,
            deadline_ms: now_ms.saturating_add(self.delay_ms),
        });
        true
    }

    /// Release the latest value once its deadline has passed.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        if self.torn_down {
            return None;
        }
        let deadline_ms = self.pending.as_ref()?.deadline_ms;
        if now_ms < deadline_ms {
            return None;
        }
        self.pending.take().map(|timer| timer.value)
    }

    /// Drop the pending timer, if any. Returns whether one was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Cancel the pending timer and refuse further scheduling.
    pub fn teardown(&mut self) {
        self.cancel();
        self.torn_down = true;
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// When the pending timer fires, if one is scheduled.
    pub fn deadline_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|timer| timer.deadline_ms)
    }
}
