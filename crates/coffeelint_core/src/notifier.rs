//! Rate limiting for user-visible failure notifications.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Minimum interval between two notifications.
pub const DEFAULT_NOTIFY_INTERVAL: Duration = Duration::from_secs(5);

const NEVER: u64 = u64::MAX;

/// Allows at most one notification per interval.
///
/// Construct one per surface and share it by reference (or `Arc`) with every
/// place that reports lint failures.
#[derive(Debug)]
pub struct DebouncedNotifier {
    origin: Instant,
    interval: Duration,
    /// Milliseconds since `origin` of the last notification, or `NEVER`.
    last_notified: AtomicU64,
}

impl DebouncedNotifier {
    /// Creates a notifier with the default 5 second interval.
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_NOTIFY_INTERVAL)
    }

    /// Creates a notifier with a custom interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            interval,
            last_notified: AtomicU64::new(NEVER),
        }
    }

    /// Returns `true` if a notification may be shown now.
    pub fn should_notify(&self) -> bool {
        self.is_due(self.last_notified.load(Ordering::Acquire), self.now_ms())
    }

    /// Records that a notification was shown.
    pub fn mark_notified(&self) {
        self.last_notified.store(self.now_ms(), Ordering::Release);
    }

    /// Checks and records in one step. Only one of several concurrent
    /// callers wins within an interval.
    pub fn try_acquire(&self) -> bool {
        let now = self.now_ms();
        let mut last = self.last_notified.load(Ordering::Acquire);
        loop {
            if !self.is_due(last, now) {
                return false;
            }
            match self.last_notified.compare_exchange_weak(
                last,
                now,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => last = actual,
            }
        }
    }

    fn is_due(&self, last: u64, now: u64) -> bool {
        last == NEVER || now.saturating_sub(last) >= self.interval.as_millis() as u64
    }

    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl Default for DebouncedNotifier {
    fn default() -> Self {
        Self::new()
    }
}
