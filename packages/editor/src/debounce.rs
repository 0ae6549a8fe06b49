//! Clocks and coalescing timers
//!
//! The session never sleeps. A [`Debounced`] value remembers when it becomes
//! due, and the host calls `tick` to let due work run.

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.advance(Duration::milliseconds(ms));
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.now.set(to);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

#[derive(Debug)]
struct Pending<T> {
    due: DateTime<Utc>,
    value: T,
}

/// A value that becomes due after a quiet period.
///
/// Scheduling again before the deadline replaces the pending value and
/// restarts the quiet period, so a burst of calls settles once.
#[derive(Debug)]
pub struct Debounced<T> {
    quiet: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debounced<T> {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, pending: None }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX / 1_000_000)))
    }

    /// Replace any pending value and restart the quiet period
    pub fn schedule(&mut self, now: DateTime<Utc>, value: T) {
        self.pending = Some(Pending {
            due: now + self.quiet,
            value,
        });
    }

    /// Take the value if its quiet period has elapsed
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Option<T> {
        match &self.pending {
            Some(pending) if pending.due <= now => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Take the value regardless of its deadline
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.pending.as_ref().map(|p| p.due)
    }
}
