//! Clock Module
//!
//! Time source abstraction used by the TTL cache. Production code reads the
//! monotonic system clock; tests drive a [`MockClock`] by hand.
//!
//! The cache never detects a clock moving backwards. With a custom clock that
//! does, expired entries may become visible again until they are reclaimed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

// == Clock Trait ==
/// Source of the current instant.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

// == System Clock ==
/// Clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// == Mock Clock ==
/// Manually advanced clock for deterministic tests.
///
/// Clones share the same elapsed time, so a test can keep one handle and hand
/// another to the cache.
///
/// ```
/// use std::time::Duration;
/// use mini_cache::clock::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(5));
/// assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Creates a mock clock frozen at the current real instant.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    /// Sets the elapsed time since creation. May move the clock backwards.
    pub fn set_elapsed(&self, elapsed: Duration) {
        *self.elapsed.lock() = elapsed;
    }

    /// Returns the elapsed time since creation.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock()
    }
}
