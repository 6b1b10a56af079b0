use crate::TimeSource;
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
use std::time::{Instant, SystemTime, UNIX_EPOCH};
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use web_time::{Instant, SystemTime, UNIX_EPOCH};

/// A monotonic time source that reports wall-clock milliseconds.
///
/// At construction the clock captures two readings: a monotonic
/// [`Instant`] and the current Unix time in milliseconds. Every later read
/// returns the captured Unix time plus the monotonic time elapsed since
/// construction.
///
/// Readings are therefore expressible as wall-clock milliseconds, yet they
/// never go backward when the system clock is adjusted (e.g., by NTP). The
/// price is that a clock created before a large wall-clock correction keeps
/// reporting the old alignment for its whole lifetime.
///
/// The clock is `Copy`: every copy shares the same alignment.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
    start_millis: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Constructs a clock aligned to the current wall-clock time.
    ///
    /// A system clock set before 1970 is treated as the Unix epoch itself.
    ///
    /// # Example
    ///
    /// ```
    /// use shortduid::{MonotonicClock, TimeSource};
    ///
    /// let clock = MonotonicClock::new();
    /// let a = clock.current_millis();
    /// std::thread::sleep(std::time::Duration::from_millis(2));
    /// let b = clock.current_millis();
    ///
    /// assert!(b >= a);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let start = Instant::now();
        let start_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since| since.as_millis() as u64);
        Self {
            start,
            start_millis,
        }
    }

    /// Returns the wall-clock Unix time, in milliseconds, captured when this
    /// clock was created.
    #[must_use]
    pub const fn start_millis(&self) -> u64 {
        self.start_millis
    }
}

impl TimeSource<u64> for MonotonicClock {
    /// Returns the captured wall-clock milliseconds plus the monotonic time
    /// elapsed since construction.
    fn current_millis(&self) -> u64 {
        self.start_millis + self.start.elapsed().as_millis() as u64
    }
}
