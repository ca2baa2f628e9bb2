//! Fixed-interval timer driven by explicit instants.
//!
//! The dashboard has no background threads: each simulated component owns
//! a [`Ticker`], and every poll converts the elapsed time into a whole
//! number of ticks. The remainder carries over to the next poll.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last: Instant,
}

impl Ticker {
    /// A ticker whose first tick fires one `interval` after `start`.
    /// Zero intervals are raised to one millisecond.
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            last: start,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of ticks that elapsed since the previous call, advancing the
    /// internal clock by exactly that many intervals. Every elapsed tick is
    /// reported, however long the gap.
    pub fn due(&mut self, now: Instant) -> u64 {
        let Some(elapsed) = now.checked_duration_since(self.last) else {
            return 0;
        };
        let interval_ns = self.interval.as_nanos();
        let ticks = elapsed.as_nanos() / interval_ns;
        if ticks == 0 {
            return 0;
        }

        let advance_ns = ticks * interval_ns;
        // Saturate rather than overflow on absurd gaps.
        let advance = Duration::from_nanos(u64::try_from(advance_ns).unwrap_or(u64::MAX));
        self.last = self.last.checked_add(advance).unwrap_or(now);

        u64::try_from(ticks).unwrap_or(u64::MAX)
    }

    /// Time left until the next tick.
    pub fn remaining(&self, now: Instant) -> Duration {
        let next = self.last + self.interval;
        next.saturating_duration_since(now)
    }
}
