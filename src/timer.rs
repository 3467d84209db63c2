use std::time::{Duration, Instant};

/// A periodic tick. The engine holds at most one of these; replacing it is how
/// the interval changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickTimer {
    interval: Duration,
    next_due: Instant,
}

impl TickTimer {
    pub fn start(interval: Duration, now: Instant) -> Self {
        TickTimer { interval, next_due: now + interval }
    }

    /// Returns true if the tick is due, and re-arms for one interval after `now`.
    /// A late poll yields a single tick, never a burst.
    pub fn fire(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }

        self.next_due = now + self.interval;
        true
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}
