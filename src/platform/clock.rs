use std::cell::Cell;
use std::time::Instant;

/// Millisecond tick source
///
/// Readings wrap around at `u32::MAX`, like a hardware tick counter, so
/// intervals must always go through [`Clock::elapsed_ms`].
pub trait Clock {
    fn now_ms(&self) -> u32;

    /// Milliseconds from `earlier` to `now`, correct across one wraparound
    fn elapsed_ms(&self, now: u32, earlier: u32) -> u32 {
        now.wrapping_sub(earlier)
    }
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the wraparound.
        self.origin.elapsed().as_millis() as u32
    }
}

/// Clock that only moves when told to, for replays and tests
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub fn starting_at(ms: u32) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}
