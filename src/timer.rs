use std::time::{Duration, Instant};

/// Wall-clock auto-advance for the slideshow. Each advance re-measures from
/// the previous one; there is no drift correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideshowTimer {
    last_advance: Instant,
}

impl SlideshowTimer {
    pub fn started(now: Instant) -> Self {
        Self { last_advance: now }
    }

    pub fn last_advance(&self) -> Instant {
        self.last_advance
    }

    pub fn is_due(&self, now: Instant, interval: Duration) -> bool {
        is_due(now, self.last_advance, interval)
    }

    pub fn advanced(self, now: Instant) -> Self {
        Self { last_advance: now }
    }
}

/// True once at least `interval` has elapsed since `last_advance`.
/// A `now` earlier than `last_advance` is never due.
pub fn is_due(now: Instant, last_advance: Instant, interval: Duration) -> bool {
    now.checked_duration_since(last_advance)
        .is_some_and(|elapsed| elapsed >= interval)
}
