//! Slideshow interval table and session-wide brightness/contrast values.

use std::time::Duration;

/// Selectable slideshow intervals, in seconds.
pub const SLIDESHOW_INTERVALS: [u64; 5] = [3, 5, 10, 30, 60];

pub const ADJUSTMENT_MIN: i32 = -50;
pub const ADJUSTMENT_MAX: i32 = 50;

/// Cursor into [`SLIDESHOW_INTERVALS`]; wraps in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalCursor {
    index: usize,
}

impl IntervalCursor {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index: index % SLIDESHOW_INTERVALS.len(),
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn seconds(&self) -> u64 {
        SLIDESHOW_INTERVALS[self.index]
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.seconds())
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % SLIDESHOW_INTERVALS.len();
    }

    pub fn prev(&mut self) {
        let len = SLIDESHOW_INTERVALS.len();
        self.index = (self.index + len - 1) % len;
    }
}

impl Default for IntervalCursor {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Which adjustment the Left/Right buttons edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdjustFocus {
    #[default]
    Brightness,
    Contrast,
}

impl AdjustFocus {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Brightness => Self::Contrast,
            Self::Contrast => Self::Brightness,
        }
    }
}

/// Brightness and contrast, each kept within
/// [`ADJUSTMENT_MIN`]..=[`ADJUSTMENT_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Adjustments {
    brightness: i32,
    contrast: i32,
}

impl Adjustments {
    #[must_use]
    pub fn new(brightness: i32, contrast: i32) -> Self {
        Self {
            brightness: clamp(brightness),
            contrast: clamp(contrast),
        }
    }

    #[must_use]
    pub const fn brightness(&self) -> i32 {
        self.brightness
    }

    #[must_use]
    pub const fn contrast(&self) -> i32 {
        self.contrast
    }

    #[must_use]
    pub const fn get(&self, focus: AdjustFocus) -> i32 {
        match focus {
            AdjustFocus::Brightness => self.brightness,
            AdjustFocus::Contrast => self.contrast,
        }
    }

    /// Saturating step of the focused value.
    pub fn nudge(&mut self, focus: AdjustFocus, delta: i32) {
        let slot = match focus {
            AdjustFocus::Brightness => &mut self.brightness,
            AdjustFocus::Contrast => &mut self.contrast,
        };
        *slot = clamp(slot.saturating_add(delta));
    }

    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        self.brightness == 0 && self.contrast == 0
    }
}

fn clamp(v: i32) -> i32 {
    v.clamp(ADJUSTMENT_MIN, ADJUSTMENT_MAX)
}
