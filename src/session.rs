//! The screen's single mutable aggregate and its lock.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::listing::ListEntry;
use crate::pipeline::OpenedImage;
use crate::settings::{AdjustFocus, Adjustments, IntervalCursor};
use crate::timer::SlideshowTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    Viewing,
    Slideshow(SlideshowTimer),
    SlideshowSettings,
    ImageAdjustment { focus: AdjustFocus },
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Browsing => "browsing",
            Self::Viewing => "viewing",
            Self::Slideshow(_) => "slideshow",
            Self::SlideshowSettings => "slideshow-settings",
            Self::ImageAdjustment { .. } => "image-adjustment",
        }
    }

    /// Whether the Settings gesture means anything here. Elsewhere a long
    /// Confirm stays a Confirm.
    pub fn accepts_settings(&self) -> bool {
        matches!(self, Self::Browsing | Self::Viewing)
    }
}

#[derive(Debug)]
pub struct Session {
    pub mode: Mode,
    /// Current directory; `/` or a path ending in `/`.
    pub base_path: String,
    pub entries: Vec<ListEntry>,
    pub selector_index: usize,
    pub images: Vec<String>,
    pub current_image: usize,
    /// Decoded current image, or why it could not be shown.
    pub viewed: Option<OpenedImage>,
    pub interval: IntervalCursor,
    pub adjustments: Adjustments,
    dirty: bool,
}

impl Session {
    pub fn new(interval: IntervalCursor) -> Self {
        Self {
            mode: Mode::Browsing,
            base_path: "/".to_string(),
            entries: Vec::new(),
            selector_index: 0,
            images: Vec::new(),
            current_image: 0,
            viewed: None,
            interval,
            adjustments: Adjustments::default(),
            dirty: true,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn selected_entry(&self) -> Option<&ListEntry> {
        self.entries.get(self.selector_index)
    }

    pub fn current_image_name(&self) -> Option<&str> {
        self.images.get(self.current_image).map(String::as_str)
    }

    /// Replace the browser rows, resetting the selection.
    pub fn set_entries(&mut self, entries: Vec<ListEntry>) {
        self.entries = entries;
        self.selector_index = 0;
    }
}

/// Shared handle to the [`Session`]. Every access holds the lock for exactly
/// the closure's duration.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Mutate the session and mark it dirty.
    pub fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self.inner.lock();
        let out = f(&mut session);
        session.dirty = true;
        out
    }

    /// If the session is dirty, clear the flag and run `f` with the lock held
    /// for its whole duration. Returns whether `f` ran.
    pub fn render_if_dirty(&self, f: impl FnOnce(&Session)) -> bool {
        let mut session = self.inner.lock();
        if !session.dirty {
            return false;
        }
        session.dirty = false;
        f(&session);
        true
    }
}
