//! Session state machine: interprets input events into mode transitions.
//!
//! Storage and decode work runs without the session lock; only the final
//! commit of its result is lock-guarded.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::codec::ImageCodec;
use crate::config::GalleryConfig;
use crate::input::{Button, InputEvent, InputMapper, InputSource};
use crate::listing::{self, ListEntry};
use crate::navigation;
use crate::pipeline::{ImageOpenPipeline, OpenedImage};
use crate::session::{Mode, SessionHandle};
use crate::settings::AdjustFocus;
use crate::storage::{self, Storage};
use crate::timer::SlideshowTimer;

/// Callback that leaves the screen entirely.
pub type GoHome = Box<dyn FnMut() + Send>;

#[derive(Debug, Clone, Copy)]
struct Thresholds {
    page_skip_hold: Duration,
    go_home_hold: Duration,
    settings_confirm_guard: Duration,
}

pub struct Controller {
    session: SessionHandle,
    storage: Arc<dyn Storage>,
    codec: Arc<dyn ImageCodec>,
    mapper: InputMapper,
    thresholds: Thresholds,
    page_size: usize,
    temp_path: String,
    on_go_home: GoHome,
}

impl Controller {
    pub fn new(
        config: &GalleryConfig,
        session: SessionHandle,
        storage: Arc<dyn Storage>,
        codec: Arc<dyn ImageCodec>,
        on_go_home: GoHome,
    ) -> Self {
        Self {
            session,
            storage,
            codec,
            mapper: InputMapper::new(config.settings_hold),
            thresholds: Thresholds {
                page_skip_hold: config.page_skip_hold,
                go_home_hold: config.go_home_hold,
                settings_confirm_guard: config.settings_confirm_guard,
            },
            page_size: config.page_size,
            temp_path: config.temp_image_path.clone(),
            on_go_home,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Rebuild the browser rows for the current directory.
    pub fn reload_entries(&self) {
        let base = self.session.read(|s| s.base_path.clone());
        self.change_dir(base);
    }

    /// One input-context iteration: map polled buttons, then run the
    /// slideshow clock.
    pub fn poll(&mut self, input: &dyn InputSource, now: Instant) {
        let settings_enabled = self.session.read(|s| s.mode.accepts_settings());
        if let Some(event) = self.mapper.map(input, settings_enabled) {
            self.handle(event, now);
        }
        self.tick(now);
    }

    pub fn handle(&mut self, event: InputEvent, now: Instant) {
        let mode = self.session.read(|s| s.mode);
        match mode {
            Mode::Browsing => self.on_browsing(event, now),
            Mode::Viewing => self.on_viewing(event, now),
            Mode::Slideshow(_) => self.on_slideshow(event),
            Mode::SlideshowSettings => self.on_slideshow_settings(event),
            Mode::ImageAdjustment { focus } => self.on_image_adjustment(event, focus),
        }
    }

    /// Advance the slideshow when its interval has elapsed.
    pub fn tick(&mut self, now: Instant) {
        let due = self.session.read(|s| match s.mode {
            Mode::Slideshow(timer) if timer.is_due(now, s.interval.interval()) => {
                navigation::step(s.current_image, s.images.len(), true).map(|next| (next, timer))
            }
            _ => None,
        });
        if let Some((next, timer)) = due {
            debug!(index = next, "slideshow advance");
            self.show_image(next, Mode::Slideshow(timer.advanced(now)));
        }
    }

    fn on_browsing(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::Released {
                button: Button::Back,
                held,
            } => {
                let base = self.session.read(|s| s.base_path.clone());
                if held >= self.thresholds.go_home_hold || base == "/" {
                    self.go_home();
                } else {
                    self.change_dir(storage::parent_dir(&base));
                }
            }
            InputEvent::Released {
                button: Button::Confirm,
                ..
            } => {
                let Some(selected) = self.session.read(|s| s.selected_entry().cloned()) else {
                    return;
                };
                match selected {
                    ListEntry::StartSlideshow => self.start_slideshow_in_directory(now),
                    ListEntry::Directory(name) => {
                        let base = self.session.read(|s| s.base_path.clone());
                        self.change_dir(storage::child_dir(&base, &name));
                    }
                    ListEntry::Image(name) => self.open_from_browser(&name),
                }
            }
            InputEvent::Released { button, held } if button.is_prev() || button.is_next() => {
                let forward = button.is_next();
                let page_size = self.page_size;
                let skip = held >= self.thresholds.page_skip_hold;
                let target = self.session.read(|s| {
                    let len = s.entries.len();
                    if skip {
                        navigation::page_jump(s.selector_index, len, page_size, forward)
                    } else {
                        navigation::step(s.selector_index, len, forward)
                    }
                });
                if let Some(target) = target {
                    self.session.update(|s| s.selector_index = target);
                }
            }
            InputEvent::Settings => self.set_mode(Mode::SlideshowSettings),
            InputEvent::Released { .. } | InputEvent::Held { .. } => {}
        }
    }

    fn on_viewing(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::Released {
                button: Button::Back,
                ..
            } => self.set_mode(Mode::Browsing),
            InputEvent::Released {
                button: Button::Confirm,
                ..
            } => {
                if self.session.read(|s| !s.images.is_empty()) {
                    self.set_mode(Mode::Slideshow(SlideshowTimer::started(now)));
                }
            }
            InputEvent::Released { button, .. } if button.is_prev() || button.is_next() => {
                let target = self.session.read(|s| {
                    navigation::step(s.current_image, s.images.len(), button.is_next())
                });
                if let Some(target) = target {
                    self.show_image(target, Mode::Viewing);
                }
            }
            InputEvent::Settings => self.set_mode(Mode::ImageAdjustment {
                focus: AdjustFocus::Brightness,
            }),
            InputEvent::Released { .. } | InputEvent::Held { .. } => {}
        }
    }

    fn on_slideshow(&mut self, event: InputEvent) {
        match event {
            InputEvent::Released {
                button: Button::Back | Button::Confirm,
                ..
            } => self.set_mode(Mode::Viewing),
            InputEvent::Released { .. } | InputEvent::Held { .. } | InputEvent::Settings => {}
        }
    }

    fn on_slideshow_settings(&mut self, event: InputEvent) {
        match event {
            // Carry-over from the gesture that opened this mode.
            InputEvent::Held {
                button: Button::Confirm,
                held,
            } if held > self.thresholds.settings_confirm_guard => {}
            InputEvent::Released {
                button: Button::Back | Button::Confirm,
                ..
            } => self.set_mode(Mode::Browsing),
            InputEvent::Released { button, .. } if button.is_prev() || button.is_next() => {
                let seconds = self.session.update(|s| {
                    if button.is_next() {
                        s.interval.next();
                    } else {
                        s.interval.prev();
                    }
                    s.interval.seconds()
                });
                debug!(seconds, "slideshow interval changed");
            }
            InputEvent::Released { .. } | InputEvent::Held { .. } | InputEvent::Settings => {}
        }
    }

    fn on_image_adjustment(&mut self, event: InputEvent, focus: AdjustFocus) {
        match event {
            InputEvent::Released {
                button: Button::Back | Button::Confirm,
                ..
            } => self.set_mode(Mode::Viewing),
            InputEvent::Released {
                button: Button::Up | Button::Down,
                ..
            } => self.set_mode(Mode::ImageAdjustment {
                focus: focus.toggled(),
            }),
            InputEvent::Released {
                button: button @ (Button::Left | Button::Right),
                ..
            } => {
                let delta = if button == Button::Right { 1 } else { -1 };
                let value = self.session.update(|s| {
                    s.adjustments.nudge(focus, delta);
                    s.adjustments.get(focus)
                });
                debug!(?focus, value, "adjustment changed");
            }
            InputEvent::Held { .. } | InputEvent::Settings => {}
        }
    }

    fn set_mode(&self, mode: Mode) {
        let from = self.session.update(|s| std::mem::replace(&mut s.mode, mode));
        debug!(from = from.name(), to = mode.name(), "mode transition");
    }

    fn go_home(&mut self) {
        info!("leaving image gallery");
        (self.on_go_home)();
    }

    fn pipeline(&self) -> ImageOpenPipeline<'_> {
        ImageOpenPipeline::new(self.storage.as_ref(), self.codec.as_ref(), &self.temp_path)
    }

    fn change_dir(&self, path: String) {
        let entries = listing::list_entries(self.storage.as_ref(), &path);
        debug!(path = %path, count = entries.len(), "entered directory");
        self.session.update(|s| {
            s.base_path = path;
            s.set_entries(entries);
        });
    }

    fn open_from_browser(&self, name: &str) {
        let base = self.session.read(|s| s.base_path.clone());
        let images = listing::list_images(self.storage.as_ref(), &base);
        let index = images.iter().position(|n| n == name).unwrap_or(0);
        let viewed = images.get(index).map(|n| self.pipeline().open(&base, n));
        self.commit_images(images, index, viewed, Mode::Viewing);
    }

    fn start_slideshow_in_directory(&self, now: Instant) {
        let base = self.session.read(|s| s.base_path.clone());
        let images = listing::list_images(self.storage.as_ref(), &base);
        let Some(first) = images.first() else {
            debug!(path = %base, "no images for slideshow");
            return;
        };
        let viewed = self.pipeline().open(&base, first);
        self.commit_images(
            images,
            0,
            Some(viewed),
            Mode::Slideshow(SlideshowTimer::started(now)),
        );
    }

    fn commit_images(&self, images: Vec<String>, index: usize, viewed: Option<OpenedImage>, mode: Mode) {
        let from = self.session.update(|s| {
            s.images = images;
            s.current_image = index;
            s.viewed = viewed;
            std::mem::replace(&mut s.mode, mode)
        });
        debug!(from = from.name(), to = mode.name(), index, "mode transition");
    }

    /// Open image `index` of the current list and show it in `mode`.
    fn show_image(&self, index: usize, mode: Mode) {
        let Some((base, name)) = self.session.read(|s| {
            s.images
                .get(index)
                .map(|name| (s.base_path.clone(), name.clone()))
        }) else {
            return;
        };
        let viewed = self.pipeline().open(&base, &name);
        self.session.update(|s| {
            s.current_image = index;
            s.viewed = Some(viewed);
            s.mode = mode;
        });
    }
}
