#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use image::{GrayImage, Luma};
use parking_lot::Mutex;
use photo_gallery::GalleryConfig;
use photo_gallery::codec::{Bitmap, ImageRsCodec};
use photo_gallery::config::DisplayOptions;
use photo_gallery::controller::Controller;
use photo_gallery::input::{Button, InputEvent};
use photo_gallery::render::surface::{Rect, Renderer, TextStyle};
use photo_gallery::session::{Session, SessionHandle};
use photo_gallery::settings::{Adjustments, IntervalCursor};
use photo_gallery::storage::LocalStorage;
use tempfile::TempDir;

pub const TAP: Duration = Duration::from_millis(50);

pub fn setup_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

pub fn test_config(root: &Path) -> GalleryConfig {
    GalleryConfig {
        storage_root: root.to_path_buf(),
        render_tick: Duration::from_millis(2),
        display: DisplayOptions {
            width: 64,
            height: 96,
        },
        ..GalleryConfig::default()
    }
}

fn gradient(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([((x + y) * 8 % 256) as u8]))
}

pub fn write_bmp(path: impl AsRef<Path>, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Bmp)
        .expect("write bmp fixture");
}

pub fn write_jpeg(path: impl AsRef<Path>, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Jpeg)
        .expect("write jpeg fixture");
}

pub fn released(button: Button) -> InputEvent {
    InputEvent::Released { button, held: TAP }
}

pub fn released_after(button: Button, millis: u64) -> InputEvent {
    InputEvent::Released {
        button,
        held: Duration::from_millis(millis),
    }
}

/// A controller over a temp directory, counting go-home requests.
pub struct Harness {
    pub dir: TempDir,
    pub config: GalleryConfig,
    pub controller: Controller,
    pub homes: Arc<AtomicUsize>,
}

impl Harness {
    pub fn new(dir: TempDir) -> Self {
        let config = test_config(dir.path());
        let session = SessionHandle::new(Session::new(IntervalCursor::new(
            config.default_interval_index,
        )));
        let homes = Arc::new(AtomicUsize::new(0));
        let counter = homes.clone();
        let controller = Controller::new(
            &config,
            session,
            Arc::new(LocalStorage::new(dir.path())),
            Arc::new(ImageRsCodec::new(config.display)),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        controller.reload_entries();
        Self {
            dir,
            config,
            controller,
            homes,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        self.controller.session()
    }

    pub fn go_home_count(&self) -> usize {
        self.homes.load(Ordering::SeqCst)
    }

    pub fn temp_file_exists(&self) -> bool {
        self.dir
            .path()
            .join(self.config.temp_image_path.trim_start_matches('/'))
            .exists()
    }
}

/// Renderer that keeps every displayed frame as its list of text lines.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    frames: Arc<Mutex<Vec<Vec<String>>>>,
    pending: Vec<String>,
}

impl RecordingRenderer {
    pub fn frames(&self) -> Vec<Vec<String>> {
        self.frames.lock().clone()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.lock().len()
    }
}

impl Renderer for RecordingRenderer {
    fn width(&self) -> u32 {
        480
    }

    fn height(&self) -> u32 {
        800
    }

    fn clear(&mut self) {
        self.pending.clear();
    }

    fn draw_text(&mut self, _x: i32, _y: i32, text: &str, _style: TextStyle) {
        self.pending.push(text.to_string());
    }

    fn text_width(&self, text: &str, _style: TextStyle) -> u32 {
        text.chars().count() as u32 * 10
    }

    fn fill_rect(&mut self, _rect: Rect) {}

    fn draw_rect(&mut self, _rect: Rect) {}

    fn draw_line(&mut self, _from: (i32, i32), _to: (i32, i32)) {}

    fn draw_bitmap(&mut self, bitmap: &Bitmap, _adjustments: Adjustments, _area: Rect) {
        self.pending
            .push(format!("bitmap {}x{}", bitmap.width(), bitmap.height()));
    }

    fn display(&mut self) {
        let frame = std::mem::take(&mut self.pending);
        self.frames.lock().push(frame);
    }
}

/// Poll `cond` until it holds or `timeout` passes.
pub fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = std::time::Instant::now() + timeout;
    while std::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}
