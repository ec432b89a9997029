//! Image open pipeline: resolve a selected file into a display-ready bitmap,
//! transcoding JPEGs through a single-slot temporary BMP.

use tracing::{debug, info, warn};

use crate::codec::{Bitmap, ImageCodec};
use crate::error::{CodecError, OpenFailure, StorageError};
use crate::listing::ImageKind;
use crate::render::surface::Rect;
use crate::storage::{self, Storage};

/// Result of opening one image. Failures are shown in place of the image.
pub type OpenedImage = Result<Bitmap, OpenFailure>;

#[derive(Debug, thiserror::Error)]
enum TranscodeError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Removes the temporary file when dropped, so every exit path of the
/// pipeline cleans up.
struct TempFile<'a> {
    storage: &'a dyn Storage,
    path: &'a str,
}

impl Drop for TempFile<'_> {
    fn drop(&mut self) {
        match self.storage.remove(self.path) {
            Ok(()) => debug!(path = self.path, "removed temporary bitmap"),
            Err(StorageError::NotFound(_)) => {}
            Err(err) => warn!(path = self.path, error = %err, "failed to remove temporary bitmap"),
        }
    }
}

pub struct ImageOpenPipeline<'a> {
    storage: &'a dyn Storage,
    codec: &'a dyn ImageCodec,
    temp_path: &'a str,
}

impl<'a> ImageOpenPipeline<'a> {
    pub fn new(storage: &'a dyn Storage, codec: &'a dyn ImageCodec, temp_path: &'a str) -> Self {
        Self {
            storage,
            codec,
            temp_path,
        }
    }

    /// Open `name` inside directory `dir`.
    pub fn open(&self, dir: &str, name: &str) -> OpenedImage {
        let full_path = storage::join(dir, name);
        let mut _temp = None;
        let mut resolved = full_path.as_str();

        if ImageKind::from_name(name) == Some(ImageKind::Jpeg) {
            match self.transcode(&full_path) {
                Ok(guard) => {
                    resolved = guard.path;
                    _temp = Some(guard);
                }
                Err(err) => {
                    warn!(path = %full_path, error = %err, "jpeg transcode failed; opening original");
                }
            }
        }

        let mut source = match self.storage.open_read(resolved) {
            Ok(source) => source,
            Err(err) => {
                warn!(path = resolved, error = %err, "cannot open image");
                return Err(OpenFailure::CannotOpen);
            }
        };

        match self.codec.parse_bitmap(&mut source) {
            Ok(bitmap) => {
                info!(
                    path = %full_path,
                    width = bitmap.width(),
                    height = bitmap.height(),
                    "opened image"
                );
                Ok(bitmap)
            }
            Err(err) => {
                warn!(path = resolved, error = %err, "bitmap header did not parse");
                Err(OpenFailure::InvalidFormat)
            }
        }
    }

    fn transcode(&self, jpeg_path: &str) -> Result<TempFile<'a>, TranscodeError> {
        let mut source = self.storage.open_read(jpeg_path)?;
        if self.storage.exists(self.temp_path) {
            self.storage.remove(self.temp_path)?;
        }
        let mut dest = self.storage.create(self.temp_path)?;
        let guard = TempFile {
            storage: self.storage,
            path: self.temp_path,
        };
        let transcoded = self.codec.transcode_jpeg(&mut source, &mut dest);
        drop(dest);
        transcoded?;
        debug!(from = jpeg_path, to = self.temp_path, "transcoded jpeg");
        Ok(guard)
    }
}

/// Best-effort removal of the temporary bitmap, used on screen teardown.
pub fn remove_stale_temp(storage: &dyn Storage, temp_path: &str) {
    if storage.exists(temp_path) {
        drop(TempFile {
            storage,
            path: temp_path,
        });
    }
}

/// Where a `width` x `height` image lands in `area`: scaled down to fit when
/// larger (aspect preserved), centered on any axis where it is smaller.
#[must_use]
pub fn placement(width: u32, height: u32, area: Rect) -> Rect {
    if width == 0 || height == 0 || area.width == 0 || area.height == 0 {
        return Rect::new(area.x, area.y, 0, 0);
    }
    let (mut w, mut h) = (width, height);
    if w > area.width || h > area.height {
        let scale_w = f64::from(area.width) / f64::from(w);
        let scale_h = f64::from(area.height) / f64::from(h);
        let scale = scale_w.min(scale_h);
        w = ((f64::from(w) * scale).round() as u32).clamp(1, area.width);
        h = ((f64::from(h) * scale).round() as u32).clamp(1, area.height);
    }
    let x = area.x + ((area.width - w) / 2) as i32;
    let y = area.y + ((area.height - h) / 2) as i32;
    Rect::new(x, y, w, h)
}
