//! Decoder capability: JPEG to BMP transcoding and bitmap parsing.

use std::io::{Cursor, Read, Write};

use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use crate::config::DisplayOptions;
use crate::error::CodecError;
use crate::settings::Adjustments;

/// A decoded 8-bit grayscale image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Returns `None` when `pixels` does not hold `width * height` samples.
    #[must_use]
    pub fn from_luma(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw sample at (`x`, `y`); out-of-range reads are white.
    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return u8::MAX;
        }
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Sample at (`x`, `y`) with brightness and contrast applied.
    pub fn adjusted_pixel(&self, x: u32, y: u32, adjustments: Adjustments) -> u8 {
        adjust_luma(self.pixel(x, y), adjustments)
    }
}

/// Contrast scales around mid-gray by `(100 + c) / 100`; brightness shifts by
/// `b` percent of full scale.
#[must_use]
pub fn adjust_luma(value: u8, adjustments: Adjustments) -> u8 {
    if adjustments.is_neutral() {
        return value;
    }
    let contrast = (100 + adjustments.contrast()) as f32 / 100.0;
    let brightness = adjustments.brightness() as f32 * 255.0 / 100.0;
    let out = (f32::from(value) - 128.0) * contrast + 128.0 + brightness;
    out.round().clamp(0.0, 255.0) as u8
}

pub trait ImageCodec: Send + Sync {
    /// Decode a JPEG from `source` and write an equivalent BMP stream to `dest`.
    fn transcode_jpeg(&self, source: &mut dyn Read, dest: &mut dyn Write) -> Result<(), CodecError>;

    /// Parse a BMP stream into a display-ready bitmap.
    fn parse_bitmap(&self, source: &mut dyn Read) -> Result<Bitmap, CodecError>;
}

/// Codec built on the `image` crate. Output is grayscale and never larger
/// than the display surface.
#[derive(Debug, Clone, Copy)]
pub struct ImageRsCodec {
    max_width: u32,
    max_height: u32,
}

impl ImageRsCodec {
    const MAX_DECODED_PIXELS: u64 = 8_000_000;

    pub fn new(display: DisplayOptions) -> Self {
        Self {
            max_width: display.width.max(1),
            max_height: display.height.max(1),
        }
    }

    fn decode(&self, bytes: &[u8], format: ImageFormat) -> Result<DynamicImage, CodecError> {
        let (width, height) =
            ImageReader::with_format(Cursor::new(bytes), format).into_dimensions()?;
        if width == 0 || height == 0 {
            return Err(CodecError::Empty);
        }
        if u64::from(width) * u64::from(height) > Self::MAX_DECODED_PIXELS {
            return Err(CodecError::TooLarge { width, height });
        }
        let img = image::load_from_memory_with_format(bytes, format)?;
        if img.width() > self.max_width || img.height() > self.max_height {
            debug!(
                width = img.width(),
                height = img.height(),
                "downsizing to display surface"
            );
            return Ok(img.thumbnail(self.max_width, self.max_height));
        }
        Ok(img)
    }
}

impl ImageCodec for ImageRsCodec {
    fn transcode_jpeg(&self, source: &mut dyn Read, dest: &mut dyn Write) -> Result<(), CodecError> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        let gray = DynamicImage::ImageLuma8(self.decode(&bytes, ImageFormat::Jpeg)?.to_luma8());

        let mut bmp = Vec::new();
        gray.write_to(&mut Cursor::new(&mut bmp), ImageFormat::Bmp)?;
        dest.write_all(&bmp)?;
        dest.flush()?;
        Ok(())
    }

    fn parse_bitmap(&self, source: &mut dyn Read) -> Result<Bitmap, CodecError> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        let gray = self.decode(&bytes, ImageFormat::Bmp)?.to_luma8();
        let (width, height) = gray.dimensions();
        Bitmap::from_luma(width, height, gray.into_raw()).ok_or(CodecError::Empty)
    }
}
