//! Renderer that reports composed frames through `tracing`, for running the
//! screen without a panel attached.

use tracing::info;

use crate::codec::Bitmap;
use crate::config::DisplayOptions;
use crate::render::surface::{FontSize, Rect, Renderer, TextStyle};
use crate::settings::Adjustments;

#[derive(Debug)]
pub struct ConsoleRenderer {
    width: u32,
    height: u32,
    lines: Vec<(i32, String)>,
    frames: u64,
}

impl ConsoleRenderer {
    pub fn new(display: DisplayOptions) -> Self {
        Self {
            width: display.width,
            height: display.height,
            lines: Vec::new(),
            frames: 0,
        }
    }

    /// Approximate glyph advance of the device fonts.
    fn glyph_width(size: FontSize) -> u32 {
        match size {
            FontSize::Small => 8,
            FontSize::Body => 10,
            FontSize::Title => 12,
        }
    }
}

impl Renderer for ConsoleRenderer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.lines.clear();
    }

    fn draw_text(&mut self, _x: i32, y: i32, text: &str, style: TextStyle) {
        let text = if style.inverted {
            format!("[{text}]")
        } else {
            text.to_string()
        };
        self.lines.push((y, text));
    }

    fn text_width(&self, text: &str, style: TextStyle) -> u32 {
        text.chars().count() as u32 * Self::glyph_width(style.size)
    }

    fn fill_rect(&mut self, _rect: Rect) {}

    fn draw_rect(&mut self, _rect: Rect) {}

    fn draw_line(&mut self, _from: (i32, i32), _to: (i32, i32)) {}

    fn draw_bitmap(&mut self, bitmap: &Bitmap, adjustments: Adjustments, area: Rect) {
        self.lines.push((
            area.y,
            format!(
                "<bitmap {}x{} at {},{} size {}x{} brightness {} contrast {}>",
                bitmap.width(),
                bitmap.height(),
                area.x,
                area.y,
                area.width,
                area.height,
                adjustments.brightness(),
                adjustments.contrast()
            ),
        ));
    }

    fn display(&mut self) {
        self.frames += 1;
        self.lines.sort_by_key(|(y, _)| *y);
        let text = self
            .lines
            .iter()
            .map(|(_, line)| line.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        info!(frame = self.frames, "\n{text}");
    }
}
