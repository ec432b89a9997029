//! Rendering capability consumed by the render task.

use crate::codec::Bitmap;
use crate::settings::Adjustments;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weight {
    #[default]
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSize {
    Small,
    #[default]
    Body,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub size: FontSize,
    pub weight: Weight,
    /// White text, for drawing on a filled bar.
    pub inverted: bool,
}

impl TextStyle {
    pub const BODY: Self = Self {
        size: FontSize::Body,
        weight: Weight::Regular,
        inverted: false,
    };
    pub const SMALL: Self = Self {
        size: FontSize::Small,
        weight: Weight::Regular,
        inverted: false,
    };
    pub const TITLE: Self = Self {
        size: FontSize::Title,
        weight: Weight::Bold,
        inverted: false,
    };

    pub const fn inverted(self, inverted: bool) -> Self {
        Self { inverted, ..self }
    }
}

/// A monochrome drawing surface. Calls compose a frame that becomes visible
/// on [`Renderer::display`].
pub trait Renderer: Send {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn clear(&mut self);

    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn draw_text(&mut self, x: i32, y: i32, text: &str, style: TextStyle);

    fn text_width(&self, text: &str, style: TextStyle) -> u32;

    fn fill_rect(&mut self, rect: Rect);

    fn draw_rect(&mut self, rect: Rect);

    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32));

    /// Draw `bitmap` scaled into `area`, with `adjustments` applied per pixel.
    fn draw_bitmap(&mut self, bitmap: &Bitmap, adjustments: Adjustments, area: Rect);

    /// Push the composed frame to the panel.
    fn display(&mut self);

    fn draw_centered_text(&mut self, y: i32, text: &str, style: TextStyle) {
        let width = self.text_width(text, style);
        let x = (self.width().saturating_sub(width) / 2) as i32;
        self.draw_text(x, y, text, style);
    }

    /// `text` shortened with a trailing ellipsis so it fits `max_width`.
    fn truncated_text(&self, text: &str, max_width: u32, style: TextStyle) -> String {
        if self.text_width(text, style) <= max_width {
            return text.to_string();
        }
        let mut chars: Vec<char> = text.chars().collect();
        while !chars.is_empty() {
            chars.pop();
            let candidate: String = chars.iter().collect::<String>() + "...";
            if self.text_width(&candidate, style) <= max_width {
                return candidate;
            }
        }
        String::new()
    }
}
