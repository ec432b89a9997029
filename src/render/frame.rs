//! One full render pass over a consistent view of the session.

use crate::navigation;
use crate::pipeline::placement;
use crate::render::surface::{Rect, Renderer, TextStyle};
use crate::session::{Mode, Session};
use crate::settings::AdjustFocus;

const TITLE_Y: i32 = 15;
const LIST_TOP: i32 = 60;
const ROW_HEIGHT: i32 = 30;
const LIST_INSET: i32 = 20;
const HINT_MARGIN: i32 = 30;
const PANEL_HEIGHT: u32 = 90;

pub const BROWSER_TITLE: &str = "Image Viewer";
pub const EMPTY_DIRECTORY: &str = "No files found";
pub const NO_IMAGES: &str = "No images";
pub const SETTINGS_TITLE: &str = "Slideshow Settings";

/// Compose and display the frame for the session's current mode.
pub fn draw_frame(session: &Session, renderer: &mut dyn Renderer, page_size: usize) {
    renderer.clear();
    match session.mode {
        Mode::Browsing => draw_browser(session, renderer, page_size),
        Mode::Viewing => draw_viewer(session, renderer, true),
        Mode::Slideshow(_) => draw_viewer(session, renderer, false),
        Mode::SlideshowSettings => draw_settings(session, renderer),
        Mode::ImageAdjustment { focus } => {
            draw_viewer(session, renderer, false);
            draw_adjustment_panel(session, renderer, focus);
        }
    }
    renderer.display();
}

fn draw_browser(session: &Session, renderer: &mut dyn Renderer, page_size: usize) {
    let width = renderer.width();
    renderer.draw_centered_text(TITLE_Y, BROWSER_TITLE, TextStyle::TITLE);
    draw_hints(renderer, &["Back", "Open", "Hold for Settings"]);

    if session.entries.is_empty() {
        renderer.draw_text(LIST_INSET, LIST_TOP, EMPTY_DIRECTORY, TextStyle::BODY);
        return;
    }

    let page_size = page_size.max(1);
    let selected = session.selector_index;
    let row_y = |i: usize| LIST_TOP + (i % page_size) as i32 * ROW_HEIGHT;
    renderer.fill_rect(Rect::new(0, row_y(selected) - 2, width.saturating_sub(1), ROW_HEIGHT as u32));

    let start = navigation::page_start(selected, page_size);
    let max_width = width.saturating_sub(2 * LIST_INSET as u32);
    for (i, entry) in session
        .entries
        .iter()
        .enumerate()
        .skip(start)
        .take(page_size)
    {
        let style = TextStyle::BODY.inverted(i == selected);
        let label = renderer.truncated_text(&entry.label(), max_width, style);
        renderer.draw_text(LIST_INSET, row_y(i), &label, style);
    }
}

fn draw_hints(renderer: &mut dyn Renderer, labels: &[&str]) {
    let width = renderer.width();
    let y = renderer.height() as i32 - HINT_MARGIN;
    let slot = width / labels.len().max(1) as u32;
    renderer.draw_line((0, y - 6), (width as i32, y - 6));
    for (i, label) in labels.iter().enumerate() {
        let text = renderer.truncated_text(label, slot.saturating_sub(8), TextStyle::SMALL);
        let x = (slot * i as u32) as i32 + 4;
        renderer.draw_text(x, y, &text, TextStyle::SMALL);
    }
}

fn draw_viewer(session: &Session, renderer: &mut dyn Renderer, show_name: bool) {
    let middle = renderer.height() as i32 / 2;
    let Some(name) = session.current_image_name() else {
        renderer.draw_centered_text(middle, NO_IMAGES, TextStyle::BODY);
        return;
    };

    match &session.viewed {
        Some(Ok(bitmap)) => {
            let surface = Rect::new(0, 0, renderer.width(), renderer.height());
            let area = placement(bitmap.width(), bitmap.height(), surface);
            renderer.draw_bitmap(bitmap, session.adjustments, area);
        }
        Some(Err(failure)) => {
            renderer.draw_centered_text(middle, &failure.to_string(), TextStyle::BODY);
        }
        None => renderer.draw_centered_text(middle, NO_IMAGES, TextStyle::BODY),
    }

    if show_name {
        let y = renderer.height() as i32 - 20;
        renderer.draw_text(5, y, name, TextStyle::SMALL);
    }
}

fn draw_settings(session: &Session, renderer: &mut dyn Renderer) {
    renderer.draw_centered_text(50, SETTINGS_TITLE, TextStyle::TITLE);
    let interval = format!("Interval: {} seconds", session.interval.seconds());
    renderer.draw_centered_text(150, &interval, TextStyle::BODY);
    renderer.draw_centered_text(250, "< Change Interval >", TextStyle::SMALL);
    renderer.draw_centered_text(300, "Press Confirm/Back to Exit", TextStyle::SMALL);
}

fn draw_adjustment_panel(session: &Session, renderer: &mut dyn Renderer, focus: AdjustFocus) {
    let width = renderer.width();
    let top = renderer.height().saturating_sub(PANEL_HEIGHT) as i32;
    let panel = Rect::new(0, top, width, PANEL_HEIGHT);
    renderer.fill_rect(panel);

    let rows = [
        (AdjustFocus::Brightness, "Brightness"),
        (AdjustFocus::Contrast, "Contrast"),
    ];
    for (row, (kind, label)) in rows.into_iter().enumerate() {
        let y = top + 15 + row as i32 * ROW_HEIGHT;
        let focused = kind == focus;
        let marker = if focused { "> " } else { "  " };
        let text = format!("{marker}{label}: {}", signed(session.adjustments.get(kind)));
        renderer.draw_text(LIST_INSET, y, &text, TextStyle::BODY.inverted(true));
        if focused {
            renderer.draw_rect(Rect::new(
                LIST_INSET / 2,
                y - 4,
                width.saturating_sub(LIST_INSET as u32),
                ROW_HEIGHT as u32 - 2,
            ));
        }
    }
}

fn signed(value: i32) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}
