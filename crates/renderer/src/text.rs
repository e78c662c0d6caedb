//! Text rasterization for titles and colorbar labels.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use tracing::{debug, warn};

use crate::colormap::Color;
use crate::error::{RenderError, RenderResult};

/// Fonts tried, in order, when no font is configured.
pub const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Which point of the text box sits at the item's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopCenter,
    BottomCenter,
    Center,
}

/// One queued piece of text in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size_px: f32,
    pub anchor: Anchor,
    pub color: Color,
}

impl TextItem {
    pub fn new(text: impl Into<String>, x: f32, y: f32, size_px: f32, anchor: Anchor) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size_px,
            anchor,
            color: Color::BLACK,
        }
    }
}

/// Load a TrueType font.
///
/// An explicit path must load; otherwise the first usable entry of
/// [`FONT_SEARCH_PATHS`] is used, and `Ok(None)` means text will be omitted.
pub fn load_font(explicit: Option<&Path>) -> RenderResult<Option<Font<'static>>> {
    if let Some(path) = explicit {
        return read_font(path)
            .map(Some)
            .ok_or_else(|| RenderError::Font(path.to_path_buf()));
    }

    for candidate in FONT_SEARCH_PATHS.iter().map(PathBuf::from) {
        if let Some(font) = read_font(&candidate) {
            debug!(path = %candidate.display(), "Loaded font");
            return Ok(Some(font));
        }
    }

    warn!("No usable system font found; titles and labels will be omitted");
    Ok(None)
}

fn read_font(path: &Path) -> Option<Font<'static>> {
    let bytes = std::fs::read(path).ok()?;
    Font::try_from_vec(bytes)
}

/// Draw queued items onto an image.
pub fn draw_text_items(img: &mut RgbaImage, items: &[TextItem], font: &Font<'_>) {
    for item in items {
        if item.text.is_empty() {
            continue;
        }
        let scale = Scale::uniform(item.size_px);
        let (w, h) = text_size(scale, font, &item.text);

        let x = (item.x - w as f32 / 2.0).round() as i32;
        let y = match item.anchor {
            Anchor::TopCenter => item.y,
            Anchor::BottomCenter => item.y - h as f32,
            Anchor::Center => item.y - h as f32 / 2.0,
        }
        .round() as i32;

        draw_text_mut(img, Rgba(item.color.to_array()), x, y, scale, font, &item.text);
    }
}

/// Decimal places needed to tell ticks `step` apart.
pub fn tick_decimals(step: f64) -> usize {
    if !(step > 0.0) || !step.is_finite() {
        return 0;
    }
    (0..6)
        .find(|&d| {
            let scaled = step * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-6 * scaled.max(1.0)
        })
        .unwrap_or(6)
}

/// Format a tick value with the precision its spacing needs.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = tick_decimals(step);
    let text = format!("{:.*}", decimals, value);
    // avoid "-0"
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(2000.0, 500.0), "2000");
        assert_eq!(format_tick(0.5, 0.5), "0.5");
        assert_eq!(format_tick(0.25, 0.25), "0.25");
        assert_eq!(format_tick(-0.0, 1.0), "0");
    }

    #[test]
    fn test_missing_explicit_font_is_error() {
        assert!(load_font(Some(Path::new("/nonexistent/font.ttf"))).is_err());
    }

    #[test]
    fn test_draw_without_items_is_noop() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        // no font needed when there is nothing to draw
        if let Ok(Some(font)) = load_font(None) {
            draw_text_items(&mut img, &[], &font);
        }
        assert!(img.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }
}
