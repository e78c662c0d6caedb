//! Figure style configuration.
//!
//! Every field has a default, so an empty JSON object (or no style file at
//! all) yields the standard discharge figure. Partial documents override
//! only the fields they name.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::colormap::{Color, Colormap};
use crate::error::{RenderError, RenderResult};

/// Points per inch; line widths and font sizes are given in points.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Complete figure style loaded from JSON
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FigureStyle {
    pub width_in: f32,
    pub height_in: f32,
    pub dpi: f32,
    pub background: String,
    pub title: String,
    pub title_size_pt: f32,
    /// Layout rectangle of the map axes as figure fractions
    /// `[left, bottom, width, height]`; the map keeps equal aspect inside it.
    pub map_rect: [f32; 4],
    pub colormap: String,
    pub basin: OutlineStyle,
    pub rivers: RiverStyle,
    pub colorbar: ColorbarStyle,
    pub jpeg_quality: u8,
    /// Crop uniform background margins from the finished image.
    pub tight: bool,
}

/// Basin boundary outline (never filled)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutlineStyle {
    pub edge_color: String,
    pub line_width_pt: f32,
}

/// River segment widths per stream-order level
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RiverStyle {
    pub base_width_pt: f64,
    pub exponent: f64,
    pub max_level: u32,
}

/// Which ends of the colorbar get a triangular extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Extend {
    Neither,
    Min,
    Max,
    Both,
}

impl Extend {
    pub fn has_min(self) -> bool {
        matches!(self, Extend::Min | Extend::Both)
    }

    pub fn has_max(self) -> bool {
        matches!(self, Extend::Max | Extend::Both)
    }
}

/// Horizontal colorbar configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ColorbarStyle {
    /// `[left, bottom, width, height]` as figure fractions.
    pub rect: [f32; 4],
    pub label: String,
    pub label_size_pt: f32,
    pub tick_size_pt: f32,
    pub extend: Extend,
    /// Length of each extension as a fraction of the bar length.
    pub extend_frac: f32,
    pub max_ticks: usize,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            // A4 width, a third of A4 height
            width_in: 8.27,
            height_in: 11.69 / 3.0,
            dpi: 300.0,
            background: "#ffffff".to_string(),
            title: "Mean Discharge".to_string(),
            title_size_pt: 8.0,
            map_rect: [0.02, 0.24, 0.96, 0.68],
            colormap: "viridis_r".to_string(),
            basin: OutlineStyle::default(),
            rivers: RiverStyle::default(),
            colorbar: ColorbarStyle::default(),
            jpeg_quality: 95,
            tight: true,
        }
    }
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            edge_color: "#808080".to_string(),
            line_width_pt: 1.0,
        }
    }
}

impl Default for RiverStyle {
    fn default() -> Self {
        Self {
            base_width_pt: 0.05,
            exponent: 2.0,
            max_level: 10,
        }
    }
}

impl Default for ColorbarStyle {
    fn default() -> Self {
        Self {
            // sits higher than a tight-bbox layout would need so the tick
            // labels and label stay on the canvas; the tight crop hides it
            rect: [0.2, 0.12, 0.6, 0.02],
            label: "Mean Discharge (m³/s)".to_string(),
            label_size_pt: 7.0,
            tick_size_pt: 6.0,
            extend: Extend::Both,
            extend_frac: 0.05,
            max_ticks: 6,
        }
    }
}

impl RiverStyle {
    /// Stroke width in points for a stream-order level:
    /// `level ^ exponent * base_width`.
    pub fn line_width_pt(&self, level: u32) -> f64 {
        (level as f64).powf(self.exponent) * self.base_width_pt
    }

    /// Levels drawn, lowest first.
    pub fn levels(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.max_level
    }
}

impl FigureStyle {
    /// Load style configuration from JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Load and validate a style file
    pub fn from_file(path: &Path) -> RenderResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RenderError::StyleFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let style = Self::from_json(&content).map_err(|e| RenderError::StyleFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        style.validate()?;
        Ok(style)
    }

    /// Reject values that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if !(self.width_in > 0.0 && self.height_in > 0.0 && self.dpi > 0.0) {
            return Err(RenderError::InvalidStyle(
                "figure size and dpi must be positive".to_string(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(RenderError::InvalidStyle(format!(
                "jpeg_quality {} outside 1-100",
                self.jpeg_quality
            )));
        }
        for (name, rect) in [("map_rect", self.map_rect), ("colorbar.rect", self.colorbar.rect)] {
            if rect[2] <= 0.0 || rect[3] <= 0.0 {
                return Err(RenderError::InvalidStyle(format!("{} has no area", name)));
            }
        }
        self.background_color()?;
        self.basin_color()?;
        Colormap::from_name(&self.colormap)?;
        Ok(())
    }

    /// Canvas size in pixels (`size_in * dpi`).
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round().max(1.0) as u32,
            (self.height_in * self.dpi).round().max(1.0) as u32,
        )
    }

    /// Convert a length in points to pixels at this style's dpi.
    pub fn pt_to_px(&self, pt: f32) -> f32 {
        pt * self.dpi / POINTS_PER_INCH
    }

    pub fn background_color(&self) -> RenderResult<Color> {
        parse_color_field("background", &self.background)
    }

    pub fn basin_color(&self) -> RenderResult<Color> {
        parse_color_field("basin.edge_color", &self.basin.edge_color)
    }
}

fn parse_color_field(field: &str, value: &str) -> RenderResult<Color> {
    Color::from_hex(value).ok_or_else(|| {
        RenderError::InvalidStyle(format!("{}: '{}' is not a #rrggbb color", field, value))
    })
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}
