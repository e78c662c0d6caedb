//! Colormaps and linear value normalization.
//!
//! Colormaps are lists of evenly spaced color stops interpolated linearly,
//! named after their matplotlib counterparts. Appending `_r` to any name
//! reverses it.

use crate::error::{RenderError, RenderResult};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        crate::style::hex_to_rgb(hex).map(|(r, g, b)| Self::rgb(r, g, b))
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// matplotlib viridis sampled at ten evenly spaced points
const VIRIDIS: [Color; 10] = [
    Color::rgb(68, 1, 84),
    Color::rgb(72, 40, 120),
    Color::rgb(62, 73, 137),
    Color::rgb(49, 104, 142),
    Color::rgb(38, 130, 142),
    Color::rgb(31, 158, 137),
    Color::rgb(53, 183, 121),
    Color::rgb(110, 206, 88),
    Color::rgb(181, 222, 43),
    Color::rgb(253, 231, 37),
];

/// ColorBrewer Blues (9 classes)
const BLUES: [Color; 9] = [
    Color::rgb(247, 251, 255),
    Color::rgb(222, 235, 247),
    Color::rgb(198, 219, 239),
    Color::rgb(158, 202, 225),
    Color::rgb(107, 174, 214),
    Color::rgb(66, 146, 198),
    Color::rgb(33, 113, 181),
    Color::rgb(8, 81, 156),
    Color::rgb(8, 48, 107),
];

/// ColorBrewer YlGnBu (9 classes)
const YLGNBU: [Color; 9] = [
    Color::rgb(255, 255, 217),
    Color::rgb(237, 248, 177),
    Color::rgb(199, 233, 180),
    Color::rgb(127, 205, 187),
    Color::rgb(65, 182, 196),
    Color::rgb(29, 145, 192),
    Color::rgb(34, 94, 168),
    Color::rgb(37, 52, 148),
    Color::rgb(8, 29, 88),
];

/// A continuous colormap over `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    stops: Vec<Color>,
}

impl Colormap {
    /// Look up a named colormap (`viridis`, `Blues`, `YlGnBu`, with an
    /// optional `_r` suffix).
    pub fn from_name(name: &str) -> RenderResult<Self> {
        if let Some(base) = name.strip_suffix("_r") {
            let mut cmap = Self::from_name(base)?;
            cmap.stops.reverse();
            cmap.name = name.to_string();
            return Ok(cmap);
        }

        let stops: &[Color] = match name {
            "viridis" => &VIRIDIS,
            "Blues" => &BLUES,
            "YlGnBu" => &YLGNBU,
            _ => return Err(RenderError::UnknownColormap(name.to_string())),
        };
        Self::from_stops(name, stops.to_vec())
    }

    /// Build from evenly spaced stops (at least two).
    pub fn from_stops(name: &str, stops: Vec<Color>) -> RenderResult<Self> {
        if stops.len() < 2 {
            return Err(RenderError::InvalidStyle(format!(
                "colormap '{}' needs at least two stops",
                name
            )));
        }
        Ok(Self {
            name: name.to_string(),
            stops,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color at `t`; values outside `[0, 1]` take the end colors and NaN
    /// is transparent.
    pub fn color(&self, t: f64) -> Color {
        if t.is_nan() {
            return Color::transparent();
        }
        let t = t.clamp(0.0, 1.0);
        let last = self.stops.len() - 1;
        let pos = t * last as f64;
        let low = (pos.floor() as usize).min(last - 1);
        interpolate_color(self.stops[low], self.stops[low + 1], (pos - low as f64) as f32)
    }

    /// Color used below the normalized range.
    pub fn under(&self) -> Color {
        self.stops[0]
    }

    /// Color used above the normalized range.
    pub fn over(&self) -> Color {
        self.stops[self.stops.len() - 1]
    }
}

/// Linear map from `[vmin, vmax]` to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    /// Normalized value, unclamped; a degenerate range maps to 0.
    pub fn apply(&self, value: f64) -> f64 {
        let range = self.vmax - self.vmin;
        if !(range > 0.0) {
            return 0.0;
        }
        (value - self.vmin) / range
    }

    /// Inverse of [`apply`](Self::apply).
    pub fn inverse(&self, t: f64) -> f64 {
        self.vmin + t * (self.vmax - self.vmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_endpoints() {
        let a = Color::rgb(0, 0, 0);
        let b = Color::rgb(200, 100, 50);
        assert_eq!(interpolate_color(a, b, 0.0), a);
        assert_eq!(interpolate_color(a, b, 1.0), b);
        assert_eq!(interpolate_color(a, b, 0.5), Color::rgb(100, 50, 25));
        assert_eq!(interpolate_color(a, b, 2.0), b);
    }

    #[test]
    fn test_viridis_ends() {
        let cmap = Colormap::from_name("viridis").unwrap();
        assert_eq!(cmap.color(0.0), Color::rgb(68, 1, 84));
        assert_eq!(cmap.color(1.0), Color::rgb(253, 231, 37));
        assert_eq!(cmap.color(-3.0), cmap.under());
        assert_eq!(cmap.color(7.0), cmap.over());
    }

    #[test]
    fn test_reversed_name() {
        let fwd = Colormap::from_name("viridis").unwrap();
        let rev = Colormap::from_name("viridis_r").unwrap();
        assert_eq!(rev.name(), "viridis_r");
        assert_eq!(rev.color(0.0), fwd.color(1.0));
        assert_eq!(rev.color(1.0), fwd.color(0.0));
        assert_eq!(rev.color(0.3), fwd.color(0.7));
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            Colormap::from_name("jet"),
            Err(RenderError::UnknownColormap(_))
        ));
    }

    #[test]
    fn test_normalize() {
        let norm = Normalize::new(0.0, 200.0);
        assert_eq!(norm.apply(50.0), 0.25);
        assert_eq!(norm.apply(400.0), 2.0);
        assert_eq!(norm.inverse(0.5), 100.0);
        assert_eq!(Normalize::new(5.0, 5.0).apply(9.0), 0.0);
    }
}
