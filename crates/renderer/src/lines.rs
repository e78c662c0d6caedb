//! Line segments and batched line collections.

use crate::colormap::Color;

/// A point in geographic (lon, lat) space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Segments that share one stroke width but carry their own colors.
///
/// A collection is drawn in a single call, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineCollection {
    segments: Vec<Segment>,
    colors: Vec<Color>,
    width_pt: f64,
}

impl LineCollection {
    pub fn new(width_pt: f64) -> Self {
        Self {
            segments: Vec::new(),
            colors: Vec::new(),
            width_pt,
        }
    }

    pub fn push(&mut self, segment: Segment, color: Color) {
        self.segments.push(segment);
        self.colors.push(color);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Stroke width in points.
    pub fn width_pt(&self) -> f64 {
        self.width_pt
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Segment, &Color)> {
        self.segments.iter().zip(self.colors.iter())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}
