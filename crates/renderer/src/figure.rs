//! Figure canvas and plate carrée map axes.
//!
//! Geometry is stroked with tiny-skia onto premultiplied pixmaps; text is
//! queued and rasterized last, onto the final RGBA image, because it needs
//! a font that may not be available.

use cama_map::GeoExtent;
use image::{Rgba, RgbaImage};
use rusttype::Font;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::colormap::Color;
use crate::error::{RenderError, RenderResult};
use crate::lines::LineCollection;
use crate::style::{FigureStyle, POINTS_PER_INCH};
use crate::text::{draw_text_items, TextItem};

/// Axis-aligned rectangle in pixel space, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Largest rectangle of aspect `aspect` (width / height) centered inside
    /// this one.
    pub fn fit_aspect(&self, aspect: f32) -> PixelRect {
        if self.width / self.height > aspect {
            let width = self.height * aspect;
            PixelRect::new(self.x + (self.width - width) / 2.0, self.y, width, self.height)
        } else {
            let height = self.width / aspect;
            PixelRect::new(self.x, self.y + (self.height - height) / 2.0, self.width, height)
        }
    }
}

/// Map axes in an equirectangular (plate carrée) projection.
///
/// Drawing happens on a layer the size of the axes, so anything outside
/// the extent is clipped when the layer is composited onto the figure.
pub struct MapAxes {
    extent: GeoExtent,
    rect: PixelRect,
    layer: Pixmap,
    dpi: f32,
}

impl MapAxes {
    pub fn extent(&self) -> GeoExtent {
        self.extent
    }

    /// Placement on the figure.
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    /// Layer-local pixel position of `(lon, lat)`.
    pub fn project(&self, lon: f64, lat: f64) -> (f32, f32) {
        let x = (lon - self.extent.west) / self.extent.width() * self.layer.width() as f64;
        let y = (self.extent.north - lat) / self.extent.height() * self.layer.height() as f64;
        (x as f32, y as f32)
    }

    fn pt_to_px(&self, pt: f64) -> f32 {
        (pt as f32) * self.dpi / POINTS_PER_INCH
    }

    /// Stroke a geographic polyline; `closed` joins the last vertex to the
    /// first. Nothing is filled.
    pub fn draw_outline(&mut self, points: &[(f64, f64)], closed: bool, color: Color, width_pt: f64) {
        if points.len() < 2 {
            return;
        }

        let mut pb = PathBuilder::new();
        let (x, y) = self.project(points[0].0, points[0].1);
        pb.move_to(x, y);
        for &(lon, lat) in &points[1..] {
            let (x, y) = self.project(lon, lat);
            pb.line_to(x, y);
        }
        if closed {
            pb.close();
        }

        if let Some(path) = pb.finish() {
            let paint = solid_paint(color);
            let stroke = Stroke {
                width: self.pt_to_px(width_pt),
                line_cap: LineCap::Butt,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            self.layer
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    /// Draw every segment of a collection with the collection's width.
    /// Returns the number of segments stroked.
    pub fn draw_line_collection(&mut self, lines: &LineCollection) -> usize {
        let stroke = Stroke {
            width: self.pt_to_px(lines.width_pt()),
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        let mut drawn = 0;
        for (segment, &color) in lines.iter() {
            let (x0, y0) = self.project(segment.start.x, segment.start.y);
            let (x1, y1) = self.project(segment.end.x, segment.end.y);

            let mut pb = PathBuilder::new();
            pb.move_to(x0, y0);
            pb.line_to(x1, y1);
            if let Some(path) = pb.finish() {
                let paint = solid_paint(color);
                self.layer
                    .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                drawn += 1;
            }
        }
        drawn
    }
}

/// A raster figure with queued text.
pub struct Figure {
    pixmap: Pixmap,
    dpi: f32,
    background: Color,
    texts: Vec<TextItem>,
}

impl Figure {
    /// Blank canvas filled with `background`.
    pub fn new(width: u32, height: u32, dpi: f32, background: Color) -> RenderResult<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::InvalidGeometry(format!("cannot allocate a {}x{} canvas", width, height))
        })?;
        pixmap.fill(tiny_skia::Color::from_rgba8(
            background.r,
            background.g,
            background.b,
            background.a,
        ));
        Ok(Self {
            pixmap,
            dpi,
            background,
            texts: Vec::new(),
        })
    }

    /// Canvas sized and colored from a style.
    pub fn from_style(style: &FigureStyle) -> RenderResult<Self> {
        let (width, height) = style.pixel_size();
        Self::new(width, height, style.dpi, style.background_color()?)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn pt_to_px(&self, pt: f32) -> f32 {
        pt * self.dpi / POINTS_PER_INCH
    }

    /// Convert `[left, bottom, width, height]` figure fractions (origin
    /// bottom-left) to a pixel rectangle (origin top-left).
    pub fn fraction_rect(&self, frac: [f32; 4]) -> PixelRect {
        let (w, h) = (self.width() as f32, self.height() as f32);
        let [left, bottom, width, height] = frac;
        PixelRect::new(left * w, (1.0 - bottom - height) * h, width * w, height * h)
    }

    /// Map axes showing `extent`, fitted with equal aspect into the layout
    /// rectangle `frac`.
    pub fn map_axes(&self, extent: GeoExtent, frac: [f32; 4]) -> RenderResult<MapAxes> {
        if !extent.is_valid() {
            return Err(RenderError::InvalidGeometry(format!(
                "map extent has no area: {:?}",
                extent
            )));
        }

        let rect = self.fraction_rect(frac).fit_aspect(extent.aspect() as f32);
        let layer = Pixmap::new(rect.width.round().max(1.0) as u32, rect.height.round().max(1.0) as u32)
            .ok_or_else(|| RenderError::InvalidGeometry(format!("cannot allocate map axes {:?}", rect)))?;

        Ok(MapAxes {
            extent,
            rect,
            layer,
            dpi: self.dpi,
        })
    }

    /// Composite finished axes onto the canvas.
    pub fn add_axes(&mut self, axes: MapAxes) {
        self.pixmap.draw_pixmap(
            axes.rect.x.round() as i32,
            axes.rect.y.round() as i32,
            axes.layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Queue text to be rasterized by [`render`](Self::render).
    pub fn add_text(&mut self, item: TextItem) {
        self.texts.push(item);
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        if let Some(r) = Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) {
            self.pixmap
                .fill_rect(r, &solid_paint(color), Transform::identity(), None);
        }
    }

    /// Fill a closed pixel-space polygon.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        if let Some(path) = pixel_path(points, true) {
            self.pixmap.fill_path(
                &path,
                &solid_paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    /// Stroke a pixel-space polyline.
    pub fn stroke_polyline(&mut self, points: &[(f32, f32)], closed: bool, color: Color, width_px: f32) {
        if let Some(path) = pixel_path(points, closed) {
            let stroke = Stroke {
                width: width_px,
                line_join: LineJoin::Miter,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &solid_paint(color), &stroke, Transform::identity(), None);
        }
    }

    /// Color of a canvas pixel (text not yet drawn).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Rasterize queued text (skipped without a font) and return the image.
    pub fn render(self, font: Option<&Font<'_>>) -> RgbaImage {
        let mut img = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in img.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }

        if let Some(font) = font {
            draw_text_items(&mut img, &self.texts, font);
        } else if !self.texts.is_empty() {
            tracing::warn!(items = self.texts.len(), "No font available, text omitted");
        }

        img
    }
}

/// Crop `img` to the bounding box of pixels that differ from `background`.
/// A blank image is returned unchanged.
pub fn crop_to_content(img: &RgbaImage, background: Color) -> RgbaImage {
    let bg = Rgba(background.to_array());
    let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
    let (mut max_x, mut max_y) = (0u32, 0u32);

    for (x, y, px) in img.enumerate_pixels() {
        if *px != bg {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if min_x == u32::MAX {
        return img.clone();
    }

    image::imageops::crop_imm(img, min_x, min_y, max_x - min_x + 1, max_y - min_y + 1).to_image()
}

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn pixel_path(points: &[(f32, f32)], closed: bool) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}
