//! Horizontal colorbar with extension triangles and labeled ticks.

use crate::colormap::{Color, Colormap, Normalize};
use crate::figure::{Figure, PixelRect};
use crate::style::ColorbarStyle;
use crate::text::{format_tick, Anchor, TextItem};

const TICK_LENGTH_PT: f32 = 3.5;
const OUTLINE_WIDTH_PT: f32 = 0.8;
const LABEL_PAD_PT: f32 = 2.0;

/// Tick positions covering `[vmin, vmax]` with a 1, 2, 2.5 or 5 step.
///
/// Returns the ticks and the step. A degenerate range yields a single
/// tick at `vmin`.
pub fn nice_ticks(vmin: f64, vmax: f64, max_ticks: usize) -> (Vec<f64>, f64) {
    let range = vmax - vmin;
    if !(range > 0.0) || !range.is_finite() {
        return (vec![vmin], 1.0);
    }

    let raw = range / max_ticks.saturating_sub(1).max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude);

    let first = (vmin / step).ceil();
    let last = (vmax / step + 1e-9).floor();
    let ticks = (first as i64..=last as i64)
        .map(|i| i as f64 * step)
        .collect();
    (ticks, step)
}

/// Bar geometry after drawing, in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorbarLayout {
    pub bar: PixelRect,
    pub ticks: Vec<f64>,
    pub step: f64,
}

/// Draw a horizontal colorbar for `cmap` over `norm` into `fig`.
pub fn draw_colorbar(
    fig: &mut Figure,
    cmap: &Colormap,
    norm: &Normalize,
    style: &ColorbarStyle,
) -> ColorbarLayout {
    let frame = fig.fraction_rect(style.rect);
    let x0 = frame.x.round();
    let top = frame.y.round();
    let width = frame.width.round().max(1.0);
    let height = frame.height.round().max(1.0);
    let bar = PixelRect::new(x0, top, width, height);

    let columns = width as u32;
    for i in 0..columns {
        let t = (i as f64 + 0.5) / columns as f64;
        fig.fill_rect(PixelRect::new(x0 + i as f32, top, 1.0, height), cmap.color(t));
    }

    let ext = style.extend_frac.max(0.0) * width;
    let mid = top + height / 2.0;
    let (left, right) = (x0, x0 + width);
    let bottom = top + height;

    if style.extend.has_min() && ext > 0.0 {
        fig.fill_polygon(&[(left, top), (left, bottom), (left - ext, mid)], cmap.under());
    }
    if style.extend.has_max() && ext > 0.0 {
        fig.fill_polygon(&[(right, top), (right + ext, mid), (right, bottom)], cmap.over());
    }

    let mut outline = vec![(left, top), (right, top)];
    if style.extend.has_max() && ext > 0.0 {
        outline.push((right + ext, mid));
    }
    outline.push((right, bottom));
    outline.push((left, bottom));
    if style.extend.has_min() && ext > 0.0 {
        outline.push((left - ext, mid));
    }
    let outline_px = fig.pt_to_px(OUTLINE_WIDTH_PT);
    fig.stroke_polyline(&outline, true, Color::BLACK, outline_px);

    let tick_len = fig.pt_to_px(TICK_LENGTH_PT);
    let pad = fig.pt_to_px(LABEL_PAD_PT);
    let tick_px = fig.pt_to_px(style.tick_size_pt);
    let (ticks, step) = nice_ticks(norm.vmin, norm.vmax, style.max_ticks);

    for &value in &ticks {
        let t = norm.apply(value);
        if !(0.0..=1.0).contains(&t) {
            continue;
        }
        let x = left + (t as f32) * width;
        fig.stroke_polyline(&[(x, bottom), (x, bottom + tick_len)], false, Color::BLACK, outline_px);
        fig.add_text(TextItem::new(
            format_tick(value, step),
            x,
            bottom + tick_len + pad,
            tick_px,
            Anchor::TopCenter,
        ));
    }

    if !style.label.is_empty() {
        fig.add_text(TextItem::new(
            style.label.clone(),
            bar.center_x(),
            bottom + tick_len + 2.0 * pad + tick_px * 1.2,
            fig.pt_to_px(style.label_size_pt),
            Anchor::TopCenter,
        ));
    }

    ColorbarLayout { bar, ticks, step }
}
