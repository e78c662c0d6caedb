//! Figure rendering for river discharge maps.
//!
//! A [`Figure`] is a raster canvas sized from a [`FigureStyle`]. Map axes
//! draw in geographic coordinates with equal aspect, rivers are stroked
//! as [`LineCollection`]s, and a horizontal colorbar explains the
//! [`Colormap`]. Finished figures are cropped and written as JPEG.

pub mod colorbar;
pub mod colormap;
pub mod error;
pub mod figure;
pub mod jpeg;
pub mod lines;
pub mod style;
pub mod text;

pub use colorbar::{draw_colorbar, nice_ticks, ColorbarLayout};
pub use colormap::{Color, Colormap, Normalize};
pub use error::{RenderError, RenderResult};
pub use figure::{crop_to_content, Figure, MapAxes, PixelRect};
pub use jpeg::{encode_jpeg, save_jpeg};
pub use lines::{LineCollection, Point, Segment};
pub use style::{ColorbarStyle, Extend, FigureStyle, OutlineStyle, RiverStyle};
pub use text::{load_font, Anchor, TextItem};
