//! Readers and derived grids for CaMa-Flood map directories.
//!
//! Covers everything the discharge map needs before drawing:
//! - `params.txt` / `1min/location.txt` descriptors
//! - Flat little-endian binary grids (topology, upstream area, catchment index)
//! - River mask and time-mean discharge reduction
//! - Fine-grid coordinate to discharge-cell resolution
//! - Basin outline shapefiles

pub mod binary;
pub mod error;
pub mod extent;
pub mod grid;
pub mod hydro;
pub mod location;
pub mod map;
pub mod params;
pub mod resolve;
pub mod shapefile;

pub use error::{MapError, MapResult};
pub use extent::GeoExtent;
pub use grid::Grid;
pub use hydro::{DischargeField, RiverMask, MISSING_DISCHARGE, UNDEFINED_THRESHOLD};
pub use location::FineGridSpec;
pub use map::{CamaMap, MapPaths};
pub use params::{MapParams, DEFAULT_NORTH_LIMIT};
pub use resolve::{CatchmentIndex, CellResolver, DiscardReason, ResolvedCell, FINE_CELLS_PER_DEGREE};
pub use shapefile::{Shape, ShapeType};
