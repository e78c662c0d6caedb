//! Mean discharge river map.
//!
//! Reads a CaMa-Flood map and a discharge time series, colors each river
//! segment by the time-mean discharge of the cell it drains, and writes a
//! JPEG figure with a basin outline and a colorbar.

pub mod config;
pub mod pipeline;
pub mod segments;
pub mod vector;

pub use config::{Args, RunConfig};
pub use pipeline::{remove_intermediate_files, render_map, run, RunSummary};
pub use segments::{render_level, wrap_longitude, LevelLayer, LevelStats};
pub use vector::{parse_segment_line, RawSegment, RivvecTools, VectorError, VectorSource};
