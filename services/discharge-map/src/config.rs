//! Command-line arguments and the resolved run configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cama_map::{MapPaths, DEFAULT_NORTH_LIMIT};
use clap::Parser;
use renderer::FigureStyle;

#[derive(Parser, Debug, Clone)]
#[command(name = "discharge-map")]
#[command(about = "Render a CaMa-Flood mean discharge river map as JPEG")]
pub struct Args {
    /// Discharge time series (float32, frames of ny x nx)
    pub dataname: PathBuf,

    /// Map name under <CAMA_DIR>/map/
    pub mapname: String,

    /// CaMa-Flood root directory
    pub cama_dir: PathBuf,

    /// River-number grid (int32, ny x nx)
    pub rivnums: PathBuf,

    /// Output figure name, without extension
    pub figname: String,

    /// Directory holding txt_vector and print_rivvec
    #[arg(long, default_value = "./bin")]
    pub bin_dir: PathBuf,

    /// Directory for intermediate vector text files
    #[arg(long, default_value = ".")]
    pub work_dir: PathBuf,

    /// Output directory for the JPEG (created if missing)
    #[arg(long, default_value = "./fig")]
    pub fig_dir: PathBuf,

    /// Basin outline shapefile
    #[arg(long, default_value = "GBM_basin/GBM_basin.shp")]
    pub basin_shapefile: PathBuf,

    /// Skip the basin outline
    #[arg(long)]
    pub no_basin: bool,

    /// Figure style JSON file
    #[arg(long)]
    pub style: Option<PathBuf>,

    /// TrueType font for title and colorbar text
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Northern display limit in degrees
    #[arg(long, default_value_t = DEFAULT_NORTH_LIMIT)]
    pub north_limit: f64,

    /// Keep <figname>*.txt intermediates
    #[arg(long)]
    pub keep_intermediate: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

/// Everything one rendering run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub discharge: PathBuf,
    pub mapname: String,
    pub cama_dir: PathBuf,
    pub rivnum: PathBuf,
    pub figname: String,
    pub bin_dir: PathBuf,
    pub work_dir: PathBuf,
    pub fig_dir: PathBuf,
    pub basin_shapefile: Option<PathBuf>,
    pub font: Option<PathBuf>,
    pub north_limit: f64,
    pub keep_intermediate: bool,
    pub style: FigureStyle,
}

impl RunConfig {
    /// Resolve arguments, loading and validating the style file if given.
    pub fn from_args(args: Args) -> Result<Self> {
        let style = match &args.style {
            Some(path) => FigureStyle::from_file(path)
                .with_context(|| format!("Failed to load figure style {}", path.display()))?,
            None => FigureStyle::default(),
        };

        if !args.north_limit.is_finite() {
            anyhow::bail!("north limit must be finite, got {}", args.north_limit);
        }

        Ok(Self {
            discharge: args.dataname,
            mapname: args.mapname,
            cama_dir: args.cama_dir,
            rivnum: args.rivnums,
            figname: args.figname,
            bin_dir: args.bin_dir,
            work_dir: args.work_dir,
            fig_dir: args.fig_dir,
            basin_shapefile: (!args.no_basin).then_some(args.basin_shapefile),
            font: args.font,
            north_limit: args.north_limit,
            keep_intermediate: args.keep_intermediate,
            style,
        })
    }

    pub fn map_paths(&self) -> MapPaths {
        MapPaths::new(&self.cama_dir, &self.mapname)
    }

    /// `<fig_dir>/<figname>.jpg`
    pub fn output_path(&self) -> PathBuf {
        self.fig_dir.join(format!("{}.jpg", self.figname))
    }

    /// Raw network file written by `txt_vector`.
    pub fn vector_path(&self) -> PathBuf {
        self.work_dir.join(format!("{}.txt", self.figname))
    }

    /// Per-level file written by `print_rivvec`.
    pub fn level_path(&self, level: u32) -> PathBuf {
        level_file(&self.work_dir, &self.figname, level)
    }
}

pub(crate) fn level_file(work_dir: &Path, figname: &str, level: u32) -> PathBuf {
    work_dir.join(format!("{}_{:02}.txt", figname, level))
}
