//! River vector sources.
//!
//! The renderer only needs, per stream-order level, the text lines that
//! describe that level's segments. [`RivvecTools`] produces them with the
//! CaMa `txt_vector` and `print_rivvec` utilities; tests substitute their
//! own [`VectorSource`].

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use cama_map::GeoExtent;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{level_file, RunConfig};

/// Errors from producing or parsing vector text.
#[derive(Debug, Error)]
pub enum VectorError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid number '{token}' in vector line '{line}'")]
    InvalidNumber { line: String, token: String },

    #[error("Non-finite coordinate '{token}' in vector line '{line}'")]
    NonFinite { line: String, token: String },

    #[error("Vector source used before prepare()")]
    NotPrepared,
}

/// Supplies raw segment lines for each stream-order level.
pub trait VectorSource {
    /// Called once, before any level, with the display extent.
    fn prepare(&mut self, extent: &GeoExtent) -> Result<(), VectorError>;

    /// All lines for `level`, unparsed.
    fn level_lines(&mut self, level: u32) -> Result<Vec<String>, VectorError>;
}

/// A directed segment as written by `print_rivvec`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSegment {
    pub lon1: f64,
    pub lat1: f64,
    pub lon2: f64,
    pub lat2: f64,
}

/// Parse `lon1 lat1 <ignored> lon2 lat2 ...`.
///
/// Lines with fewer than five tokens yield `Ok(None)`; a token that is
/// present but not a finite number is an error.
pub fn parse_segment_line(line: &str) -> Result<Option<RawSegment>, VectorError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 5 {
        return Ok(None);
    }

    let number = |i: usize| -> Result<f64, VectorError> {
        let value = tokens[i].parse::<f64>().map_err(|_| VectorError::InvalidNumber {
            line: line.to_string(),
            token: tokens[i].to_string(),
        })?;
        if !value.is_finite() {
            return Err(VectorError::NonFinite {
                line: line.to_string(),
                token: tokens[i].to_string(),
            });
        }
        Ok(value)
    };

    Ok(Some(RawSegment {
        lon1: number(0)?,
        lat1: number(1)?,
        lon2: number(3)?,
        lat2: number(4)?,
    }))
}

/// Vector source backed by the CaMa `txt_vector` / `print_rivvec` tools.
#[derive(Debug, Clone)]
pub struct RivvecTools {
    bin_dir: PathBuf,
    work_dir: PathBuf,
    cama_dir: PathBuf,
    mapname: String,
    figname: String,
    network: Option<PathBuf>,
}

impl RivvecTools {
    pub fn new(
        bin_dir: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        cama_dir: impl Into<PathBuf>,
        mapname: impl Into<String>,
        figname: impl Into<String>,
    ) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            work_dir: work_dir.into(),
            cama_dir: cama_dir.into(),
            mapname: mapname.into(),
            figname: figname.into(),
            network: None,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            &config.bin_dir,
            &config.work_dir,
            &config.cama_dir,
            &config.mapname,
            &config.figname,
        )
    }

    /// Run `<bin_dir>/<tool> args...` with stdout redirected to `out`.
    ///
    /// A non-zero exit is only logged; whatever the tool wrote is kept.
    fn run_to_file(&self, tool: &str, args: &[String], out: &Path) -> Result<(), VectorError> {
        let program = self.bin_dir.join(tool);
        let file = File::create(out).map_err(|source| VectorError::Io {
            path: out.to_path_buf(),
            source,
        })?;

        debug!(program = %program.display(), args = ?args, out = %out.display(), "Running external tool");
        let status = Command::new(&program)
            .args(args)
            .stdout(Stdio::from(file))
            .status()
            .map_err(|source| VectorError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            warn!(
                program = %program.display(),
                status = %status,
                "External tool failed; continuing with its output"
            );
        }
        Ok(())
    }
}

impl VectorSource for RivvecTools {
    fn prepare(&mut self, extent: &GeoExtent) -> Result<(), VectorError> {
        let network = self.work_dir.join(format!("{}.txt", self.figname));
        let args = vec![
            extent.west.to_string(),
            extent.east.to_string(),
            extent.north.to_string(),
            extent.south.to_string(),
            self.cama_dir.display().to_string(),
            self.mapname.clone(),
        ];
        self.run_to_file("txt_vector", &args, &network)?;
        self.network = Some(network);
        Ok(())
    }

    fn level_lines(&mut self, level: u32) -> Result<Vec<String>, VectorError> {
        let network = self.network.as_ref().ok_or(VectorError::NotPrepared)?;
        let out = level_file(&self.work_dir, &self.figname, level);
        let args = vec![
            network.display().to_string(),
            "1".to_string(),
            level.to_string(),
        ];
        self.run_to_file("print_rivvec", &args, &out)?;
        read_lines(&out)
    }
}

/// Read a text file as owned lines.
pub fn read_lines(path: &Path) -> Result<Vec<String>, VectorError> {
    let text = std::fs::read_to_string(path).map_err(|source| VectorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.lines().map(str::to_string).collect())
}
