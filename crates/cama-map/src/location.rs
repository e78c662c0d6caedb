//! `1min/location.txt`: dimensions of the 1-arcminute catchment index grid.

use std::path::Path;

use crate::error::{MapError, MapResult};
use crate::params::{checked_bytes, parse_token};

/// Fine (1-arcminute) grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FineGridSpec {
    pub nxx: usize,
    pub nyy: usize,
}

impl FineGridSpec {
    /// Read and parse a `location.txt` file.
    pub fn from_file(path: &Path) -> MapResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MapError::io(path, e))?;
        Self::parse(path, &text)
    }

    /// Tokens 7 and 8 of the third line hold `nXX` and `nYY`.
    pub fn parse(path: &Path, text: &str) -> MapResult<Self> {
        let lines: Vec<&str> = text.lines().collect();
        let spec = Self {
            nxx: parse_token(path, &lines, 2, 6, "integer")?,
            nyy: parse_token(path, &lines, 2, 7, "integer")?,
        };
        if spec.nxx == 0 || spec.nyy == 0 {
            return Err(MapError::invalid_shape(format!(
                "{}: fine grid dimensions must be positive (nXX={}, nYY={})",
                path.display(),
                spec.nxx,
                spec.nyy
            )));
        }
        // catmxy: two int16 layers
        checked_bytes(path, spec.nxx, spec.nyy, 2, 2)?;
        Ok(spec)
    }

    pub fn cells(&self) -> usize {
        self.nxx * self.nyy
    }
}
