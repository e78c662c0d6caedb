//! `params.txt`: discharge grid dimensions and geographic bounds.
//!
//! The file is positional: the first whitespace token of lines 1, 2, 5, 6,
//! 7 and 8 hold `nx`, `ny`, `west`, `east`, `south` and `north`.

use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{MapError, MapResult};
use crate::extent::GeoExtent;

/// North bound applied to the rendered extent.
pub const DEFAULT_NORTH_LIMIT: f64 = 32.0;

/// Grid parameters of a CaMa map.
///
/// `north` is the raw value from the file. It anchors the fine-grid
/// coordinate transform and is never clamped; only [`display_extent`]
/// applies the display limit.
///
/// [`display_extent`]: MapParams::display_extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapParams {
    pub nx: usize,
    pub ny: usize,
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl MapParams {
    /// Read and parse a `params.txt` file.
    pub fn from_file(path: &Path) -> MapResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MapError::io(path, e))?;
        Self::parse(path, &text)
    }

    /// Parse `params.txt` content; `path` is only used in error messages.
    pub fn parse(path: &Path, text: &str) -> MapResult<Self> {
        let lines: Vec<&str> = text.lines().collect();

        let params = Self {
            nx: parse_token(path, &lines, 0, 0, "integer")?,
            ny: parse_token(path, &lines, 1, 0, "integer")?,
            west: parse_token(path, &lines, 4, 0, "float")?,
            east: parse_token(path, &lines, 5, 0, "float")?,
            south: parse_token(path, &lines, 6, 0, "float")?,
            north: parse_token(path, &lines, 7, 0, "float")?,
        };

        if params.nx == 0 || params.ny == 0 {
            return Err(MapError::invalid_shape(format!(
                "{}: grid dimensions must be positive (nx={}, ny={})",
                path.display(),
                params.nx,
                params.ny
            )));
        }
        // nextxy is the widest grid: two int32 layers
        checked_bytes(path, params.nx, params.ny, 2, 4)?;

        Ok(params)
    }

    /// Number of cells in one `ny x nx` layer.
    pub fn cells(&self) -> usize {
        self.nx * self.ny
    }

    /// The unclamped bounds as stored in the file.
    pub fn extent(&self) -> GeoExtent {
        GeoExtent::new(self.west, self.east, self.south, self.north)
    }

    /// The rendered extent: north lowered to `min(north, north_limit)`.
    pub fn display_extent(&self, north_limit: f64) -> GeoExtent {
        self.extent().with_north_limit(north_limit)
    }

    /// Origin of the fine-grid transform, `(west, north0)`.
    pub fn fine_origin(&self) -> (f64, f64) {
        (self.west, self.north)
    }
}

/// Byte size of a `layers x ny x nx` grid of `scalar`-byte values, or an
/// error naming `path` when it does not fit in memory addressing.
pub(crate) fn checked_bytes(
    path: &Path,
    nx: usize,
    ny: usize,
    layers: usize,
    scalar: usize,
) -> MapResult<usize> {
    nx.checked_mul(ny)
        .and_then(|cells| cells.checked_mul(layers))
        .and_then(|values| values.checked_mul(scalar))
        .ok_or_else(|| {
            MapError::invalid_shape(format!(
                "{}: a {}x{} grid is too large",
                path.display(),
                ny,
                nx
            ))
        })
}

/// Token `token` (0-based) of line `line` (0-based).
pub(crate) fn token_at<'a>(
    path: &Path,
    lines: &[&'a str],
    line: usize,
    token: usize,
) -> MapResult<&'a str> {
    lines
        .get(line)
        .and_then(|l| l.split_whitespace().nth(token))
        .ok_or_else(|| MapError::MissingToken {
            path: path.to_path_buf(),
            line: line + 1,
            token,
        })
}

/// Parse token `token` of line `line` as `T`.
pub(crate) fn parse_token<T: FromStr>(
    path: &Path,
    lines: &[&str],
    line: usize,
    token: usize,
    expected: &'static str,
) -> MapResult<T> {
    let raw = token_at(path, lines, line, token)?;
    raw.parse().map_err(|_| MapError::InvalidToken {
        path: path.to_path_buf(),
        line: line + 1,
        token,
        value: raw.to_string(),
        expected,
    })
}
