//! Synthetic CaMa map directories for tests.
//!
//! A [`SyntheticMap`] describes every grid of a small map in memory;
//! [`SyntheticMap::write`] lays it out on disk the way the loaders expect:
//!
//! ```text
//! <cama_dir>/map/<mapname>/params.txt
//! <cama_dir>/map/<mapname>/nextxy.bin
//! <cama_dir>/map/<mapname>/uparea.bin
//! <cama_dir>/map/<mapname>/1min/location.txt
//! <cama_dir>/map/<mapname>/1min/1min.catmxy.bin
//! <cama_dir>/rivnum.bin
//! ```

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::generators::{f32_bytes, i16_bytes, i32_bytes, location_txt, params_txt};

/// Map name used by [`MapFixture`].
pub const FIXTURE_MAP_NAME: &str = "test_1min";

/// In-memory description of a CaMa map.
#[derive(Debug, Clone)]
pub struct SyntheticMap {
    pub nx: usize,
    pub ny: usize,
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
    pub nxx: usize,
    pub nyy: usize,
    pub next_x: Vec<i32>,
    pub next_y: Vec<i32>,
    pub uparea: Vec<f32>,
    pub rivnum: Vec<i32>,
    /// 1-based coarse x per fine pixel.
    pub catm_ix: Vec<i16>,
    /// 1-based coarse y per fine pixel.
    pub catm_iy: Vec<i16>,
}

impl SyntheticMap {
    /// Every coarse cell is a river and every fine pixel maps to cell
    /// `(0, 0)` (1-based `(1, 1)`).
    pub fn uniform(nx: usize, ny: usize, nxx: usize, nyy: usize, west: f64, north: f64) -> Self {
        let cells = nx * ny;
        let fine = nxx * nyy;
        Self {
            nx,
            ny,
            west,
            east: west + nxx as f64 / 60.0,
            south: north - nyy as f64 / 60.0,
            north,
            nxx,
            nyy,
            next_x: vec![1; cells],
            next_y: vec![1; cells],
            uparea: vec![1.0e6; cells],
            rivnum: vec![1; cells],
            catm_ix: vec![1; fine],
            catm_iy: vec![1; fine],
        }
    }

    /// Point fine pixel `(ixx, iyy)` at 1-based coarse cell `(ix, iy)`.
    pub fn map_pixel(&mut self, ixx: usize, iyy: usize, ix: i16, iy: i16) {
        let at = iyy * self.nxx + ixx;
        self.catm_ix[at] = ix;
        self.catm_iy[at] = iy;
    }

    /// Path of the map directory under `cama_dir`.
    pub fn map_dir(cama_dir: &Path, mapname: &str) -> PathBuf {
        cama_dir.join("map").join(mapname)
    }

    /// Write the map directory and return the rivnum file path.
    pub fn write(&self, cama_dir: &Path, mapname: &str) -> io::Result<PathBuf> {
        let map_dir = Self::map_dir(cama_dir, mapname);
        let fine_dir = map_dir.join("1min");
        std::fs::create_dir_all(&fine_dir)?;

        std::fs::write(
            map_dir.join("params.txt"),
            params_txt(self.nx, self.ny, self.west, self.east, self.south, self.north),
        )?;

        let mut nextxy = self.next_x.clone();
        nextxy.extend(&self.next_y);
        std::fs::write(map_dir.join("nextxy.bin"), i32_bytes(&nextxy))?;
        std::fs::write(map_dir.join("uparea.bin"), f32_bytes(&self.uparea))?;

        std::fs::write(
            fine_dir.join("location.txt"),
            location_txt(self.nxx, self.nyy, self.west, self.north),
        )?;
        let mut catmxy = self.catm_ix.clone();
        catmxy.extend(&self.catm_iy);
        std::fs::write(fine_dir.join("1min.catmxy.bin"), i16_bytes(&catmxy))?;

        let rivnum = cama_dir.join("rivnum.bin");
        std::fs::write(&rivnum, i32_bytes(&self.rivnum))?;
        Ok(rivnum)
    }
}

/// Write a float32 discharge time series (frames stacked in time order).
pub fn write_discharge(path: &Path, frames: &[f32]) -> io::Result<()> {
    std::fs::write(path, f32_bytes(frames))
}

/// A synthetic map written into its own temp directory.
pub struct MapFixture {
    pub dir: TempDir,
    pub map: SyntheticMap,
    pub mapname: String,
    pub rivnum: PathBuf,
    pub discharge: PathBuf,
}

impl MapFixture {
    /// Write `map` plus a discharge file holding `frames`.
    pub fn new(map: SyntheticMap, frames: &[f32]) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let rivnum = map.write(dir.path(), FIXTURE_MAP_NAME)?;
        let discharge = dir.path().join("outflw.bin");
        write_discharge(&discharge, frames)?;
        Ok(Self {
            dir,
            map,
            mapname: FIXTURE_MAP_NAME.to_string(),
            rivnum,
            discharge,
        })
    }

    pub fn cama_dir(&self) -> &Path {
        self.dir.path()
    }
}
