//! River mask and time-mean discharge.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::binary::{decode_le, file_len};
use crate::error::{MapError, MapResult};
use crate::grid::Grid;

/// Raw values at or above this are undefined and zeroed before averaging.
pub const UNDEFINED_THRESHOLD: f32 = 1e19;

/// Missing-value sentinel checked when resolving segments.
pub const MISSING_DISCHARGE: f32 = -9999.0;

/// Cells that hold a routable river.
#[derive(Debug, Clone)]
pub struct RiverMask {
    cells: Grid<bool>,
}

impl RiverMask {
    /// A cell is a river when `rivnum == 1`, it has a downstream cell
    /// (`next_x > 0`) and a positive upstream area.
    pub fn build(rivnum: &Grid<i32>, next_x: &Grid<i32>, uparea: &Grid<f32>) -> MapResult<Self> {
        let (nx, ny) = (rivnum.nx(), rivnum.ny());
        if (next_x.nx(), next_x.ny()) != (nx, ny) || (uparea.nx(), uparea.ny()) != (nx, ny) {
            return Err(MapError::invalid_shape(format!(
                "river mask inputs differ in shape: rivnum {}x{}, nextxy {}x{}, uparea {}x{}",
                ny,
                nx,
                next_x.ny(),
                next_x.nx(),
                uparea.ny(),
                uparea.nx()
            )));
        }

        let data = rivnum
            .as_slice()
            .iter()
            .zip(next_x.as_slice())
            .zip(uparea.as_slice())
            .map(|((&num, &next), &area)| num == 1 && next > 0 && area > 0.0)
            .collect();

        Ok(Self {
            cells: Grid::new(nx, ny, data)?,
        })
    }

    /// Wrap an existing boolean grid.
    pub fn from_grid(cells: Grid<bool>) -> Self {
        Self { cells }
    }

    /// Out-of-range cells are not rivers.
    pub fn is_river(&self, x: usize, y: usize) -> bool {
        self.cells.get(x, y).unwrap_or(false)
    }

    /// Number of river cells.
    pub fn count(&self) -> usize {
        self.cells.as_slice().iter().filter(|&&c| c).count()
    }

    pub fn grid(&self) -> &Grid<bool> {
        &self.cells
    }
}

/// Mean discharge per cell over every timestep of a run.
#[derive(Debug, Clone)]
pub struct DischargeField {
    mean: Grid<f32>,
    timesteps: usize,
}

impl DischargeField {
    /// Reduce stacked `(time, ny, nx)` frames to their mean.
    ///
    /// Undefined values (`>= 1e19`) count as zero but still count toward
    /// the divisor: the mean is over all timesteps, not over valid ones.
    pub fn time_mean(frames: &[f32], nx: usize, ny: usize) -> MapResult<Self> {
        let cells = nx.checked_mul(ny).unwrap_or(0);
        if cells == 0 || frames.is_empty() || frames.len() % cells != 0 {
            return Err(MapError::invalid_shape(format!(
                "{} discharge values are not a whole number of {}x{} frames",
                frames.len(),
                ny,
                nx
            )));
        }

        let mut acc = MeanAccumulator::new(cells);
        for frame in frames.chunks_exact(cells) {
            acc.add_frame(frame);
        }
        acc.finish(nx, ny)
    }

    /// Stream a float32 `(time, ny, nx)` file one frame at a time.
    pub fn from_file(path: &Path, nx: usize, ny: usize) -> MapResult<Self> {
        let cells = nx.checked_mul(ny).unwrap_or(0);
        let frame_bytes = cells.checked_mul(4).unwrap_or(0) as u64;
        if frame_bytes == 0 {
            return Err(MapError::invalid_shape(format!(
                "{}: unusable {}x{} discharge frame",
                path.display(),
                ny,
                nx
            )));
        }
        let len = file_len(path)?;
        if len == 0 || len % frame_bytes != 0 {
            return Err(MapError::invalid_shape(format!(
                "{}: {} bytes is not a whole number of {}-byte frames",
                path.display(),
                len,
                frame_bytes
            )));
        }

        let file = File::open(path).map_err(|e| MapError::io(path, e))?;
        let mut reader = BufReader::new(file);
        let mut buf = vec![0u8; cells * 4];
        let mut acc = MeanAccumulator::new(cells);

        for _ in 0..(len / frame_bytes) {
            reader
                .read_exact(&mut buf)
                .map_err(|e| MapError::io(path, e))?;
            acc.add_frame(&decode_le::<f32>(&buf));
        }

        let field = acc.finish(nx, ny)?;
        debug!(path = %path.display(), timesteps = field.timesteps, "Reduced discharge time series");
        Ok(field)
    }

    /// Mean value at `(x, y)`.
    pub fn value(&self, x: usize, y: usize) -> Option<f32> {
        self.mean.get(x, y)
    }

    /// Largest mean over all cells; the upper bound of the color scale.
    pub fn max(&self) -> f32 {
        self.mean
            .as_slice()
            .iter()
            .fold(f32::NEG_INFINITY, |m, &v| m.max(v))
    }

    pub fn timesteps(&self) -> usize {
        self.timesteps
    }

    pub fn grid(&self) -> &Grid<f32> {
        &self.mean
    }
}

struct MeanAccumulator {
    sums: Vec<f64>,
    frames: usize,
}

impl MeanAccumulator {
    fn new(cells: usize) -> Self {
        Self {
            sums: vec![0.0; cells],
            frames: 0,
        }
    }

    fn add_frame(&mut self, frame: &[f32]) {
        for (sum, &v) in self.sums.iter_mut().zip(frame) {
            // NaN fails the comparison and is zeroed like undefined values
            if v < UNDEFINED_THRESHOLD {
                *sum += v as f64;
            }
        }
        self.frames += 1;
    }

    fn finish(self, nx: usize, ny: usize) -> MapResult<DischargeField> {
        let n = self.frames as f64;
        let mean = self.sums.iter().map(|s| (s / n) as f32).collect();
        Ok(DischargeField {
            mean: Grid::new(nx, ny, mean)?,
            timesteps: self.frames,
        })
    }
}
