//! Row-major 2D grids indexed as `[y, x]`.

use crate::error::{MapError, MapResult};

/// A `ny x nx` grid stored row-major (row 0 is the northernmost row).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    nx: usize,
    ny: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Wrap row-major data; the length must equal `nx * ny`.
    pub fn new(nx: usize, ny: usize, data: Vec<T>) -> MapResult<Self> {
        if nx.checked_mul(ny) != Some(data.len()) {
            return Err(MapError::invalid_shape(format!(
                "{} values do not fill a {}x{} grid",
                data.len(),
                ny,
                nx
            )));
        }
        Ok(Self { nx, ny, data })
    }

    /// A grid with every cell set to `value`.
    pub fn filled(nx: usize, ny: usize, value: T) -> Self {
        Self {
            nx,
            ny,
            data: vec![value; nx * ny],
        }
    }

    /// Split a stacked `layers x ny x nx` buffer into one grid per layer.
    pub fn split_layers(nx: usize, ny: usize, layers: usize, data: Vec<T>) -> MapResult<Vec<Self>> {
        let cells = nx.checked_mul(ny).unwrap_or(0);
        if cells == 0 || cells.checked_mul(layers) != Some(data.len()) {
            return Err(MapError::invalid_shape(format!(
                "{} values do not fill {} layers of {}x{}",
                data.len(),
                layers,
                ny,
                nx
            )));
        }
        Ok(data
            .chunks_exact(cells)
            .map(|layer| Self {
                nx,
                ny,
                data: layer.to_vec(),
            })
            .collect())
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Value at `(x, y)`, or `None` when out of range.
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x >= self.nx || y >= self.ny {
            return None;
        }
        Some(self.data[y * self.nx + x])
    }

    /// Signed lookup; negative indices are out of range.
    pub fn get_signed(&self, x: i64, y: i64) -> Option<T> {
        if x < 0 || y < 0 {
            return None;
        }
        self.get(x as usize, y as usize)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Build a new grid of the same shape by mapping every cell.
    pub fn map<U: Copy, F: Fn(T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            nx: self.nx,
            ny: self.ny,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}
