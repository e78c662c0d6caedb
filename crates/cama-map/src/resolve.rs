//! Resolution of geographic coordinates to discharge-grid cells through
//! the 1-arcminute catchment index.

use std::fmt;

use crate::error::{MapError, MapResult};
use crate::grid::Grid;
use crate::hydro::{DischargeField, RiverMask, MISSING_DISCHARGE};
use crate::location::FineGridSpec;
use crate::params::MapParams;

/// Fine-grid pixels per degree (1 arcminute).
pub const FINE_CELLS_PER_DEGREE: f64 = 60.0;

/// Per-pixel mapping from the fine grid to 1-based coarse `(ix, iy)`.
#[derive(Debug, Clone)]
pub struct CatchmentIndex {
    ix: Grid<i16>,
    iy: Grid<i16>,
}

impl CatchmentIndex {
    pub fn new(ix: Grid<i16>, iy: Grid<i16>) -> MapResult<Self> {
        if (ix.nx(), ix.ny()) != (iy.nx(), iy.ny()) {
            return Err(MapError::invalid_shape("catchment ix/iy layers differ in shape"));
        }
        Ok(Self { ix, iy })
    }

    /// Split a stacked `2 x nYY x nXX` array (ix layer first).
    pub fn from_stacked(spec: FineGridSpec, data: Vec<i16>) -> MapResult<Self> {
        let mut layers = Grid::split_layers(spec.nxx, spec.nyy, 2, data)?;
        let iy = layers.pop();
        let ix = layers.pop();
        match (ix, iy) {
            (Some(ix), Some(iy)) => Self::new(ix, iy),
            _ => Err(MapError::invalid_shape("catchment index needs two layers")),
        }
    }

    pub fn nxx(&self) -> usize {
        self.ix.nx()
    }

    pub fn nyy(&self) -> usize {
        self.ix.ny()
    }

    /// 0-based coarse cell for fine pixel `(ixx, iyy)`; `None` outside the
    /// fine grid. The result may still be negative or out of range.
    pub fn lookup(&self, ixx: i64, iyy: i64) -> Option<(i64, i64)> {
        let ix = self.ix.get_signed(ixx, iyy)?;
        let iy = self.iy.get_signed(ixx, iyy)?;
        Some((ix as i64 - 1, iy as i64 - 1))
    }
}

/// Why a segment was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// Coordinate falls outside the fine grid.
    OutsideFineGrid,
    /// Fine pixel maps to no coarse cell (0 or out of range).
    NoCatchment,
    /// Coarse cell is not part of the river mask.
    NotRiver,
    /// Coarse cell carries the -9999 sentinel.
    MissingDischarge,
}

impl DiscardReason {
    pub const ALL: [DiscardReason; 4] = [
        DiscardReason::OutsideFineGrid,
        DiscardReason::NoCatchment,
        DiscardReason::NotRiver,
        DiscardReason::MissingDischarge,
    ];
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiscardReason::OutsideFineGrid => "outside_fine_grid",
            DiscardReason::NoCatchment => "no_catchment",
            DiscardReason::NotRiver => "not_river",
            DiscardReason::MissingDischarge => "missing_discharge",
        };
        f.write_str(s)
    }
}

/// A coordinate that landed on a drawable river cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCell {
    pub ix: usize,
    pub iy: usize,
    pub discharge: f32,
}

/// Maps coordinates to discharge cells for one loaded map.
#[derive(Debug, Clone, Copy)]
pub struct CellResolver<'a> {
    west: f64,
    north0: f64,
    catchments: &'a CatchmentIndex,
    rivers: &'a RiverMask,
    discharge: &'a DischargeField,
}

impl<'a> CellResolver<'a> {
    /// The fine-grid origin is taken from the unclamped map bounds.
    pub fn new(
        params: &MapParams,
        catchments: &'a CatchmentIndex,
        rivers: &'a RiverMask,
        discharge: &'a DischargeField,
    ) -> Self {
        let (west, north0) = params.fine_origin();
        Self {
            west,
            north0,
            catchments,
            rivers,
            discharge,
        }
    }

    /// Fine pixel containing `(lon, lat)`.
    pub fn fine_index(&self, lon: f64, lat: f64) -> (i64, i64) {
        let ixx = ((lon - self.west) * FINE_CELLS_PER_DEGREE).floor();
        let iyy = ((-lat + self.north0) * FINE_CELLS_PER_DEGREE).floor();
        (ixx as i64, iyy as i64)
    }

    /// Resolve a coordinate, or report the first check it failed.
    pub fn resolve(&self, lon: f64, lat: f64) -> Result<ResolvedCell, DiscardReason> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(DiscardReason::OutsideFineGrid);
        }

        let (ixx, iyy) = self.fine_index(lon, lat);
        let (ix, iy) = self
            .catchments
            .lookup(ixx, iyy)
            .ok_or(DiscardReason::OutsideFineGrid)?;

        let grid = self.discharge.grid();
        if ix < 0 || iy < 0 || ix as usize >= grid.nx() || iy as usize >= grid.ny() {
            return Err(DiscardReason::NoCatchment);
        }
        let (ix, iy) = (ix as usize, iy as usize);

        if !self.rivers.is_river(ix, iy) {
            return Err(DiscardReason::NotRiver);
        }

        let discharge = self
            .discharge
            .value(ix, iy)
            .ok_or(DiscardReason::NoCatchment)?;
        if discharge == MISSING_DISCHARGE {
            return Err(DiscardReason::MissingDischarge);
        }

        Ok(ResolvedCell { ix, iy, discharge })
    }
}
