//! A loaded CaMa map: parameters, river mask and catchment index.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::binary::read_array;
use crate::error::{MapError, MapResult};
use crate::grid::Grid;
use crate::hydro::{DischargeField, RiverMask};
use crate::location::FineGridSpec;
use crate::params::MapParams;
use crate::resolve::{CatchmentIndex, CellResolver};

/// File locations inside `<CaMa_dir>/map/<mapname>/`.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPaths {
    pub map_dir: PathBuf,
    pub params: PathBuf,
    pub nextxy: PathBuf,
    pub uparea: PathBuf,
    pub location: PathBuf,
    pub catmxy: PathBuf,
}

impl MapPaths {
    pub fn new(cama_dir: &Path, mapname: &str) -> Self {
        let map_dir = cama_dir.join("map").join(mapname);
        let fine_dir = map_dir.join("1min");
        Self {
            params: map_dir.join("params.txt"),
            nextxy: map_dir.join("nextxy.bin"),
            uparea: map_dir.join("uparea.bin"),
            location: fine_dir.join("location.txt"),
            catmxy: fine_dir.join("1min.catmxy.bin"),
            map_dir,
        }
    }
}

/// Immutable map state shared by every rendered level.
#[derive(Debug, Clone)]
pub struct CamaMap {
    pub params: MapParams,
    pub fine: FineGridSpec,
    pub rivers: RiverMask,
    pub catchments: CatchmentIndex,
}

impl CamaMap {
    /// Load descriptors and grids; `rivnum` is the externally supplied
    /// river-number grid (`ny x nx` int32).
    pub fn load(paths: &MapPaths, rivnum: &Path) -> MapResult<Self> {
        let params = MapParams::from_file(&paths.params)?;
        let (nx, ny) = (params.nx, params.ny);

        // only the downstream-x layer decides river membership
        let next_x = Grid::split_layers(nx, ny, 2, read_array::<i32>(&paths.nextxy, 2 * nx * ny)?)?
            .into_iter()
            .next()
            .ok_or_else(|| MapError::invalid_shape("nextxy has no layers"))?;
        let uparea = Grid::new(nx, ny, read_array::<f32>(&paths.uparea, nx * ny)?)?;
        let rivnum = Grid::new(nx, ny, read_array::<i32>(rivnum, nx * ny)?)?;
        let rivers = RiverMask::build(&rivnum, &next_x, &uparea)?;

        let fine = FineGridSpec::from_file(&paths.location)?;
        let catchments = CatchmentIndex::from_stacked(fine, read_array::<i16>(&paths.catmxy, 2 * fine.cells())?)?;

        info!(
            nx,
            ny,
            nxx = fine.nxx,
            nyy = fine.nyy,
            river_cells = rivers.count(),
            "Loaded CaMa map"
        );

        Ok(Self {
            params,
            fine,
            rivers,
            catchments,
        })
    }

    /// Time-mean discharge on this map's grid.
    pub fn load_discharge(&self, path: &Path) -> MapResult<DischargeField> {
        DischargeField::from_file(path, self.params.nx, self.params.ny)
    }

    /// Resolver bound to this map and a discharge field.
    pub fn resolver<'a>(&'a self, discharge: &'a DischargeField) -> CellResolver<'a> {
        CellResolver::new(&self.params, &self.catchments, &self.rivers, discharge)
    }
}
