//! End-to-end tests of the discharge map pipeline with an in-memory
//! vector source.

use std::collections::HashMap;
use std::path::Path;

use cama_map::{CamaMap, DiscardReason, GeoExtent, MapPaths};
use discharge_map::{
    remove_intermediate_files, render_level, render_map, RunConfig, VectorError, VectorSource,
};
use renderer::{Colormap, FigureStyle, Normalize, RiverStyle};
use test_utils::{polygon_shp_bytes, rivvec_line, MapFixture, SyntheticMap};

/// Serves fixed lines per level and records what it was asked for.
#[derive(Default)]
struct FakeSource {
    levels: HashMap<u32, Vec<String>>,
    prepared: Option<GeoExtent>,
    requested: Vec<u32>,
}

impl FakeSource {
    fn with_level(level: u32, lines: Vec<String>) -> Self {
        let mut source = Self::default();
        source.levels.insert(level, lines);
        source
    }
}

impl VectorSource for FakeSource {
    fn prepare(&mut self, extent: &GeoExtent) -> Result<(), VectorError> {
        self.prepared = Some(*extent);
        Ok(())
    }

    fn level_lines(&mut self, level: u32) -> Result<Vec<String>, VectorError> {
        self.requested.push(level);
        Ok(self.levels.get(&level).cloned().unwrap_or_default())
    }
}

fn load(fixture: &MapFixture) -> CamaMap {
    CamaMap::load(
        &MapPaths::new(fixture.cama_dir(), &fixture.mapname),
        &fixture.rivnum,
    )
    .unwrap()
}

fn config_for(fixture: &MapFixture, out: &Path) -> RunConfig {
    let mut style = FigureStyle::default();
    style.dpi = 60.0;
    RunConfig {
        discharge: fixture.discharge.clone(),
        mapname: fixture.mapname.clone(),
        cama_dir: fixture.cama_dir().to_path_buf(),
        rivnum: fixture.rivnum.clone(),
        figname: "gbm".to_string(),
        bin_dir: out.join("bin"),
        work_dir: out.to_path_buf(),
        fig_dir: out.join("fig"),
        basin_shapefile: None,
        font: None,
        north_limit: 32.0,
        keep_intermediate: false,
        style,
    }
}

// ============================================================================
// Segment rendering
// ============================================================================

#[test]
fn test_one_valid_line_draws_one_segment() {
    let map = SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0);
    let fixture = MapFixture::new(map, &[100.0, 200.0, 300.0, 400.0]).unwrap();
    let cama = load(&fixture);
    let discharge = cama.load_discharge(&fixture.discharge).unwrap();
    let resolver = cama.resolver(&discharge);

    let cmap = Colormap::from_name("viridis_r").unwrap();
    let norm = Normalize::new(0.0, discharge.max() as f64);
    let lines = vec![
        rivvec_line(90.01, 24.99, 90.02, 24.98),
        "90.01 24.99 1".to_string(),
    ];

    let layer = render_level(1, &lines, &resolver, &cmap, &norm, &RiverStyle::default()).unwrap();

    assert_eq!(layer.collection.len(), 1);
    assert_eq!(layer.stats.lines_read, 2);
    assert_eq!(layer.stats.malformed, 1);
    assert_eq!(layer.stats.drawn, 1);
    assert_eq!(layer.stats.total_discarded(), 0);
    assert_eq!(layer.collection.colors()[0], cmap.color(100.0 / 400.0));
    assert!((layer.collection.width_pt() - 0.05).abs() < 1e-12);
}

#[test]
fn test_discards_are_attributed_to_first_failed_check() {
    let mut map = SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0);
    map.rivnum[1] = 0; // cell (1, 0) is not a river
    map.map_pixel(3, 0, 2, 1); // -> cell (1, 0)
    map.map_pixel(3, 3, 0, 0); // -> nowhere
    map.map_pixel(0, 3, 1, 2); // -> cell (0, 1), missing discharge
    let fixture = MapFixture::new(map, &[100.0, 200.0, -9999.0, 400.0]).unwrap();
    let cama = load(&fixture);
    let discharge = cama.load_discharge(&fixture.discharge).unwrap();
    let resolver = cama.resolver(&discharge);

    let lines = vec![
        rivvec_line(90.01, 24.99, 90.02, 24.98),
        rivvec_line(90.06, 24.99, 90.065, 24.98),
        rivvec_line(90.06, 24.945, 90.065, 24.94),
        rivvec_line(90.005, 24.945, 90.01, 24.94),
        rivvec_line(95.0, 24.99, 95.01, 24.98),
    ];
    let layer = render_level(
        4,
        &lines,
        &resolver,
        &Colormap::from_name("viridis_r").unwrap(),
        &Normalize::new(0.0, 400.0),
        &RiverStyle::default(),
    )
    .unwrap();

    let stats = &layer.stats;
    assert_eq!(stats.drawn, 1);
    assert_eq!(stats.discarded(DiscardReason::NotRiver), 1);
    assert_eq!(stats.discarded(DiscardReason::NoCatchment), 1);
    assert_eq!(stats.discarded(DiscardReason::MissingDischarge), 1);
    assert_eq!(stats.discarded(DiscardReason::OutsideFineGrid), 1);
    assert!((layer.collection.width_pt() - 0.8).abs() < 1e-12);
}

#[test]
fn test_antimeridian_segment_is_clamped() {
    let map = SyntheticMap::uniform(1, 1, 4, 4, 179.95, 10.0);
    let fixture = MapFixture::new(map, &[5.0]).unwrap();
    let cama = load(&fixture);
    let discharge = cama.load_discharge(&fixture.discharge).unwrap();
    let resolver = cama.resolver(&discharge);

    let lines = vec![rivvec_line(179.96, 9.99, -179.99, 9.98)];
    let layer = render_level(
        1,
        &lines,
        &resolver,
        &Colormap::from_name("viridis").unwrap(),
        &Normalize::new(0.0, 5.0),
        &RiverStyle::default(),
    )
    .unwrap();

    let segment = layer.collection.segments()[0];
    assert_eq!(segment.end.x, 180.0);
    assert_eq!(segment.end.y, 9.98);
}

#[test]
fn test_bad_number_is_fatal() {
    let fixture = MapFixture::new(SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0), &[1.0; 4]).unwrap();
    let cama = load(&fixture);
    let discharge = cama.load_discharge(&fixture.discharge).unwrap();
    let resolver = cama.resolver(&discharge);

    let lines = vec!["90.01 24.99 1 east 24.98".to_string()];
    let result = render_level(
        1,
        &lines,
        &resolver,
        &Colormap::from_name("viridis_r").unwrap(),
        &Normalize::new(0.0, 1.0),
        &RiverStyle::default(),
    );
    assert!(matches!(result, Err(VectorError::InvalidNumber { .. })));

    let lines = vec!["NaN 24.99 1 90.02 24.98".to_string()];
    let result = render_level(
        1,
        &lines,
        &resolver,
        &Colormap::from_name("viridis_r").unwrap(),
        &Normalize::new(0.0, 1.0),
        &RiverStyle::default(),
    );
    assert!(matches!(result, Err(VectorError::NonFinite { .. })));
}

// ============================================================================
// Full figure
// ============================================================================

#[test]
fn test_render_map_writes_jpeg() {
    let map = SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0);
    let fixture = MapFixture::new(map, &[100.0, 200.0, 300.0, 400.0]).unwrap();
    let out = tempfile::tempdir().unwrap();

    let shp = out.path().join("basin.shp");
    std::fs::write(
        &shp,
        polygon_shp_bytes(&[vec![
            (90.01, 24.94),
            (90.06, 24.94),
            (90.06, 24.99),
            (90.01, 24.99),
            (90.01, 24.94),
        ]]),
    )
    .unwrap();

    let mut config = config_for(&fixture, out.path());
    config.basin_shapefile = Some(shp);

    let mut source = FakeSource::with_level(3, vec![rivvec_line(90.01, 24.99, 90.05, 24.95)]);
    let summary = render_map(&config, &mut source).unwrap();

    assert_eq!(source.requested, (1..=10).collect::<Vec<u32>>());
    assert_eq!(summary.levels.len(), 10);
    assert_eq!(summary.segments_drawn(), 1);
    assert_eq!(summary.levels[2].drawn, 1);
    assert_eq!(summary.output, out.path().join("fig").join("gbm.jpg"));

    let bytes = std::fs::read(&summary.output).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    assert!(summary.width > 0 && summary.height > 0);
}

#[test]
fn test_north_limit_only_affects_display() {
    let map = SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0);
    let fixture = MapFixture::new(map, &[100.0, 200.0, 300.0, 400.0]).unwrap();
    let out = tempfile::tempdir().unwrap();

    let mut config = config_for(&fixture, out.path());
    config.north_limit = 24.99;

    // row 0 of the fine grid lies above the display limit
    let mut source = FakeSource::with_level(1, vec![rivvec_line(90.01, 24.995, 90.02, 24.99)]);
    let summary = render_map(&config, &mut source).unwrap();

    let extent = source.prepared.unwrap();
    assert_eq!(extent.north, 24.99);
    assert_eq!(extent.west, 90.0);
    assert_eq!(summary.levels[0].drawn, 1);
}

#[test]
fn test_missing_map_is_error() {
    let out = tempfile::tempdir().unwrap();
    let fixture = MapFixture::new(SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0), &[1.0; 4]).unwrap();
    let mut config = config_for(&fixture, out.path());
    config.mapname = "missing".to_string();

    let mut source = FakeSource::default();
    assert!(render_map(&config, &mut source).is_err());
    assert!(source.prepared.is_none());
}

// ============================================================================
// Cleanup
// ============================================================================

#[test]
fn test_remove_intermediate_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["gbm.txt", "gbm_01.txt", "gbm_10.txt", "gbm.jpg", "other.txt", "xgbm.txt"] {
        std::fs::write(dir.path().join(name), "").unwrap();
    }
    std::fs::create_dir(dir.path().join("gbm_dir.txt")).unwrap();

    let removed = remove_intermediate_files(dir.path(), "gbm").unwrap();
    assert_eq!(removed, 3);

    let mut left: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    left.sort();
    assert_eq!(left, vec!["gbm.jpg", "gbm_dir.txt", "other.txt", "xgbm.txt"]);
}
