//! Integration tests for loading a CaMa map directory from disk.

use cama_map::{CamaMap, DiscardReason, MapError, MapPaths, DEFAULT_NORTH_LIMIT};
use test_utils::{assert_approx_eq, params_txt, MapFixture, SyntheticMap};

fn load(fixture: &MapFixture) -> Result<CamaMap, MapError> {
    let paths = MapPaths::new(fixture.cama_dir(), &fixture.mapname);
    CamaMap::load(&paths, &fixture.rivnum)
}

#[test]
fn test_load_uniform_map() {
    let fixture = MapFixture::new(SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0), &[1.0, 2.0, 3.0, 4.0]).unwrap();
    let map = load(&fixture).unwrap();

    assert_eq!(map.params.nx, 2);
    assert_eq!(map.params.ny, 2);
    assert_approx_eq!(map.params.west, 90.0, 1e-9);
    assert_approx_eq!(map.params.north, 25.0, 1e-9);
    assert_eq!((map.fine.nxx, map.fine.nyy), (4, 4));
    assert_eq!(map.rivers.count(), 4);
}

#[test]
fn test_discharge_mean_from_file() {
    // two frames of a 2x2 grid; the second frame has an undefined cell
    let frames = [2.0, 4.0, 6.0, 8.0, 1e20, 4.0, 6.0, 8.0];
    let fixture = MapFixture::new(SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0), &frames).unwrap();
    let map = load(&fixture).unwrap();
    let discharge = map.load_discharge(&fixture.discharge).unwrap();

    assert_eq!(discharge.timesteps(), 2);
    assert_eq!(discharge.value(0, 0), Some(1.0));
    assert_eq!(discharge.value(1, 0), Some(4.0));
    assert_eq!(discharge.max(), 8.0);
}

#[test]
fn test_truncated_grid_fails_loudly() {
    let fixture = MapFixture::new(SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0), &[1.0; 4]).unwrap();
    let uparea = SyntheticMap::map_dir(fixture.cama_dir(), &fixture.mapname).join("uparea.bin");
    std::fs::write(&uparea, [0u8; 12]).unwrap();

    match load(&fixture) {
        Err(MapError::SizeMismatch { expected, actual, .. }) => {
            assert_eq!(expected, 16);
            assert_eq!(actual, 12);
        }
        other => panic!("expected size mismatch, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_partial_discharge_frame_fails() {
    let fixture = MapFixture::new(SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0), &[1.0; 6]).unwrap();
    let map = load(&fixture).unwrap();
    match map.load_discharge(&fixture.discharge) {
        Err(MapError::InvalidShape(msg)) => {
            assert!(msg.contains("24 bytes is not a whole number of 16-byte frames"), "{}", msg);
        }
        other => panic!("expected partial frame error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_params_is_io_error() {
    let fixture = MapFixture::new(SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0), &[1.0; 4]).unwrap();
    let paths = MapPaths::new(fixture.cama_dir(), "no_such_map");
    assert!(matches!(
        CamaMap::load(&paths, &fixture.rivnum),
        Err(MapError::Io { .. })
    ));
}

#[test]
fn test_resolver_through_loaded_map() {
    let mut synthetic = SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0);
    // bottom-right fine pixel maps to coarse (1, 1) which is not a river
    synthetic.map_pixel(3, 3, 2, 2);
    synthetic.rivnum[3] = 0;
    let fixture = MapFixture::new(synthetic, &[5.0, 1.0, 1.0, 1.0]).unwrap();
    let map = load(&fixture).unwrap();
    let discharge = map.load_discharge(&fixture.discharge).unwrap();
    let resolver = map.resolver(&discharge);

    let hit = resolver.resolve(90.001, 24.999).unwrap();
    assert_eq!((hit.ix, hit.iy), (0, 0));
    assert_eq!(hit.discharge, 5.0);

    assert_eq!(resolver.resolve(90.06, 24.94), Err(DiscardReason::NotRiver));
}

#[test]
fn test_high_north_clamped_only_for_display() {
    let fixture = MapFixture::new(SyntheticMap::uniform(2, 2, 4, 4, 90.0, 40.0), &[1.0; 4]).unwrap();
    let map = load(&fixture).unwrap();

    assert_eq!(map.params.display_extent(DEFAULT_NORTH_LIMIT).north, 32.0);
    let discharge = map.load_discharge(&fixture.discharge).unwrap();
    // resolution still anchors at the raw north edge
    assert!(map.resolver(&discharge).resolve(90.001, 39.999).is_ok());
}

#[test]
fn test_oversized_dimensions_are_an_error() {
    let fixture = MapFixture::new(SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0), &[1.0; 4]).unwrap();
    let params = SyntheticMap::map_dir(fixture.cama_dir(), &fixture.mapname).join("params.txt");
    std::fs::write(
        &params,
        params_txt(5_000_000_000, 5_000_000_000, 90.0, 91.0, 24.0, 25.0),
    )
    .unwrap();

    match load(&fixture) {
        Err(MapError::InvalidShape(msg)) => assert!(msg.contains("params.txt"), "{}", msg),
        other => panic!("expected oversized grid error, got {:?}", other.map(|_| ())),
    }
}
