//! Tests of the external tool adapter against stand-in shell scripts.
//!
//! Everything that spawns processes lives in one test so no other thread
//! forks while a script is still open for writing.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use cama_map::GeoExtent;
use discharge_map::{run, RivvecTools, RunConfig, VectorError, VectorSource};
use renderer::FigureStyle;
use test_utils::{MapFixture, SyntheticMap};

fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_rivvec_tools() {
    let root = tempfile::tempdir().unwrap();
    let good = root.path().join("good");
    let failing = root.path().join("failing");
    let work = root.path().join("work");
    for dir in [&good, &failing, &work] {
        std::fs::create_dir_all(dir).unwrap();
    }

    write_script(&good, "txt_vector", r#"echo "$@""#);
    write_script(
        &good,
        "print_rivvec",
        r#"if [ "$3" = "1" ]; then echo "90.01000 24.99000 1 90.02000 24.98000 0.0"; echo "bad"; fi"#,
    );
    write_script(&failing, "txt_vector", "exit 2");
    write_script(&failing, "print_rivvec", "echo 'partial'; exit 3");

    // txt_vector receives west east north south cama_dir mapname
    let extent = GeoExtent::new(88.0, 92.5, 21.0, 32.0);
    let mut tools = RivvecTools::new(&good, &work, "/data/CaMa", "glb_15min", "gbm");
    tools.prepare(&extent).unwrap();
    let network = std::fs::read_to_string(work.join("gbm.txt")).unwrap();
    assert_eq!(network.trim(), "88 92.5 32 21 /data/CaMa glb_15min");

    // print_rivvec receives <network> 1 <level>, output kept per level
    let lines = tools.level_lines(1).unwrap();
    assert_eq!(lines.len(), 2);
    assert!(work.join("gbm_01.txt").exists());
    assert!(tools.level_lines(2).unwrap().is_empty());
    assert!(work.join("gbm_02.txt").exists());

    // non-zero exit keeps whatever was written
    let mut tools = RivvecTools::new(&failing, &work, "/data/CaMa", "glb_15min", "bad");
    tools.prepare(&extent).unwrap();
    assert_eq!(tools.level_lines(5).unwrap(), vec!["partial".to_string()]);

    // a tool that cannot be started is fatal
    let mut tools = RivvecTools::new(root.path().join("nobin"), &work, "/data/CaMa", "glb_15min", "x");
    assert!(matches!(tools.prepare(&extent), Err(VectorError::Spawn { .. })));

    // full run through the tools, then cleanup of <figname>*.txt
    let fixture = MapFixture::new(
        SyntheticMap::uniform(2, 2, 4, 4, 90.0, 25.0),
        &[100.0, 200.0, 300.0, 400.0],
    )
    .unwrap();
    let run_dir = root.path().join("run");
    std::fs::create_dir_all(&run_dir).unwrap();
    std::fs::write(run_dir.join("keep.txt"), "").unwrap();

    let mut style = FigureStyle::default();
    style.dpi = 60.0;
    let config = RunConfig {
        discharge: fixture.discharge.clone(),
        mapname: fixture.mapname.clone(),
        cama_dir: fixture.cama_dir().to_path_buf(),
        rivnum: fixture.rivnum.clone(),
        figname: "gbm".to_string(),
        bin_dir: good.clone(),
        work_dir: run_dir.clone(),
        fig_dir: run_dir.join("fig"),
        basin_shapefile: None,
        font: None,
        north_limit: 32.0,
        keep_intermediate: false,
        style,
    };

    let summary = run(&config).unwrap();
    assert_eq!(summary.segments_drawn(), 1);
    assert_eq!(summary.levels[0].malformed, 1);
    assert!(run_dir.join("fig").join("gbm.jpg").exists());
    assert!(!run_dir.join("gbm.txt").exists());
    assert!(!run_dir.join("gbm_01.txt").exists());
    assert!(run_dir.join("keep.txt").exists());
}
