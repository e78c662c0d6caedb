//! Tests for figure style loading and validation.

use renderer::style::{Extend, FigureStyle};
use renderer::RenderError;

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_empty_document_yields_defaults() {
    let style = FigureStyle::from_json("{}").unwrap();
    assert_eq!(style.colormap, "viridis_r");
    assert_eq!(style.title, "Mean Discharge");
    assert_eq!(style.colorbar.extend, Extend::Both);
    assert_eq!(style.rivers.max_level, 10);
    assert!(style.validate().is_ok());
}

#[test]
fn test_river_width_grows_with_square_of_level() {
    let style = FigureStyle::default();
    assert!((style.rivers.line_width_pt(1) - 0.05).abs() < 1e-12);
    assert!((style.rivers.line_width_pt(4) - 0.8).abs() < 1e-12);
    assert!((style.rivers.line_width_pt(10) - 5.0).abs() < 1e-12);
    assert_eq!(style.rivers.levels().count(), 10);
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn test_partial_override_keeps_other_fields() {
    let json = r##"{
        "colormap": "Blues",
        "rivers": { "max_level": 6 },
        "colorbar": { "extend": "neither" }
    }"##;
    let style = FigureStyle::from_json(json).unwrap();
    assert_eq!(style.colormap, "Blues");
    assert_eq!(style.rivers.max_level, 6);
    assert!((style.rivers.base_width_pt - 0.05).abs() < 1e-12);
    assert_eq!(style.colorbar.extend, Extend::Neither);
    assert!(!style.colorbar.extend.has_min());
    assert_eq!(style.dpi, 300.0);
}

#[test]
fn test_from_file_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("style.json");
    std::fs::write(&path, r#"{ "colormap": "rainbow" }"#).unwrap();

    let err = FigureStyle::from_file(&path).unwrap_err();
    assert!(matches!(err, RenderError::UnknownColormap(name) if name == "rainbow"));
}

#[test]
fn test_from_file_reports_bad_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("style.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        FigureStyle::from_file(&path),
        Err(RenderError::StyleFile { .. })
    ));
}

#[test]
fn test_invalid_color_rejected() {
    let mut style = FigureStyle::default();
    style.basin.edge_color = "grey".to_string();
    assert!(matches!(style.validate(), Err(RenderError::InvalidStyle(_))));
}

#[test]
fn test_jpeg_quality_range() {
    let mut style = FigureStyle::default();
    style.jpeg_quality = 0;
    assert!(style.validate().is_err());
}
