//! Minimal ESRI shapefile (`.shp`) reader for basin outlines.
//!
//! Only the main geometry file is read; attributes (`.dbf`) and the index
//! (`.shx`) are not needed to stroke outlines. PolyLine and Polygon records
//! (including their Z and M variants) are decoded into parts of (x, y)
//! vertices. Z and M values are skipped.

use std::path::Path;

use crate::error::{MapError, MapResult};

const FILE_CODE: i32 = 9994;
const VERSION: i32 = 1000;
const HEADER_LEN: usize = 100;
const RECORD_HEADER_LEN: usize = 8;

/// Shape type codes from the ESRI technical description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Null,
    Point,
    PolyLine,
    Polygon,
    MultiPoint,
    PointZ,
    PolyLineZ,
    PolygonZ,
    MultiPointZ,
    PointM,
    PolyLineM,
    PolygonM,
    MultiPointM,
    MultiPatch,
}

impl ShapeType {
    pub fn from_code(code: i32) -> Option<Self> {
        let t = match code {
            0 => ShapeType::Null,
            1 => ShapeType::Point,
            3 => ShapeType::PolyLine,
            5 => ShapeType::Polygon,
            8 => ShapeType::MultiPoint,
            11 => ShapeType::PointZ,
            13 => ShapeType::PolyLineZ,
            15 => ShapeType::PolygonZ,
            18 => ShapeType::MultiPointZ,
            21 => ShapeType::PointM,
            23 => ShapeType::PolyLineM,
            25 => ShapeType::PolygonM,
            28 => ShapeType::MultiPointM,
            31 => ShapeType::MultiPatch,
            _ => return None,
        };
        Some(t)
    }

    /// Whether records of this type are stroked as outlines.
    pub fn is_outline(&self) -> bool {
        matches!(
            self,
            ShapeType::PolyLine
                | ShapeType::Polygon
                | ShapeType::PolyLineZ
                | ShapeType::PolygonZ
                | ShapeType::PolyLineM
                | ShapeType::PolygonM
        )
    }

    /// Polygon rings are closed when drawn.
    pub fn is_polygon(&self) -> bool {
        matches!(
            self,
            ShapeType::Polygon | ShapeType::PolygonZ | ShapeType::PolygonM
        )
    }
}

/// One geometry record: a list of parts (rings or polylines).
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub shape_type: ShapeType,
    pub parts: Vec<Vec<(f64, f64)>>,
}

/// Read every outline record of a `.shp` file.
pub fn read_shapes(path: &Path) -> MapResult<Vec<Shape>> {
    let bytes = std::fs::read(path).map_err(|e| MapError::io(path, e))?;
    parse_shapes(path, &bytes)
}

/// Decode shapefile bytes; `path` is only used in error messages.
pub fn parse_shapes(path: &Path, bytes: &[u8]) -> MapResult<Vec<Shape>> {
    if bytes.len() < HEADER_LEN {
        return Err(MapError::shapefile(path, "file shorter than the 100-byte header"));
    }
    if be_i32(bytes, 0) != FILE_CODE {
        return Err(MapError::shapefile(path, "bad file code"));
    }
    let version = le_i32(bytes, 28);
    if version != VERSION {
        return Err(MapError::shapefile(path, format!("unsupported version {}", version)));
    }

    let mut shapes = Vec::new();
    let mut offset = HEADER_LEN;

    while offset + RECORD_HEADER_LEN <= bytes.len() {
        let record = be_i32(bytes, offset);
        let words = be_i32(bytes, offset + 4);
        if words < 0 {
            return Err(MapError::shapefile(path, format!("record {} has negative length", record)));
        }
        let start = offset + RECORD_HEADER_LEN;
        let end = start + words as usize * 2;
        if end > bytes.len() {
            return Err(MapError::shapefile(path, format!("record {} runs past end of file", record)));
        }

        if let Some(shape) = parse_record(path, record, &bytes[start..end])? {
            shapes.push(shape);
        }
        offset = end;
    }

    Ok(shapes)
}

fn parse_record(path: &Path, record: i32, content: &[u8]) -> MapResult<Option<Shape>> {
    if content.len() < 4 {
        return Err(MapError::shapefile(path, format!("record {} is empty", record)));
    }
    let code = le_i32(content, 0);
    let shape_type = ShapeType::from_code(code)
        .ok_or_else(|| MapError::shapefile(path, format!("record {} has unknown shape type {}", record, code)))?;

    if shape_type == ShapeType::Null {
        return Ok(None);
    }
    if !shape_type.is_outline() {
        return Err(MapError::shapefile(
            path,
            format!("record {}: {:?} cannot be drawn as an outline", record, shape_type),
        ));
    }

    // type (4) + bbox (32) + num_parts (4) + num_points (4)
    if content.len() < 44 {
        return Err(MapError::shapefile(path, format!("record {} truncated", record)));
    }
    let num_parts = le_i32(content, 36);
    let num_points = le_i32(content, 40);
    if num_parts < 0 || num_points < 0 {
        return Err(MapError::shapefile(path, format!("record {} has negative counts", record)));
    }
    let (num_parts, num_points) = (num_parts as usize, num_points as usize);

    let parts_at = 44;
    let points_at = parts_at + num_parts * 4;
    if content.len() < points_at + num_points * 16 {
        return Err(MapError::shapefile(path, format!("record {} truncated", record)));
    }

    let starts: Vec<usize> = (0..num_parts)
        .map(|i| le_i32(content, parts_at + i * 4).max(0) as usize)
        .collect();
    let points: Vec<(f64, f64)> = (0..num_points)
        .map(|i| {
            let at = points_at + i * 16;
            (le_f64(content, at), le_f64(content, at + 8))
        })
        .collect();

    let mut parts = Vec::with_capacity(num_parts);
    for (i, &first) in starts.iter().enumerate() {
        let last = starts.get(i + 1).copied().unwrap_or(num_points);
        if first > last || last > num_points {
            return Err(MapError::shapefile(path, format!("record {} has bad part index", record)));
        }
        parts.push(points[first..last].to_vec());
    }

    Ok(Some(Shape { shape_type, parts }))
}

fn be_i32(b: &[u8], at: usize) -> i32 {
    i32::from_be_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn le_i32(b: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn le_f64(b: &[u8], at: usize) -> f64 {
    f64::from_le_bytes([
        b[at],
        b[at + 1],
        b[at + 2],
        b[at + 3],
        b[at + 4],
        b[at + 5],
        b[at + 6],
        b[at + 7],
    ])
}
