//! Generators for the text and binary inputs of the discharge map.
//!
//! These produce byte-exact files in the layouts the loaders expect, so
//! tests can build inputs without shipping real CaMa data.

/// Encode int32 values little-endian.
pub fn i32_bytes(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Encode int16 values little-endian.
pub fn i16_bytes(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Encode float32 values little-endian.
pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// A `params.txt` in the CaMa layout (eight annotated lines).
///
/// # Example
///
/// ```
/// use test_utils::params_txt;
///
/// let text = params_txt(2, 3, 90.0, 91.0, 20.0, 25.0);
/// assert!(text.lines().next().unwrap().trim_start().starts_with('2'));
/// assert_eq!(text.lines().count(), 8);
/// ```
pub fn params_txt(nx: usize, ny: usize, west: f64, east: f64, south: f64, north: f64) -> String {
    format!(
        "{:>12}       !! grid number (east-west)\n\
         {:>12}       !! grid number (north-south)\n\
         {:>12}       !! floodplain layers\n\
         {:>12.8}       !! grid size  [deg]\n\
         {:>12.5}       !! west  edge [deg]\n\
         {:>12.5}       !! east  edge [deg]\n\
         {:>12.5}       !! south edge [deg]\n\
         {:>12.5}       !! north edge [deg]\n",
        nx,
        ny,
        10,
        (east - west) / nx.max(1) as f64,
        west,
        east,
        south,
        north
    )
}

/// A `1min/location.txt` with one area whose fine grid is `nxx x nyy`.
pub fn location_txt(nxx: usize, nyy: usize, west: f64, north: f64) -> String {
    let east = west + nxx as f64 / 60.0;
    let south = north - nyy as f64 / 60.0;
    format!(
        "code   1\n \
         area   XX         west     east     south    north     nx     ny      csize\n\
         {:>5} {:>6} {:>10.3} {:>8.3} {:>8.3} {:>8.3} {:>6} {:>6} {:>10.7}\n",
        1,
        "1min",
        west,
        east,
        south,
        north,
        nxx,
        nyy,
        1.0 / 60.0
    )
}

/// One `print_rivvec` output row: `lon1 lat1 <id> lon2 lat2 <extra>`.
pub fn rivvec_line(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> String {
    format!("{:.5} {:.5} 1 {:.5} {:.5} 0.0", lon1, lat1, lon2, lat2)
}

/// A polygon shapefile (`.shp` bytes) with one record holding every ring
/// as a part.
pub fn polygon_shp_bytes(rings: &[Vec<(f64, f64)>]) -> Vec<u8> {
    let all: Vec<(f64, f64)> = rings.iter().flatten().copied().collect();
    let (min_x, min_y, max_x, max_y) = all.iter().fold(
        (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(a, b, c, d), &(x, y)| (a.min(x), b.min(y), c.max(x), d.max(y)),
    );

    let mut content = Vec::new();
    content.extend(5i32.to_le_bytes());
    for v in [min_x, min_y, max_x, max_y] {
        content.extend(v.to_le_bytes());
    }
    content.extend((rings.len() as i32).to_le_bytes());
    content.extend((all.len() as i32).to_le_bytes());
    let mut start = 0i32;
    for ring in rings {
        content.extend(start.to_le_bytes());
        start += ring.len() as i32;
    }
    for (x, y) in &all {
        content.extend(x.to_le_bytes());
        content.extend(y.to_le_bytes());
    }

    let file_len = 100 + 8 + content.len();
    let mut shp = Vec::with_capacity(file_len);
    shp.extend(9994i32.to_be_bytes());
    shp.extend([0u8; 20]);
    shp.extend(((file_len / 2) as i32).to_be_bytes());
    shp.extend(1000i32.to_le_bytes());
    shp.extend(5i32.to_le_bytes());
    for v in [min_x, min_y, max_x, max_y, 0.0, 0.0, 0.0, 0.0] {
        shp.extend(v.to_le_bytes());
    }
    shp.extend(1i32.to_be_bytes());
    shp.extend(((content.len() / 2) as i32).to_be_bytes());
    shp.extend(content);
    shp
}
