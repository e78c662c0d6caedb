//! Per-level conversion of vector lines into colored line collections.

use std::fmt;

use cama_map::{CellResolver, DiscardReason};
use renderer::{Colormap, LineCollection, Normalize, Point, RiverStyle, Segment};

use crate::vector::{parse_segment_line, VectorError};

/// Longitudes further apart than this are taken to cross the antimeridian.
const WRAP_THRESHOLD_DEG: f64 = 180.0;

/// Second-endpoint longitude after antimeridian correction.
pub fn wrap_longitude(lon1: f64, lon2: f64) -> f64 {
    if lon1 - lon2 > WRAP_THRESHOLD_DEG {
        180.0
    } else if lon2 - lon1 > WRAP_THRESHOLD_DEG {
        -180.0
    } else {
        lon2
    }
}

/// Counters for one rendered level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelStats {
    pub level: u32,
    pub lines_read: usize,
    /// Lines with fewer than five tokens.
    pub malformed: usize,
    pub drawn: usize,
    pub outside_fine_grid: usize,
    pub no_catchment: usize,
    pub not_river: usize,
    pub missing_discharge: usize,
}

impl LevelStats {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn record_discard(&mut self, reason: DiscardReason) {
        match reason {
            DiscardReason::OutsideFineGrid => self.outside_fine_grid += 1,
            DiscardReason::NoCatchment => self.no_catchment += 1,
            DiscardReason::NotRiver => self.not_river += 1,
            DiscardReason::MissingDischarge => self.missing_discharge += 1,
        }
    }

    pub fn discarded(&self, reason: DiscardReason) -> usize {
        match reason {
            DiscardReason::OutsideFineGrid => self.outside_fine_grid,
            DiscardReason::NoCatchment => self.no_catchment,
            DiscardReason::NotRiver => self.not_river,
            DiscardReason::MissingDischarge => self.missing_discharge,
        }
    }

    pub fn total_discarded(&self) -> usize {
        DiscardReason::ALL.iter().map(|r| self.discarded(*r)).sum()
    }
}

impl fmt::Display for LevelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level {:02}: {} lines, {} malformed, {} drawn",
            self.level, self.lines_read, self.malformed, self.drawn
        )?;
        for reason in DiscardReason::ALL {
            write!(f, ", {} {}", self.discarded(reason), reason)?;
        }
        Ok(())
    }
}

/// Segments of one level, ready to draw.
#[derive(Debug, Clone)]
pub struct LevelLayer {
    pub collection: LineCollection,
    pub stats: LevelStats,
}

/// Turn one level's vector lines into a line collection.
///
/// Each segment is colored by the discharge of the cell under its first
/// endpoint; segments whose first endpoint does not resolve are dropped.
pub fn render_level(
    level: u32,
    lines: &[String],
    resolver: &CellResolver<'_>,
    cmap: &Colormap,
    norm: &Normalize,
    rivers: &RiverStyle,
) -> Result<LevelLayer, VectorError> {
    let mut stats = LevelStats::new(level);
    let mut collection = LineCollection::new(rivers.line_width_pt(level));

    for line in lines {
        stats.lines_read += 1;
        let Some(raw) = parse_segment_line(line)? else {
            stats.malformed += 1;
            continue;
        };

        let cell = match resolver.resolve(raw.lon1, raw.lat1) {
            Ok(cell) => cell,
            Err(reason) => {
                stats.record_discard(reason);
                continue;
            }
        };

        let lon2 = wrap_longitude(raw.lon1, raw.lon2);
        let color = cmap.color(norm.apply(cell.discharge as f64));
        collection.push(
            Segment::new(Point::new(raw.lon1, raw.lat1), Point::new(lon2, raw.lat2)),
            color,
        );
    }

    stats.drawn = collection.len();
    Ok(LevelLayer { collection, stats })
}
