//! Geographic extent of a map in degrees.

use serde::{Deserialize, Serialize};

/// A west/east/south/north box in geographic degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoExtent {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl GeoExtent {
    /// Create a new extent from its four edges.
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Self {
        Self {
            west,
            east,
            south,
            north,
        }
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Width over height; 1.0 for a degenerate extent.
    pub fn aspect(&self) -> f64 {
        if self.height() <= 0.0 {
            return 1.0;
        }
        self.width() / self.height()
    }

    /// Whether the extent has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Check if a point is contained within this extent.
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }

    /// Same extent with the north edge lowered to at most `limit`.
    pub fn with_north_limit(&self, limit: f64) -> Self {
        Self {
            north: self.north.min(limit),
            ..*self
        }
    }
}
