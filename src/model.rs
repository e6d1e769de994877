//! Locations and coordinates shared by every planning stage.

use serde::{Deserialize, Serialize};

/// A point on the map in degrees.
///
/// Fields are named so that no stage depends on a particular tuple order.
/// Providers convert to their own wire ordering at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// A smart bin, or the depot, as read for a single planning cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub coordinate: Coordinate,
    /// Current volume, between zero and `max_capacity`. `None` when the bin
    /// has not reported a reading (the depot never does).
    pub fill_level: Option<f64>,
    pub max_capacity: f64,
}

impl Location {
    pub fn new(id: impl Into<String>, coordinate: Coordinate, max_capacity: f64) -> Self {
        Self {
            id: id.into(),
            coordinate,
            fill_level: None,
            max_capacity,
        }
    }

    /// The depot: no fill level, no capacity.
    pub fn depot(id: impl Into<String>, coordinate: Coordinate) -> Self {
        Self::new(id, coordinate, 0.0)
    }

    pub fn with_fill_level(mut self, fill_level: f64) -> Self {
        self.fill_level = Some(fill_level);
        self
    }

    /// Whether the bin has reached `threshold_ratio` of its capacity.
    pub fn is_full(&self, threshold_ratio: f64) -> bool {
        match self.fill_level {
            Some(level) => level >= threshold_ratio * self.max_capacity,
            None => false,
        }
    }
}
