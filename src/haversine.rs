//! Haversine matrix provider (fallback when no routing service is configured).
//!
//! Uses great-circle distance and an assumed speed to estimate travel time.
//! Less accurate than a road network (ignores streets) but always available.

use crate::error::PlannerError;
use crate::matrix::TravelMatrices;
use crate::model::Coordinate;
use crate::traits::CostMatrixProvider;

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine-based matrix provider.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two points in metres.
    fn haversine_m(from: Coordinate, to: Coordinate) -> f64 {
        let lat1_rad = from.latitude.to_radians();
        let lat2_rad = to.latitude.to_radians();
        let delta_lat = (to.latitude - from.latitude).to_radians();
        let delta_lng = (to.longitude - from.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }

    /// Convert metres to travel seconds at the assumed speed.
    fn metres_to_seconds(&self, metres: f64) -> f64 {
        metres / (self.speed_kmh * 1000.0 / 3600.0)
    }
}

impl CostMatrixProvider for HaversineMatrix {
    fn matrices_for(&self, coordinates: &[Coordinate]) -> Result<TravelMatrices, PlannerError> {
        if !(self.speed_kmh.is_finite() && self.speed_kmh > 0.0) {
            return Err(PlannerError::invalid_config(format!(
                "haversine speed must be positive, got {}",
                self.speed_kmh
            )));
        }

        let n = coordinates.len();
        let mut distances = vec![vec![0.0; n]; n];
        let mut durations = vec![vec![0.0; n]; n];

        for (i, from) in coordinates.iter().enumerate() {
            for (j, to) in coordinates.iter().enumerate() {
                if i != j {
                    let metres = Self::haversine_m(*from, *to);
                    distances[i][j] = metres;
                    durations[i][j] = self.metres_to_seconds(metres);
                }
            }
        }

        Ok(TravelMatrices {
            durations,
            distances,
        })
    }
}
