//! Seams to the collaborators around the planner.
//!
//! The planner never reaches out to sensors, routing engines or map services
//! directly. Apps implement these traits for their own data sources.

use crate::error::PlannerError;
use crate::matrix::TravelMatrices;
use crate::model::{Coordinate, Location};

/// Supplies the registered bins with their current fill levels.
///
/// Called once per planning cycle. The returned list must not change while
/// the cycle runs.
pub trait BinStateProvider {
    fn bins(&self) -> Vec<Location>;
}

/// Provides travel durations and distances for a set of coordinates.
///
/// Both matrices are indexed by the provided coordinate order, depot first.
/// Failures surface as [`PlannerError::MatrixUnavailable`]; implementations
/// must not retry on the caller's behalf.
pub trait CostMatrixProvider {
    fn matrices_for(&self, coordinates: &[Coordinate]) -> Result<TravelMatrices, PlannerError>;
}

/// Renders an ordered coordinate sequence into something a driver can open.
pub trait RouteVisualizer {
    fn render(&self, coordinates: &[Coordinate]) -> String;
}
