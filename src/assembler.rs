//! Turns solved node-index routes back into locations.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::PlannerError;
use crate::model::{Coordinate, Location};
use crate::solver::Solution;

/// Map every vehicle's route onto `locations_by_index`.
///
/// Order is preserved exactly, including the depot at both ends. Vehicles
/// left unused come back as `[depot, depot]`.
pub fn to_coordinates(
    solution: &Solution,
    locations_by_index: &[Location],
) -> Result<BTreeMap<usize, Vec<Location>>, PlannerError> {
    let mut assembled = BTreeMap::new();

    for route in &solution.routes {
        let stops = route
            .nodes
            .iter()
            .map(|&node| {
                locations_by_index
                    .get(node)
                    .cloned()
                    .ok_or_else(|| PlannerError::InvalidMatrixShape {
                        expected: node + 1,
                        actual: format!("{} locations", locations_by_index.len()),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(vehicle = route.vehicle_id, stops = stops.len(), "assembled route");
        assembled.insert(route.vehicle_id, stops);
    }

    Ok(assembled)
}

/// Coordinates of an assembled route, in visiting order.
pub fn coordinates_of(stops: &[Location]) -> Vec<Coordinate> {
    stops.iter().map(|stop| stop.coordinate).collect()
}
