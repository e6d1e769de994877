//! Demand selection: which bins need emptying this cycle, most urgent first.

use tracing::debug;

use crate::model::Location;

/// Bins at or above this share of their capacity are collected.
pub const DEFAULT_THRESHOLD_RATIO: f64 = 0.8;

/// Keep the bins whose fill level reaches `threshold_ratio * max_capacity`,
/// fullest first.
///
/// The sort is stable, so bins with equal fill levels keep their
/// registration order. An empty result is a valid answer; the planning
/// pipeline reports it as [`crate::PlannerError::NoQualifyingDemand`].
pub fn select(locations: &[Location], threshold_ratio: f64) -> Vec<Location> {
    let mut qualifying: Vec<Location> = locations
        .iter()
        .filter(|location| location.is_full(threshold_ratio))
        .cloned()
        .collect();

    qualifying.sort_by(|a, b| fill_of(b).total_cmp(&fill_of(a)));

    debug!(
        registered = locations.len(),
        qualifying = qualifying.len(),
        threshold_ratio,
        "selected bins for collection"
    );
    qualifying
}

fn fill_of(location: &Location) -> f64 {
    location.fill_level.unwrap_or(0.0)
}
