//! One planning cycle: select bins, fetch costs, solve, assemble.

use std::collections::BTreeMap;

use tracing::{info, info_span};

use crate::assembler::{coordinates_of, to_coordinates};
use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::model::{Coordinate, Location};
use crate::selector::select;
use crate::solver::{Solution, solve};
use crate::traits::{BinStateProvider, CostMatrixProvider, RouteVisualizer};

/// Everything a cycle produces, keyed by vehicle id.
#[derive(Debug, Clone)]
pub struct CyclePlan {
    /// Depot first, then the selected bins in urgency order. Solver node
    /// indices refer to this list.
    pub locations: Vec<Location>,
    pub solution: Solution,
    pub routes: BTreeMap<usize, Vec<Location>>,
    pub links: BTreeMap<usize, String>,
}

/// Run a single planning cycle.
///
/// Any failure aborts the whole cycle; no partial plan is returned.
pub fn plan_cycle<B, M, V>(
    bins: &B,
    matrices: &M,
    visualizer: &V,
    depot: &Location,
    config: &PlannerConfig,
) -> Result<CyclePlan, PlannerError>
where
    B: BinStateProvider + ?Sized,
    M: CostMatrixProvider + ?Sized,
    V: RouteVisualizer + ?Sized,
{
    let span = info_span!("plan_cycle", depot = %depot.id);
    let _guard = span.enter();

    config.validate()?;

    let registered = bins.bins();
    let selected = select(&registered, config.threshold_ratio);
    if selected.is_empty() {
        info!(registered = registered.len(), "no bin needs collection this cycle");
        return Err(PlannerError::NoQualifyingDemand);
    }

    let mut locations = Vec::with_capacity(selected.len() + 1);
    locations.push(depot.clone());
    locations.extend(selected);

    let coordinates: Vec<Coordinate> = coordinates_of(&locations);
    let travel = matrices.matrices_for(&coordinates)?;
    let matrix = travel.cost_matrix(config.metric)?;
    matrix.ensure_size(locations.len())?;

    let solve_options = config.solve.clone().with_depot(0);
    let solution = solve(&matrix, &solve_options)?;
    let routes = to_coordinates(&solution, &locations)?;

    let links = routes
        .iter()
        .map(|(vehicle, stops)| (*vehicle, visualizer.render(&coordinates_of(stops))))
        .collect();

    info!(
        bins = locations.len() - 1,
        vehicles = routes.len(),
        total_cost = solution.total_cost,
        "planning cycle complete"
    );

    Ok(CyclePlan {
        locations,
        solution,
        routes,
        links,
    })
}
