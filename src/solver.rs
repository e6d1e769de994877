//! Multi-vehicle route solver.
//!
//! A cheapest-arc construction builds a feasible partition, then a
//! deterministic first-improvement local search (2-opt, relocate, exchange)
//! lowers the weighted objective until no move helps or the budget runs out.

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::PlannerError;
use crate::matrix::CostMatrix;

/// Randomized restarts pick among this many cheapest feasible candidates.
const RESTART_CANDIDATES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOptions {
    /// Number of homogeneous vehicles, at least one.
    pub vehicle_count: usize,
    /// Matrix index of the depot every route starts and ends at.
    pub depot: usize,
    /// Ceiling on each vehicle's cumulative route cost. `u64::MAX` disables it.
    pub max_span: u64,
    /// Weight on the gap between the longest and shortest vehicle span.
    pub span_balance_weight: u64,
    /// Maximum number of accepted local search moves.
    pub max_moves: usize,
    /// Wall-clock budget for the improvement phase.
    pub time_limit: Option<Duration>,
    /// Extra randomized constructions run in parallel.
    pub restarts: usize,
    /// Seed for the randomized restarts.
    pub seed: u64,
}

impl SolveOptions {
    /// The span ceiling has no sensible default and must always be given.
    pub fn new(vehicle_count: usize, max_span: u64) -> Self {
        Self {
            vehicle_count,
            depot: 0,
            max_span,
            span_balance_weight: 0,
            max_moves: 1000,
            time_limit: None,
            restarts: 0,
            seed: 0,
        }
    }

    pub fn with_depot(mut self, depot: usize) -> Self {
        self.depot = depot;
        self
    }

    pub fn with_span_balance_weight(mut self, weight: u64) -> Self {
        self.span_balance_weight = weight;
        self
    }

    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_restarts(mut self, restarts: usize, seed: u64) -> Self {
        self.restarts = restarts;
        self.seed = seed;
        self
    }
}

/// One vehicle's tour as matrix indices, depot at both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub vehicle_id: usize,
    pub nodes: Vec<usize>,
    pub span: u64,
}

impl Route {
    /// Nodes between the two depot visits.
    pub fn visits(&self) -> &[usize] {
        let len = self.nodes.len();
        if len <= 2 { &[] } else { &self.nodes[1..len - 1] }
    }

    pub fn is_empty(&self) -> bool {
        self.visits().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// One route per vehicle, ordered by vehicle id.
    pub routes: Vec<Route>,
    pub total_cost: u64,
    /// `total_cost + span_balance_weight * (max span - min span)`.
    pub objective: u64,
}

impl Solution {
    pub fn route(&self, vehicle_id: usize) -> Option<&Route> {
        self.routes.get(vehicle_id)
    }

    pub fn spans(&self) -> Vec<u64> {
        self.routes.iter().map(|route| route.span).collect()
    }

    /// Gap between the longest and the shortest vehicle span.
    pub fn span_spread(&self) -> u64 {
        spread(&self.spans())
    }
}

#[derive(Debug, Clone)]
struct RouteState {
    visits: Vec<usize>,
    span: u64,
}

#[derive(Debug, Clone, Copy)]
enum StopReason {
    LocalOptimum,
    MoveBudget,
    Deadline,
}

/// Partition every non-depot node of `matrix` among the vehicles.
///
/// Fails with [`PlannerError::NoSolutionFound`] when the construction cannot
/// place a node within any vehicle's span budget, and with
/// [`PlannerError::InvalidConfig`] when there are no vehicles or the depot
/// index lies outside the matrix.
pub fn solve(matrix: &CostMatrix, options: &SolveOptions) -> Result<Solution, PlannerError> {
    if options.vehicle_count == 0 {
        return Err(PlannerError::invalid_config("at least one vehicle is required"));
    }
    if options.depot >= matrix.size() {
        return Err(PlannerError::invalid_config(format!(
            "depot index {} outside a {}-node matrix",
            options.depot,
            matrix.size()
        )));
    }

    let deadline = options.time_limit.map(|limit| Instant::now() + limit);

    info!(
        nodes = matrix.size(),
        vehicles = options.vehicle_count,
        max_span = options.max_span,
        restarts = options.restarts,
        "solving route partition"
    );

    let baseline = construct(matrix, options, |_| 0).map(|mut routes| {
        local_search(&mut routes, matrix, options, deadline);
        routes
    });

    let restarts: Vec<Result<Vec<RouteState>, PlannerError>> = (1..=options.restarts)
        .into_par_iter()
        .map(|restart| -> Result<Vec<RouteState>, PlannerError> {
            let mut rng = ChaCha8Rng::seed_from_u64(options.seed.wrapping_add(restart as u64));
            let mut routes = construct(matrix, options, |feasible| {
                rng.gen_range(0..feasible.min(RESTART_CANDIDATES))
            })?;
            local_search(&mut routes, matrix, options, deadline);
            Ok(routes)
        })
        .collect();

    let mut best: Option<(u64, Vec<RouteState>)> = None;
    let mut first_error = None;
    for (restart, outcome) in std::iter::once(baseline).chain(restarts).enumerate() {
        match outcome {
            Ok(routes) => {
                let score = objective(&routes, options.span_balance_weight);
                debug!(restart, objective = score, "restart finished");
                if best.as_ref().is_none_or(|(best_score, _)| score < *best_score) {
                    best = Some((score, routes));
                }
            }
            Err(err) => {
                debug!(restart, error = %err, "restart found no feasible construction");
                first_error.get_or_insert(err);
            }
        }
    }

    match best {
        Some((_, routes)) => {
            let solution = into_solution(routes, matrix, options);
            info!(
                total_cost = solution.total_cost,
                objective = solution.objective,
                used_vehicles = solution.routes.iter().filter(|r| !r.is_empty()).count(),
                "route partition solved"
            );
            Ok(solution)
        }
        None => Err(first_error.unwrap_or(PlannerError::NoSolutionFound { unplaced: 0 })),
    }
}

fn into_solution(routes: Vec<RouteState>, matrix: &CostMatrix, options: &SolveOptions) -> Solution {
    let objective = objective(&routes, options.span_balance_weight);
    let total_cost = total(&routes);
    let routes = routes
        .into_iter()
        .enumerate()
        .map(|(vehicle_id, state)| {
            let mut nodes = Vec::with_capacity(state.visits.len() + 2);
            nodes.push(options.depot);
            nodes.extend(&state.visits);
            nodes.push(options.depot);
            debug_assert_eq!(matrix.path_cost(&nodes), state.span);
            Route {
                vehicle_id,
                nodes,
                span: state.span,
            }
        })
        .collect();

    Solution {
        routes,
        total_cost,
        objective,
    }
}

// ============================================================================
// Construction
// ============================================================================

/// Cheapest-arc construction.
///
/// The vehicle with the lowest closed span (ties by id) is extended with a
/// node chosen by `pick` from its feasible candidates, sorted by arc cost from
/// the route end and then by node index. The deterministic path always picks
/// the first candidate.
fn construct<P>(
    matrix: &CostMatrix,
    options: &SolveOptions,
    mut pick: P,
) -> Result<Vec<RouteState>, PlannerError>
where
    P: FnMut(usize) -> usize,
{
    let depot = options.depot;
    let mut unvisited: Vec<usize> = (0..matrix.size()).filter(|&node| node != depot).collect();

    // (visits, open span up to the current end)
    let mut partial: Vec<(Vec<usize>, u64)> = vec![(Vec::new(), 0); options.vehicle_count];

    while !unvisited.is_empty() {
        let mut order: Vec<usize> = (0..partial.len()).collect();
        order.sort_by_key(|&vehicle| {
            let (visits, open) = &partial[vehicle];
            let end = visits.last().copied().unwrap_or(depot);
            (open.saturating_add(matrix.cost(end, depot)), vehicle)
        });

        let mut placed = false;
        for vehicle in order {
            let (visits, open) = &partial[vehicle];
            let end = visits.last().copied().unwrap_or(depot);

            let mut candidates: Vec<(u64, usize, usize)> = unvisited
                .iter()
                .enumerate()
                .filter_map(|(slot, &node)| {
                    let arc = matrix.cost(end, node);
                    let closed = open
                        .saturating_add(arc)
                        .saturating_add(matrix.cost(node, depot));
                    (closed <= options.max_span).then_some((arc, node, slot))
                })
                .collect();

            if candidates.is_empty() {
                continue;
            }
            candidates.sort_unstable();

            let (arc, node, slot) = candidates[pick(candidates.len()).min(candidates.len() - 1)];
            let entry = &mut partial[vehicle];
            entry.0.push(node);
            entry.1 = entry.1.saturating_add(arc);
            unvisited.remove(slot);
            placed = true;
            break;
        }

        if !placed {
            warn!(
                unplaced = unvisited.len(),
                max_span = options.max_span,
                "construction cannot place remaining nodes within span"
            );
            return Err(PlannerError::NoSolutionFound {
                unplaced: unvisited.len(),
            });
        }
    }

    Ok(partial
        .into_iter()
        .map(|(visits, _)| {
            let span = route_span(matrix, depot, &visits);
            RouteState { visits, span }
        })
        .collect())
}

// ============================================================================
// Objective
// ============================================================================

fn route_span(matrix: &CostMatrix, depot: usize, visits: &[usize]) -> u64 {
    let mut span = 0u64;
    let mut prev = depot;
    for &node in visits {
        span = span.saturating_add(matrix.cost(prev, node));
        prev = node;
    }
    span.saturating_add(matrix.cost(prev, depot))
}

fn total(routes: &[RouteState]) -> u64 {
    routes.iter().fold(0u64, |acc, r| acc.saturating_add(r.span))
}

fn spread(spans: &[u64]) -> u64 {
    let max = spans.iter().copied().max().unwrap_or(0);
    let min = spans.iter().copied().min().unwrap_or(0);
    max - min
}

fn weigh(total: u64, spread: u64, weight: u64) -> u64 {
    total.saturating_add(spread.saturating_mul(weight))
}

fn objective(routes: &[RouteState], weight: u64) -> u64 {
    let spans: Vec<u64> = routes.iter().map(|r| r.span).collect();
    weigh(total(routes), spread(&spans), weight)
}

/// Objective if the routes listed in `changed` took the given spans.
fn objective_with(routes: &[RouteState], changed: &[(usize, u64)], weight: u64) -> u64 {
    let spans: Vec<u64> = routes
        .iter()
        .enumerate()
        .map(|(idx, route)| {
            changed
                .iter()
                .find(|(changed_idx, _)| *changed_idx == idx)
                .map_or(route.span, |(_, span)| *span)
        })
        .collect();
    let total = spans.iter().fold(0u64, |acc, s| acc.saturating_add(*s));
    weigh(total, spread(&spans), weight)
}

// ============================================================================
// Local Search Operators
// ============================================================================

/// 2-opt: reverse a segment within one route.
/// Returns true if an improvement was made.
fn two_opt_improve(
    routes: &mut [RouteState],
    route_idx: usize,
    matrix: &CostMatrix,
    options: &SolveOptions,
) -> bool {
    let n = routes[route_idx].visits.len();
    if n < 2 {
        return false;
    }

    let current = objective(routes, options.span_balance_weight);

    for i in 0..n - 1 {
        for j in i + 1..n {
            let mut candidate = routes[route_idx].visits.clone();
            candidate[i..=j].reverse();

            let span = route_span(matrix, options.depot, &candidate);
            if span > options.max_span {
                continue;
            }

            let score = objective_with(routes, &[(route_idx, span)], options.span_balance_weight);
            if score < current {
                let route = &mut routes[route_idx];
                route.visits = candidate;
                route.span = span;
                return true;
            }
        }
    }

    false
}

/// Relocate: move one node to another position, in its own route or another.
/// Returns true if an improvement was made.
fn relocate_improve(routes: &mut [RouteState], matrix: &CostMatrix, options: &SolveOptions) -> bool {
    let current = objective(routes, options.span_balance_weight);

    for from_idx in 0..routes.len() {
        for visit_idx in 0..routes[from_idx].visits.len() {
            let node = routes[from_idx].visits[visit_idx];

            let mut from_candidate = routes[from_idx].visits.clone();
            from_candidate.remove(visit_idx);

            for to_idx in 0..routes.len() {
                if to_idx == from_idx {
                    for insert_pos in 0..=from_candidate.len() {
                        if insert_pos == visit_idx {
                            continue;
                        }
                        let mut candidate = from_candidate.clone();
                        candidate.insert(insert_pos, node);

                        let span = route_span(matrix, options.depot, &candidate);
                        if span > options.max_span {
                            continue;
                        }
                        let score =
                            objective_with(routes, &[(from_idx, span)], options.span_balance_weight);
                        if score < current {
                            let route = &mut routes[from_idx];
                            route.visits = candidate;
                            route.span = span;
                            return true;
                        }
                    }
                    continue;
                }

                let from_span = route_span(matrix, options.depot, &from_candidate);
                if from_span > options.max_span {
                    continue;
                }

                for insert_pos in 0..=routes[to_idx].visits.len() {
                    let mut to_candidate = routes[to_idx].visits.clone();
                    to_candidate.insert(insert_pos, node);

                    let to_span = route_span(matrix, options.depot, &to_candidate);
                    if to_span > options.max_span {
                        continue;
                    }

                    let score = objective_with(
                        routes,
                        &[(from_idx, from_span), (to_idx, to_span)],
                        options.span_balance_weight,
                    );
                    if score < current {
                        routes[from_idx].visits = from_candidate;
                        routes[from_idx].span = from_span;
                        routes[to_idx].visits = to_candidate;
                        routes[to_idx].span = to_span;
                        return true;
                    }
                }
            }
        }
    }

    false
}

/// Exchange: swap one node of a route with one node of another route.
/// Returns true if an improvement was made.
fn exchange_improve(routes: &mut [RouteState], matrix: &CostMatrix, options: &SolveOptions) -> bool {
    let current = objective(routes, options.span_balance_weight);

    for a in 0..routes.len() {
        for b in a + 1..routes.len() {
            for i in 0..routes[a].visits.len() {
                for j in 0..routes[b].visits.len() {
                    let mut a_candidate = routes[a].visits.clone();
                    let mut b_candidate = routes[b].visits.clone();
                    std::mem::swap(&mut a_candidate[i], &mut b_candidate[j]);

                    let a_span = route_span(matrix, options.depot, &a_candidate);
                    let b_span = route_span(matrix, options.depot, &b_candidate);
                    if a_span > options.max_span || b_span > options.max_span {
                        continue;
                    }

                    let score = objective_with(
                        routes,
                        &[(a, a_span), (b, b_span)],
                        options.span_balance_weight,
                    );
                    if score < current {
                        routes[a].visits = a_candidate;
                        routes[a].span = a_span;
                        routes[b].visits = b_candidate;
                        routes[b].span = b_span;
                        return true;
                    }
                }
            }
        }
    }

    false
}

/// Run local search until no move improves, the move budget is spent or the
/// deadline passes. Every accepted move keeps the solution feasible, so
/// stopping early still leaves a valid partition.
fn local_search(
    routes: &mut [RouteState],
    matrix: &CostMatrix,
    options: &SolveOptions,
    deadline: Option<Instant>,
) {
    let mut moves = 0;

    let reason = 'search: loop {
        let mut improved = false;

        for route_idx in 0..routes.len() {
            if moves >= options.max_moves {
                break 'search StopReason::MoveBudget;
            }
            if deadline.is_some_and(|at| Instant::now() >= at) {
                break 'search StopReason::Deadline;
            }
            if two_opt_improve(routes, route_idx, matrix, options) {
                improved = true;
                moves += 1;
            }
        }

        for operator in [relocate_improve, exchange_improve] {
            if moves >= options.max_moves {
                break 'search StopReason::MoveBudget;
            }
            if deadline.is_some_and(|at| Instant::now() >= at) {
                break 'search StopReason::Deadline;
            }
            if operator(routes, matrix, options) {
                improved = true;
                moves += 1;
            }
        }

        if !improved {
            break StopReason::LocalOptimum;
        }
    };

    debug!(
        moves,
        reason = ?reason,
        objective = objective(routes, options.span_balance_weight),
        "local search stopped"
    );
}
