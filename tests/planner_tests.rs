//! End-to-end planning cycle tests over the Fortaleza bin registry.
//!
//! Costs come from the haversine provider, so no routing service is needed.

mod fixtures;

use std::cell::Cell;
use std::collections::BTreeSet;

use bin_route_planner::PlannerError;
use bin_route_planner::config::PlannerConfig;
use bin_route_planner::haversine::HaversineMatrix;
use bin_route_planner::matrix::{CostMetric, TravelMatrices};
use bin_route_planner::model::Coordinate;
use bin_route_planner::planner::plan_cycle;
use bin_route_planner::simulation::SimulatedBins;
use bin_route_planner::solver::SolveOptions;
use bin_route_planner::traits::CostMatrixProvider;
use bin_route_planner::visualize::GoogleMapsLink;

use fixtures::{BIN_CAPACITY, BIN_SITES, depot_location, registry};

// ============================================================================
// Stub providers
// ============================================================================

/// Haversine provider that counts how often it is asked.
#[derive(Default)]
struct CountingMatrix {
    calls: Cell<usize>,
    inner: HaversineMatrix,
}

impl CostMatrixProvider for CountingMatrix {
    fn matrices_for(&self, coordinates: &[Coordinate]) -> Result<TravelMatrices, PlannerError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.matrices_for(coordinates)
    }
}

struct UnreachableMatrix;

impl CostMatrixProvider for UnreachableMatrix {
    fn matrices_for(&self, _: &[Coordinate]) -> Result<TravelMatrices, PlannerError> {
        Err(PlannerError::MatrixUnavailable {
            reason: "connection refused".to_string(),
        })
    }
}

/// Answers for one coordinate fewer than it was asked about.
struct TruncatedMatrix;

impl CostMatrixProvider for TruncatedMatrix {
    fn matrices_for(&self, coordinates: &[Coordinate]) -> Result<TravelMatrices, PlannerError> {
        HaversineMatrix::default().matrices_for(&coordinates[1..])
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Levels for the thirteen sites: five at or over 80% of 120 litres, the
/// rest below it or unreported.
fn fixed_levels() -> Vec<f64> {
    vec![
        100.0, 20.0, 118.0, 50.0, 96.0, 0.0, 110.0, 95.9, 60.0, 104.0, 10.0, 30.0,
    ]
}

fn fixed_bins() -> SimulatedBins {
    SimulatedBins::fixed(registry(), BIN_CAPACITY, fixed_levels())
}

/// Two trucks with an eight hour shift, spans in seconds.
fn config() -> PlannerConfig {
    PlannerConfig::new(SolveOptions::new(2, 8 * 3600).with_span_balance_weight(1))
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn test_plan_visits_every_full_bin_once() {
    let plan = plan_cycle(
        &fixed_bins(),
        &HaversineMatrix::default(),
        &GoogleMapsLink::default(),
        &depot_location(),
        &config(),
    )
    .unwrap();

    let selected: Vec<&str> = plan.locations[1..].iter().map(|l| l.id.as_str()).collect();
    assert_eq!(
        selected,
        vec!["parquelandia", "meireles", "montese", "benfica", "carlito-pamplona"]
    );

    let mut visited = BTreeSet::new();
    for (vehicle, stops) in &plan.routes {
        assert!(*vehicle < 2);
        assert_eq!(stops.first().map(|l| l.id.as_str()), Some("depot"));
        assert_eq!(stops.last().map(|l| l.id.as_str()), Some("depot"));
        for stop in &stops[1..stops.len() - 1] {
            assert!(visited.insert(stop.id.clone()), "{} visited twice", stop.id);
        }
    }
    let expected: BTreeSet<String> = selected.iter().map(|s| s.to_string()).collect();
    assert_eq!(visited, expected);

    for route in &plan.solution.routes {
        assert!(route.span <= 8 * 3600);
    }
}

#[test]
fn test_plan_links_follow_route_order() {
    let plan = plan_cycle(
        &fixed_bins(),
        &HaversineMatrix::default(),
        &GoogleMapsLink::default(),
        &depot_location(),
        &config(),
    )
    .unwrap();

    assert_eq!(plan.links.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    for (vehicle, link) in &plan.links {
        assert!(link.starts_with("https://www.google.com.br/maps/dir/"));
        let stops = &plan.routes[vehicle];
        let second = &stops[1].coordinate;
        let needle = format!("{},{}/", second.latitude, second.longitude);
        assert!(link.contains(&needle), "link {link} misses {needle}");
    }
}

#[test]
fn test_distance_metric_plans_too() {
    // Spans in metres now.
    let config = PlannerConfig::new(SolveOptions::new(2, 100_000)).with_metric(CostMetric::Distance);
    let plan = plan_cycle(
        &fixed_bins(),
        &HaversineMatrix::default(),
        &GoogleMapsLink::default(),
        &depot_location(),
        &config,
    )
    .unwrap();

    let visits: usize = plan.solution.routes.iter().map(|r| r.visits().len()).sum();
    assert_eq!(visits, 5);
}

#[test]
fn test_seeded_simulation_replays_the_same_plan() {
    let run = || {
        let bins = SimulatedBins::new(registry(), BIN_CAPACITY, 12345);
        plan_cycle(
            &bins,
            &HaversineMatrix::default(),
            &GoogleMapsLink::default(),
            &depot_location(),
            &PlannerConfig::new(SolveOptions::new(3, u64::MAX)).with_threshold_ratio(0.5),
        )
    };

    match (run(), run()) {
        (Ok(first), Ok(second)) => {
            assert_eq!(first.locations, second.locations);
            assert_eq!(first.solution, second.solution);
            assert_eq!(first.links, second.links);
        }
        (Err(first), Err(second)) => {
            assert_eq!(first, PlannerError::NoQualifyingDemand);
            assert_eq!(second, PlannerError::NoQualifyingDemand);
        }
        (first, second) => panic!("runs diverged: {first:?} vs {second:?}"),
    }
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_no_full_bins_skips_matrix_request() {
    let bins = SimulatedBins::fixed(registry(), BIN_CAPACITY, vec![10.0; BIN_SITES.len()]);
    let matrices = CountingMatrix::default();

    let err = plan_cycle(
        &bins,
        &matrices,
        &GoogleMapsLink::default(),
        &depot_location(),
        &config(),
    )
    .unwrap_err();

    assert_eq!(err, PlannerError::NoQualifyingDemand);
    assert_eq!(matrices.calls.get(), 0);
}

#[test]
fn test_unreported_bins_are_not_collected() {
    let bins = SimulatedBins::fixed(registry(), BIN_CAPACITY, Vec::new());
    let err = plan_cycle(
        &bins,
        &CountingMatrix::default(),
        &GoogleMapsLink::default(),
        &depot_location(),
        &config(),
    )
    .unwrap_err();
    assert_eq!(err, PlannerError::NoQualifyingDemand);
}

#[test]
fn test_matrix_failure_passes_through() {
    let err = plan_cycle(
        &fixed_bins(),
        &UnreachableMatrix,
        &GoogleMapsLink::default(),
        &depot_location(),
        &config(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        PlannerError::MatrixUnavailable {
            reason: "connection refused".to_string()
        }
    );
}

#[test]
fn test_wrong_sized_matrix_is_rejected() {
    let err = plan_cycle(
        &fixed_bins(),
        &TruncatedMatrix,
        &GoogleMapsLink::default(),
        &depot_location(),
        &config(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        PlannerError::InvalidMatrixShape {
            expected: 6,
            actual: "5x5".to_string()
        }
    );
}

#[test]
fn test_span_too_short_for_any_bin_is_no_solution() {
    let config = PlannerConfig::new(SolveOptions::new(2, 60));
    let matrices = CountingMatrix::default();
    let err = plan_cycle(
        &fixed_bins(),
        &matrices,
        &GoogleMapsLink::default(),
        &depot_location(),
        &config,
    )
    .unwrap_err();

    assert_eq!(err, PlannerError::NoSolutionFound { unplaced: 5 });
    assert_eq!(matrices.calls.get(), 1);
}

#[test]
fn test_invalid_threshold_fails_before_reading_bins() {
    let config = config().with_threshold_ratio(1.2);
    let err = plan_cycle(
        &fixed_bins(),
        &CountingMatrix::default(),
        &GoogleMapsLink::default(),
        &depot_location(),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidConfig { .. }));
}
