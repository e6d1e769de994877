//! Cost matrix builders and partition checks shared by solver tests.

use std::collections::BTreeSet;

use bin_route_planner::matrix::CostMatrix;
use bin_route_planner::solver::Solution;

/// Nodes on a line; cost is the absolute distance between positions.
pub fn line_matrix(positions: &[i64]) -> CostMatrix {
    let rows = positions
        .iter()
        .map(|a| positions.iter().map(|b| a.abs_diff(*b)).collect())
        .collect();
    CostMatrix::new(rows).expect("line matrix is square")
}

/// Nodes on a grid; cost is the Manhattan distance.
pub fn grid_matrix(points: &[(i64, i64)]) -> CostMatrix {
    let rows = points
        .iter()
        .map(|a| {
            points
                .iter()
                .map(|b| a.0.abs_diff(b.0) + a.1.abs_diff(b.1))
                .collect()
        })
        .collect();
    CostMatrix::new(rows).expect("grid matrix is square")
}

/// Every non-depot node exactly once, every route anchored at the depot,
/// one route per vehicle and reported spans matching the matrix.
pub fn assert_valid_partition(solution: &Solution, matrix: &CostMatrix, depot: usize, vehicles: usize) {
    assert_eq!(solution.routes.len(), vehicles, "one route per vehicle");

    let mut seen = BTreeSet::new();
    for (vehicle_id, route) in solution.routes.iter().enumerate() {
        assert_eq!(route.vehicle_id, vehicle_id);
        assert_eq!(route.nodes.first(), Some(&depot), "route must start at depot");
        assert_eq!(route.nodes.last(), Some(&depot), "route must end at depot");
        assert!(route.nodes.len() >= 2);
        assert_eq!(route.span, matrix.path_cost(&route.nodes));

        for &node in route.visits() {
            assert_ne!(node, depot, "depot inside a route");
            assert!(seen.insert(node), "node {} visited twice", node);
        }
    }

    let expected: BTreeSet<usize> = (0..matrix.size()).filter(|&n| n != depot).collect();
    assert_eq!(seen, expected, "every demand node must be visited");
    assert_eq!(
        solution.total_cost,
        solution.routes.iter().map(|r| r.span).sum::<u64>()
    );
}
