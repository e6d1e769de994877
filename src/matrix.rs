//! Travel cost matrices.
//!
//! Providers hand back raw `f64` durations and distances. The solver works on
//! a validated integer [`CostMatrix`] so that every objective comparison is
//! exact and repeatable.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;

/// Which provider matrix drives the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CostMetric {
    /// Travel time in seconds.
    #[default]
    Duration,
    /// Travel distance in metres.
    Distance,
}

impl FromStr for CostMetric {
    type Err = PlannerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "duration" | "durations" | "time" => Ok(Self::Duration),
            "distance" | "distances" => Ok(Self::Distance),
            other => Err(PlannerError::invalid_config(format!(
                "unknown cost metric '{other}'"
            ))),
        }
    }
}

/// Payload of a cost matrix provider, indexed like the requested coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelMatrices {
    pub durations: Vec<Vec<f64>>,
    pub distances: Vec<Vec<f64>>,
}

impl TravelMatrices {
    pub fn cost_matrix(&self, metric: CostMetric) -> Result<CostMatrix, PlannerError> {
        match metric {
            CostMetric::Duration => CostMatrix::from_f64(&self.durations),
            CostMetric::Distance => CostMatrix::from_f64(&self.distances),
        }
    }
}

/// Square matrix of non-negative integer arc costs.
///
/// `cost(i, j)` is the cost of travelling directly from node `i` to node `j`.
/// The matrix need not be symmetric. The diagonal always reads as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    size: usize,
    costs: Vec<u64>,
}

impl CostMatrix {
    pub fn new(rows: Vec<Vec<u64>>) -> Result<Self, PlannerError> {
        let size = rows.len();
        check_square(size, rows.iter().map(Vec::len))?;

        let mut costs = Vec::with_capacity(size * size);
        for row in rows {
            costs.extend(row);
        }
        Ok(Self { size, costs })
    }

    /// Round provider values to whole cost units.
    pub fn from_f64(rows: &[Vec<f64>]) -> Result<Self, PlannerError> {
        let size = rows.len();
        check_square(size, rows.iter().map(Vec::len))?;

        let mut costs = Vec::with_capacity(size * size);
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                if !value.is_finite() || *value < 0.0 {
                    return Err(PlannerError::InvalidMatrixValue {
                        row: row_idx,
                        col: col_idx,
                    });
                }
                costs.push(value.round() as u64);
            }
        }
        Ok(Self { size, costs })
    }

    /// Number of nodes, depot included.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cost(&self, from: usize, to: usize) -> u64 {
        if from == to {
            return 0;
        }
        self.costs[from * self.size + to]
    }

    /// Fail fast when the matrix was built for a different location list.
    pub fn ensure_size(&self, expected: usize) -> Result<(), PlannerError> {
        if self.size == expected {
            Ok(())
        } else {
            Err(PlannerError::InvalidMatrixShape {
                expected,
                actual: format!("{}x{}", self.size, self.size),
            })
        }
    }

    /// Span of a closed route given as node indices, depot at both ends.
    pub fn path_cost(&self, nodes: &[usize]) -> u64 {
        nodes
            .windows(2)
            .fold(0u64, |acc, arc| acc.saturating_add(self.cost(arc[0], arc[1])))
    }
}

fn check_square(rows: usize, row_lens: impl Iterator<Item = usize>) -> Result<(), PlannerError> {
    for (idx, len) in row_lens.enumerate() {
        if len != rows {
            return Err(PlannerError::InvalidMatrixShape {
                expected: rows,
                actual: format!("{rows}x{len} (row {idx})"),
            });
        }
    }
    Ok(())
}
