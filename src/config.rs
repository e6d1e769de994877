//! Planning cycle configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::PlannerError;
use crate::matrix::CostMetric;
use crate::selector::DEFAULT_THRESHOLD_RATIO;
use crate::solver::SolveOptions;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Share of capacity at which a bin must be collected.
    pub threshold_ratio: f64,
    /// Provider matrix that feeds the solver.
    pub metric: CostMetric,
    pub solve: SolveOptions,
}

impl PlannerConfig {
    pub fn new(solve: SolveOptions) -> Self {
        Self {
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
            metric: CostMetric::default(),
            solve,
        }
    }

    pub fn with_threshold_ratio(mut self, ratio: f64) -> Self {
        self.threshold_ratio = ratio;
        self
    }

    pub fn with_metric(mut self, metric: CostMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Build from environment variables, after loading a `.env` file if one
    /// exists.
    ///
    /// `MAX_ROUTE_SPAN` is required. `VEHICLE_COUNT` defaults to one vehicle.
    /// The optional knobs are `SPAN_BALANCE_WEIGHT`, `FILL_THRESHOLD_RATIO`,
    /// `COST_METRIC`, `LOCAL_SEARCH_MOVES`, `SOLVER_TIME_LIMIT_SECS`,
    /// `SOLVER_RESTARTS` and `SOLVER_SEED`.
    pub fn from_env() -> Result<Self, PlannerError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` is this over the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PlannerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_span: u64 = parse(&lookup, "MAX_ROUTE_SPAN")?
            .ok_or_else(|| PlannerError::invalid_config("MAX_ROUTE_SPAN is required"))?;
        let vehicle_count: usize = parse(&lookup, "VEHICLE_COUNT")?.unwrap_or(1);

        let mut solve = SolveOptions::new(vehicle_count, max_span);
        if let Some(weight) = parse(&lookup, "SPAN_BALANCE_WEIGHT")? {
            solve = solve.with_span_balance_weight(weight);
        }
        if let Some(moves) = parse(&lookup, "LOCAL_SEARCH_MOVES")? {
            solve = solve.with_max_moves(moves);
        }
        if let Some(secs) = parse::<u64, _>(&lookup, "SOLVER_TIME_LIMIT_SECS")? {
            solve = solve.with_time_limit(Duration::from_secs(secs));
        }
        let restarts = parse(&lookup, "SOLVER_RESTARTS")?.unwrap_or(0);
        let seed = parse(&lookup, "SOLVER_SEED")?.unwrap_or(0);
        solve = solve.with_restarts(restarts, seed);

        let mut config = Self::new(solve);
        if let Some(ratio) = parse(&lookup, "FILL_THRESHOLD_RATIO")? {
            config = config.with_threshold_ratio(ratio);
        }
        if let Some(metric) = parse(&lookup, "COST_METRIC")? {
            config = config.with_metric(metric);
        }

        config.validate()?;
        debug!(?config, "loaded planner configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.solve.vehicle_count == 0 {
            return Err(PlannerError::invalid_config("VEHICLE_COUNT must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.threshold_ratio) {
            return Err(PlannerError::invalid_config(format!(
                "threshold ratio {} is outside [0, 1]",
                self.threshold_ratio
            )));
        }
        Ok(())
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>, PlannerError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PlannerError::invalid_config(format!("{key} has invalid value '{raw}'"))),
    }
}
