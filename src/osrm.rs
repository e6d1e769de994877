//! OSRM HTTP adapter for duration and distance tables.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::PlannerError;
use crate::matrix::TravelMatrices;
use crate::model::Coordinate;
use crate::traits::CostMatrixProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, PlannerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn table_url(&self, coordinates: &[Coordinate]) -> String {
        let coords = coordinates
            .iter()
            .map(|c| format!("{:.6},{:.6}", c.longitude, c.latitude))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=duration,distance",
            self.config.base_url, self.config.profile, coords
        )
    }
}

impl CostMatrixProvider for OsrmClient {
    fn matrices_for(&self, coordinates: &[Coordinate]) -> Result<TravelMatrices, PlannerError> {
        if coordinates.is_empty() {
            return Ok(TravelMatrices {
                durations: Vec::new(),
                distances: Vec::new(),
            });
        }

        let url = self.table_url(coordinates);
        debug!(locations = coordinates.len(), "requesting OSRM table");

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>())
            .inspect_err(|err| warn!(error = %err, "OSRM table request failed"))?;

        body.into_matrices()
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmTableResponse {
    fn into_matrices(self) -> Result<TravelMatrices, PlannerError> {
        if self.code != "Ok" {
            return Err(PlannerError::matrix_unavailable(format!(
                "OSRM returned {}: {}",
                self.code,
                self.message.unwrap_or_default()
            )));
        }

        Ok(TravelMatrices {
            durations: require_table("durations", self.durations)?,
            distances: require_table("distances", self.distances)?,
        })
    }
}

/// Unwrap a table, treating missing tables and unroutable pairs as failures.
pub(crate) fn require_table(
    name: &str,
    table: Option<Vec<Vec<Option<f64>>>>,
) -> Result<Vec<Vec<f64>>, PlannerError> {
    let table = table.ok_or_else(|| PlannerError::matrix_unavailable(format!("response has no {name}")))?;

    table
        .into_iter()
        .enumerate()
        .map(|(row_idx, row)| {
            row.into_iter()
                .enumerate()
                .map(|(col_idx, value)| {
                    value.ok_or_else(|| {
                        PlannerError::matrix_unavailable(format!(
                            "no route in {name}[{row_idx}][{col_idx}]"
                        ))
                    })
                })
                .collect()
        })
        .collect()
}
