//! OpenRouteService matrix adapter.
//!
//! Posts the coordinates to the `/v2/matrix/{profile}` endpoint and asks for
//! both distance and duration tables in one call.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PlannerError;
use crate::matrix::TravelMatrices;
use crate::model::Coordinate;
use crate::osrm::require_table;
use crate::traits::CostMatrixProvider;

const ACCEPT: &str = "application/json, application/geo+json, application/gpx+xml, img/png; charset=utf-8";

#[derive(Debug, Clone)]
pub struct OrsConfig {
    /// API token sent as the `Authorization` header.
    pub token: String,
    pub base_url: String,
    /// Routing profile, e.g. `driving-hgv` for collection trucks.
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: "https://api.openrouteservice.org".to_string(),
            profile: "driving-hgv".to_string(),
            timeout_secs: 30,
        }
    }
}

impl OrsConfig {
    /// Read `OPEN_ROUTE_SERVICE_TOKEN` (required) plus the optional
    /// `OPEN_ROUTE_SERVICE_URL` and `OPEN_ROUTE_SERVICE_PROFILE`, after
    /// loading a `.env` file if one exists.
    pub fn from_env() -> Result<Self, PlannerError> {
        dotenv::dotenv().ok();

        let token = env::var("OPEN_ROUTE_SERVICE_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| PlannerError::invalid_config("OPEN_ROUTE_SERVICE_TOKEN is not set"))?;

        let defaults = Self::default();
        Ok(Self {
            token,
            base_url: env::var("OPEN_ROUTE_SERVICE_URL").unwrap_or(defaults.base_url),
            profile: env::var("OPEN_ROUTE_SERVICE_PROFILE").unwrap_or(defaults.profile),
            timeout_secs: defaults.timeout_secs,
        })
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, PlannerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn matrix_url(&self) -> String {
        format!(
            "{}/v2/matrix/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile
        )
    }
}

impl CostMatrixProvider for OrsClient {
    fn matrices_for(&self, coordinates: &[Coordinate]) -> Result<TravelMatrices, PlannerError> {
        if coordinates.len() < 2 {
            return Err(PlannerError::invalid_config(
                "a matrix request needs the depot and at least one bin",
            ));
        }

        let request = MatrixRequest::new(coordinates);
        info!(locations = coordinates.len(), profile = %self.config.profile, "requesting ORS matrix");

        let response = self
            .client
            .post(self.matrix_url())
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header(reqwest::header::AUTHORIZATION, &self.config.token)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "ORS matrix request rejected");
            return Err(PlannerError::matrix_unavailable(format!(
                "OpenRouteService returned status {}",
                status.as_u16()
            )));
        }

        let body: MatrixResponse = response.json()?;
        debug!("ORS matrix payload decoded");
        body.into_matrices()
    }
}

#[derive(Debug, Serialize)]
struct MatrixRequest {
    /// `[longitude, latitude]` pairs, depot first.
    locations: Vec<[f64; 2]>,
    metrics: [&'static str; 2],
}

impl MatrixRequest {
    fn new(coordinates: &[Coordinate]) -> Self {
        Self {
            locations: coordinates.iter().map(|c| [c.longitude, c.latitude]).collect(),
            metrics: ["distance", "duration"],
        }
    }
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

impl MatrixResponse {
    fn into_matrices(self) -> Result<TravelMatrices, PlannerError> {
        Ok(TravelMatrices {
            durations: require_table("durations", self.durations)?,
            distances: require_table("distances", self.distances)?,
        })
    }
}
