//! Runs one collection planning cycle over the sample bin registry.

use std::env;
use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use bin_route_planner::PlannerError;
use bin_route_planner::config::PlannerConfig;
use bin_route_planner::haversine::HaversineMatrix;
use bin_route_planner::model::{Coordinate, Location};
use bin_route_planner::ors::{OrsClient, OrsConfig};
use bin_route_planner::planner::plan_cycle;
use bin_route_planner::simulation::SimulatedBins;
use bin_route_planner::traits::CostMatrixProvider;
use bin_route_planner::visualize::GoogleMapsLink;

const DEPOT: Coordinate = Coordinate::new(-38.500499900597745, -3.7769178589442527);

const BIN_COORDINATES: [(f64, f64); 13] = [
    (-38.53866577, -3.75756748),
    (-38.49557877, -3.76585371),
    (-38.55128288, -3.76354128),
    (-38.56484413, -3.74589811),
    (-38.55600357, -3.74238656),
    (-38.53360176, -3.76525419),
    (-38.50090027, -3.74093055),
    (-38.53639126, -3.71943269),
    (-38.56304169, -3.77424691),
    (-38.54174979033555, -3.771483854972607),
    (-38.539506, -3.795058),
    (-38.545815, -3.792681),
    (-38.5398346527822, -3.7900433856848474),
];

const BIN_CAPACITY: f64 = 120.0;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();
}

fn matrix_provider() -> Result<Box<dyn CostMatrixProvider>, PlannerError> {
    match OrsConfig::from_env() {
        Ok(config) => Ok(Box::new(OrsClient::new(config)?)),
        Err(err) => {
            warn!(error = %err, "falling back to straight-line travel estimates");
            Ok(Box::new(HaversineMatrix::default()))
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = PlannerConfig::from_env()?;
    let seed = env::var("BIN_SEED")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(12345);

    let registry = BIN_COORDINATES
        .iter()
        .enumerate()
        .map(|(idx, (lng, lat))| (format!("bin-{:02}", idx + 1), Coordinate::new(*lng, *lat)))
        .collect();
    let bins = SimulatedBins::new(registry, BIN_CAPACITY, seed);
    let depot = Location::depot("depot", DEPOT);
    let matrices = matrix_provider()?;

    match plan_cycle(&bins, matrices.as_ref(), &GoogleMapsLink::default(), &depot, &config) {
        Ok(plan) => {
            for (vehicle, stops) in &plan.routes {
                let ids: Vec<&str> = stops.iter().map(|stop| stop.id.as_str()).collect();
                let span = plan.solution.route(*vehicle).map_or(0, |route| route.span);
                println!("vehicle {vehicle} (span {span}): {}", ids.join(" -> "));
                if let Some(link) = plan.links.get(vehicle) {
                    println!("  {link}");
                }
            }
            Ok(())
        }
        Err(PlannerError::NoQualifyingDemand) => {
            info!("nothing to collect, skipping this cycle");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
