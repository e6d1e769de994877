//! bin-route-planner
//!
//! Plans collection routes for smart waste bins: picks the bins that need
//! emptying, spreads them over a vehicle fleet and orders each vehicle's
//! visits from and back to a shared depot.

pub mod assembler;
pub mod config;
pub mod error;
pub mod haversine;
pub mod matrix;
pub mod model;
pub mod ors;
pub mod osrm;
pub mod planner;
pub mod selector;
pub mod simulation;
pub mod solver;
pub mod traits;
pub mod visualize;

pub use error::PlannerError;
