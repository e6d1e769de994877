//! Test fixtures for bin-route-planner.
//!
//! Provides realistic test data including:
//! - Real smart-bin sites around Fortaleza, Brazil
//! - Matrix builders and route partition assertions

pub mod fortaleza_bins;
pub mod matrices;

pub use fortaleza_bins::*;
pub use matrices::*;
