//! Simulated bin sensors.
//!
//! Fill levels are drawn from a seeded generator, so a seed fixes every
//! reading and planning runs can be replayed exactly.

use std::cell::RefCell;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::{Coordinate, Location};
use crate::traits::BinStateProvider;

/// A registry of bins whose fill levels come from a seeded random source.
///
/// Every call to [`BinStateProvider::bins`] is a new planning cycle with
/// fresh readings, uniform over `[0, max_capacity]`.
#[derive(Debug)]
pub struct SimulatedBins {
    registry: Vec<(String, Coordinate)>,
    max_capacity: f64,
    readings: Readings,
}

#[derive(Debug)]
enum Readings {
    Random(RefCell<ChaCha8Rng>),
    Fixed(Vec<f64>),
}

impl SimulatedBins {
    pub fn new(registry: Vec<(String, Coordinate)>, max_capacity: f64, seed: u64) -> Self {
        Self {
            registry,
            max_capacity,
            readings: Readings::Random(RefCell::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    /// Bins reporting the given fill levels, in registry order. Bins past the
    /// end of `levels` report nothing.
    pub fn fixed(registry: Vec<(String, Coordinate)>, max_capacity: f64, levels: Vec<f64>) -> Self {
        Self {
            registry,
            max_capacity,
            readings: Readings::Fixed(levels),
        }
    }
}

impl BinStateProvider for SimulatedBins {
    fn bins(&self) -> Vec<Location> {
        self.registry
            .iter()
            .enumerate()
            .map(|(idx, (id, coordinate))| {
                let bin = Location::new(id.clone(), *coordinate, self.max_capacity);
                let level = match &self.readings {
                    Readings::Random(rng) => Some(rng.borrow_mut().gen_range(0.0..=self.max_capacity)),
                    Readings::Fixed(levels) => levels.get(idx).copied(),
                };
                match level {
                    Some(level) => bin.with_fill_level(level),
                    None => bin,
                }
            })
            .collect()
    }
}
