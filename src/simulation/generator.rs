//! Random vehicle arrivals

use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::types::{Direction, SimTime};
use super::vehicle::VehicleSpec;

/// Chance that a generated vehicle carries a non-zero priority
const PRIORITY_VEHICLE_CHANCE: f64 = 0.2;

/// Highest priority a generated vehicle can get
const MAX_GENERATED_PRIORITY: u32 = 3;

/// Produces vehicles with exponential inter-arrival gaps
pub struct ArrivalGenerator {
    rng: StdRng,
    /// Mean arrivals per time unit
    rate: f64,
    next_id: usize,
    last_arrival: SimTime,
}

impl ArrivalGenerator {
    pub fn new(seed: u64, rate: f64, first_id: usize) -> Result<Self> {
        ensure!(
            rate.is_finite() && rate > 0.0,
            "arrival rate must be positive, got {}",
            rate
        );
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            rate,
            next_id: first_id,
            last_arrival: 0,
        })
    }

    fn next_gap(&mut self) -> SimTime {
        let u: f64 = self.rng.random();
        let gap = -(1.0 - u).ln() / self.rate;
        // Float to int casts saturate, so a tiny rate yields SimTime::MAX
        gap.ceil() as SimTime
    }

    fn random_direction(&mut self) -> Direction {
        Direction::ALL[self.rng.random_range(0..Direction::ALL.len())]
    }

    pub fn next_vehicle(&mut self) -> VehicleSpec {
        self.last_arrival = self.last_arrival.saturating_add(self.next_gap());

        let source = self.random_direction();
        let others: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&d| d != source)
            .collect();
        let destination = others[self.rng.random_range(0..others.len())];

        let priority = if self.rng.random_bool(PRIORITY_VEHICLE_CHANCE) {
            self.rng.random_range(1..=MAX_GENERATED_PRIORITY)
        } else {
            0
        };

        let spec = VehicleSpec::new(
            self.next_id,
            self.last_arrival,
            source,
            destination,
            priority,
        );
        self.next_id += 1;
        spec
    }

    /// Generate `count` vehicles in arrival order
    pub fn generate(&mut self, count: usize) -> Vec<VehicleSpec> {
        (0..count).map(|_| self.next_vehicle()).collect()
    }
}
