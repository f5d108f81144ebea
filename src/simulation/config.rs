//! Intersection configuration

use anyhow::{ensure, Result};

use super::types::{SimTime, DEFAULT_CROSSING_DURATION, DEFAULT_TIME_QUANTUM, MAX_TIMING};

/// Timing parameters shared by the scheduler and every vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionConfig {
    /// Maximum ticks a direction stays green before forced rotation
    pub time_quantum: u64,
    /// Time each vehicle occupies the intersection
    pub crossing_duration: SimTime,
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            time_quantum: DEFAULT_TIME_QUANTUM,
            crossing_duration: DEFAULT_CROSSING_DURATION,
        }
    }
}

impl IntersectionConfig {
    pub fn new(time_quantum: u64, crossing_duration: SimTime) -> Result<Self> {
        let config = Self {
            time_quantum,
            crossing_duration,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.time_quantum > 0, "time_quantum must be at least 1 tick");
        ensure!(
            self.crossing_duration > 0,
            "crossing_duration must be at least 1 time unit"
        );
        ensure!(
            self.time_quantum <= MAX_TIMING,
            "time_quantum must be at most {} ticks",
            MAX_TIMING
        );
        ensure!(
            self.crossing_duration <= MAX_TIMING,
            "crossing_duration must be at most {} time units",
            MAX_TIMING
        );
        Ok(())
    }
}
