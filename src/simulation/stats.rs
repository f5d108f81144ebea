//! Summary statistics for a simulation run

use log::info;

use super::types::{Direction, PerDirection, SimTime};
use super::vehicle::{Vehicle, VehicleStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationStats {
    pub elapsed_time: SimTime,
    pub total_vehicles: usize,
    pub completed_vehicles: usize,
    pub crossing_vehicles: usize,
    pub waiting_vehicles: usize,
    /// Mean wait of vehicles that have been granted their gate
    pub average_wait: f64,
    pub max_wait: SimTime,
    pub completed_per_direction: PerDirection<usize>,
    pub green_phases: usize,
    pub preemptions: usize,
}

impl SimulationStats {
    pub fn collect<'a>(
        elapsed_time: SimTime,
        vehicles: impl IntoIterator<Item = &'a Vehicle>,
        green_phases: usize,
        preemptions: usize,
    ) -> Self {
        let mut stats = Self {
            elapsed_time,
            green_phases,
            preemptions,
            ..Self::default()
        };
        let mut total_wait: SimTime = 0;
        let mut waited = 0usize;

        for vehicle in vehicles {
            stats.total_vehicles += 1;
            match vehicle.status {
                VehicleStatus::Waiting => stats.waiting_vehicles += 1,
                VehicleStatus::Crossing => stats.crossing_vehicles += 1,
                VehicleStatus::Done => {
                    stats.completed_vehicles += 1;
                    stats.completed_per_direction[vehicle.source] += 1;
                }
            }
            if let Some(wait) = vehicle.wait_time() {
                total_wait = total_wait.saturating_add(wait);
                waited += 1;
                stats.max_wait = stats.max_wait.max(wait);
            }
        }

        if waited > 0 {
            stats.average_wait = total_wait as f64 / waited as f64;
        }
        stats
    }

    pub fn completion_rate(&self) -> f64 {
        if self.total_vehicles > 0 {
            self.completed_vehicles as f64 / self.total_vehicles as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Log the summary with stable labels
    pub fn log_report(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Simulation ended at time: {}", self.elapsed_time);
        info!("Total vehicles: {}", self.total_vehicles);
        info!("Completed vehicles: {}", self.completed_vehicles);
        info!("Crossing vehicles: {}", self.crossing_vehicles);
        info!("Waiting vehicles: {}", self.waiting_vehicles);
        info!("Average wait: {:.2}", self.average_wait);
        info!("Max wait: {}", self.max_wait);
        for direction in Direction::ALL {
            info!(
                "  {} completed: {}",
                direction, self.completed_per_direction[direction]
            );
        }
        info!("Green phases: {}", self.green_phases);
        info!("Preemptions: {}", self.preemptions);
        info!("Completion rate: {:.1}%", self.completion_rate());
    }
}
