//! Four-way intersection simulation
//!
//! A discrete-event simulation on a virtual clock. Vehicles queue on one of
//! four approaches and a round-robin scheduler with priority preemption
//! decides which approach is green. Runs headless; display layers read
//! snapshots and signal changes.

mod clock;
mod config;
mod generator;
mod intersection;
mod lock;
mod process;
mod scheduler;
mod snapshot;
mod stats;
mod types;
mod vehicle;
mod world;

pub use clock::{Clock, Wakeup};
pub use config::IntersectionConfig;
pub use generator::ArrivalGenerator;
pub use intersection::{LockRequest, QueuedVehicle, SignalChange, SignalObserver, SimIntersection};
pub use lock::ApproachLock;
pub use process::{Context, Process, Step};
pub use scheduler::{Scheduler, SchedulerState};
pub use snapshot::{IntersectionSnapshot, QueueEntry};
pub use stats::SimulationStats;
pub use types::{
    Direction, Light, PerDirection, ProcessId, SimTime, VehicleId, DEFAULT_CROSSING_DURATION,
    DEFAULT_TIME_QUANTUM, MAX_TIMING, SKIP_DELAY, TICK,
};
pub use vehicle::{Vehicle, VehicleSpec, VehicleStatus};
pub use world::Simulation;
