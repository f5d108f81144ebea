//! Main simulation world that ties everything together
//!
//! Owns the clock, the intersection, the scheduler and every vehicle, and
//! resumes processes one wake-up at a time in agenda order.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use log::{debug, warn};

use super::clock::Clock;
use super::config::IntersectionConfig;
use super::intersection::{SignalChange, SignalObserver, SimIntersection};
use super::process::{Context, Process, Step};
use super::scheduler::Scheduler;
use super::snapshot::{IntersectionSnapshot, QueueEntry};
use super::stats::SimulationStats;
use super::types::{Direction, PerDirection, ProcessId, SimTime, VehicleId};
use super::vehicle::{Vehicle, VehicleSpec};

/// The main simulation world
pub struct Simulation {
    config: IntersectionConfig,
    clock: Clock,
    intersection: SimIntersection,
    scheduler: Scheduler,
    /// All vehicles ever added, finished ones included
    vehicles: BTreeMap<VehicleId, Vehicle>,
    /// Whether the scheduler process has been put on the clock
    started: bool,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::with_config(IntersectionConfig::default())
    }
}

impl Simulation {
    fn with_config(config: IntersectionConfig) -> Self {
        Self {
            config,
            clock: Clock::new(),
            intersection: SimIntersection::new(),
            scheduler: Scheduler::new(config.time_quantum),
            vehicles: BTreeMap::new(),
            started: false,
        }
    }

    /// Build an intersection with the given timing. Fails on invalid timing.
    pub fn new(config: IntersectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    pub fn config(&self) -> &IntersectionConfig {
        &self.config
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn intersection(&self) -> &SimIntersection {
        &self.intersection
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    pub fn signal_history(&self) -> &[SignalChange] {
        self.intersection.signal_history()
    }

    pub fn add_observer(&mut self, observer: impl SignalObserver + 'static) {
        self.intersection.add_observer(Box::new(observer));
    }

    /// Register a vehicle. Its process starts at the current instant and
    /// waits there until its arrival time.
    pub fn add_vehicle(&mut self, spec: VehicleSpec) -> Result<VehicleId> {
        if spec.source == spec.destination {
            bail!(
                "Vehicle {} has the same source and destination ({})",
                spec.id,
                spec.source
            );
        }
        if self.vehicles.contains_key(&spec.id) {
            bail!("Vehicle id {} is already in use", spec.id);
        }
        if spec.arrival_time < self.now() {
            warn!(
                "Vehicle {} arrival time {} is in the past, it arrives at {}",
                spec.id,
                spec.arrival_time,
                self.now()
            );
        }

        let vehicle = Vehicle::new(spec, self.config.crossing_duration);
        self.clock.schedule_now(vehicle.process_id());
        self.vehicles.insert(spec.id, vehicle);
        Ok(spec.id)
    }

    pub fn add_vehicles(&mut self, specs: impl IntoIterator<Item = VehicleSpec>) -> Result<()> {
        for spec in specs {
            self.add_vehicle(spec)?;
        }
        Ok(())
    }

    fn ensure_started(&mut self) {
        if !self.started {
            self.started = true;
            self.clock.schedule_now(ProcessId::Scheduler);
        }
    }

    /// Time of the next pending wake-up.
    ///
    /// Like `step` and `run`, the first call puts the scheduler process on
    /// the clock, so it always sees a pending wake-up.
    pub fn peek(&mut self) -> Option<SimTime> {
        self.ensure_started();
        self.clock.peek()
    }

    /// Resume exactly one process. Returns false when nothing is pending.
    pub fn step(&mut self) -> bool {
        self.ensure_started();
        let Some(wakeup) = self.clock.pop() else {
            return false;
        };

        let mut ctx = Context::new(&mut self.clock, &mut self.intersection);
        let step = match wakeup.process {
            ProcessId::Scheduler => self.scheduler.resume(&mut ctx),
            ProcessId::Vehicle(id) => match self.vehicles.get_mut(&id) {
                Some(vehicle) => vehicle.resume(&mut ctx),
                None => {
                    warn!("Wake-up for unknown vehicle {}", id);
                    Step::Finished
                }
            },
        };
        self.suspend(wakeup.process, step);

        debug_assert!(
            Direction::ALL
                .iter()
                .filter(|&&d| self.intersection.light(d).is_green())
                .count()
                <= 1,
            "more than one direction green at {}",
            self.now()
        );
        true
    }

    fn suspend(&mut self, process: ProcessId, step: Step) {
        match step {
            Step::Timeout(delay) => self.clock.schedule(delay, process),
            Step::Acquire(request) => {
                if self.intersection.acquire(request.direction, process) {
                    self.clock.schedule_now(process);
                } else {
                    debug!(
                        "Time {}: {:?} waiting for {} gate",
                        self.now(),
                        process,
                        request.direction
                    );
                }
            }
            Step::Finished => {}
        }
    }

    /// Run every wake-up scheduled before `until`, then set the clock to
    /// `until`. Processes still mid-flight are left where they are.
    pub fn run(&mut self, until: SimTime) -> Result<()> {
        if until < self.now() {
            bail!(
                "Cannot run until {}: simulation is already at {}",
                until,
                self.now()
            );
        }
        debug!("Running simulation until {}", until);

        while self.peek().is_some_and(|next| next < until) {
            self.step();
        }
        self.clock.advance_to(until);
        Ok(())
    }

    /// Read-only view of queues and lights for display or logging
    pub fn snapshot(&self) -> IntersectionSnapshot {
        let queues = PerDirection::from_fn(|direction| {
            self.intersection
                .queue(direction)
                .iter()
                .map(|queued| QueueEntry {
                    id: queued.id,
                    destination: queued.destination,
                    priority: queued.priority,
                    status: self.vehicles.get(&queued.id).map(|v| v.status),
                })
                .collect()
        });

        IntersectionSnapshot {
            time: self.now(),
            lights: self.intersection.lights().clone(),
            queues,
            serving: self.scheduler.serving(),
        }
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats::collect(
            self.now(),
            self.vehicles.values(),
            self.scheduler.green_phases(),
            self.scheduler.preemptions(),
        )
    }
}
