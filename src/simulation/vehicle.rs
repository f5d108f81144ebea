//! Vehicle process for the intersection simulation
//!
//! A vehicle waits for its arrival time, joins its source queue, blocks on the
//! source gate, crosses for a fixed duration and then leaves.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context as _, Result};
use log::info;

use super::process::{Context, Process, Step};
use super::types::{Direction, ProcessId, SimTime, VehicleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VehicleStatus {
    Waiting,
    Crossing,
    Done,
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleStatus::Waiting => write!(f, "waiting"),
            VehicleStatus::Crossing => write!(f, "crossing"),
            VehicleStatus::Done => write!(f, "done"),
        }
    }
}

/// Where the vehicle process is suspended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Arriving,
    Queued,
    Crossing,
    Finished,
}

/// Everything needed to put a vehicle into the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleSpec {
    pub id: VehicleId,
    pub arrival_time: SimTime,
    pub source: Direction,
    pub destination: Direction,
    pub priority: u32,
}

impl VehicleSpec {
    pub fn new(
        id: usize,
        arrival_time: SimTime,
        source: Direction,
        destination: Direction,
        priority: u32,
    ) -> Self {
        Self {
            id: VehicleId(id),
            arrival_time,
            source,
            destination,
            priority,
        }
    }

    /// Parse `SRC:DST:ARRIVAL[:PRIORITY]`, e.g. `N:S:0` or `west:north:2:1`
    pub fn parse(id: usize, text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split(':').collect();
        if !(3..=4).contains(&parts.len()) {
            bail!(
                "Vehicle '{}' must look like SRC:DST:ARRIVAL[:PRIORITY]",
                text
            );
        }

        let source = Direction::from_str(parts[0])?;
        let destination = Direction::from_str(parts[1])?;
        let arrival_time = parts[2]
            .trim()
            .parse()
            .with_context(|| format!("Invalid arrival time in '{}'", text))?;
        let priority = match parts.get(3) {
            Some(p) => p
                .trim()
                .parse()
                .with_context(|| format!("Invalid priority in '{}'", text))?,
            None => 0,
        };

        Ok(Self::new(id, arrival_time, source, destination, priority))
    }
}

/// A vehicle in the simulation
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub arrival_time: SimTime,
    pub source: Direction,
    pub destination: Direction,
    /// Higher is more urgent
    pub priority: u32,
    pub crossing_duration: SimTime,
    pub status: VehicleStatus,
    /// When the vehicle joined its queue
    pub wait_start: Option<SimTime>,
    /// When the vehicle was granted its gate
    pub wait_end: Option<SimTime>,
    pub completed_at: Option<SimTime>,
    phase: Phase,
}

impl Vehicle {
    pub fn new(spec: VehicleSpec, crossing_duration: SimTime) -> Self {
        Self {
            id: spec.id,
            arrival_time: spec.arrival_time,
            source: spec.source,
            destination: spec.destination,
            priority: spec.priority,
            crossing_duration,
            status: VehicleStatus::Waiting,
            wait_start: None,
            wait_end: None,
            completed_at: None,
            phase: Phase::Created,
        }
    }

    pub fn process_id(&self) -> ProcessId {
        ProcessId::Vehicle(self.id)
    }

    /// Time spent between joining the queue and getting the gate
    pub fn wait_time(&self) -> Option<SimTime> {
        Some(self.wait_end? - self.wait_start?)
    }

    /// Whether the vehicle has joined its queue and not yet left it
    pub fn is_queued(&self) -> bool {
        matches!(self.phase, Phase::Queued | Phase::Crossing)
    }

    fn join_queue(&mut self, ctx: &mut Context<'_>) -> Step {
        self.wait_start = Some(ctx.now());
        info!("Time {}: {}", ctx.now(), self);
        let request = ctx.request_crossing(self);
        self.phase = Phase::Queued;
        Step::Acquire(request)
    }

    /// Leave the queue and hand the gate on. Runs once; later calls do nothing.
    fn complete(&mut self, ctx: &mut Context<'_>) {
        if self.status == VehicleStatus::Done {
            return;
        }
        self.status = VehicleStatus::Done;
        self.completed_at = Some(ctx.now());
        self.phase = Phase::Finished;
        ctx.remove_from_queue(self);
        ctx.release(self.source, self.process_id());
        info!("Time {}: Vehicle {} completed crossing", ctx.now(), self.id);
    }
}

impl Process for Vehicle {
    fn resume(&mut self, ctx: &mut Context<'_>) -> Step {
        match self.phase {
            Phase::Created => {
                if ctx.now() < self.arrival_time {
                    self.phase = Phase::Arriving;
                    Step::Timeout(self.arrival_time - ctx.now())
                } else {
                    self.join_queue(ctx)
                }
            }
            Phase::Arriving => self.join_queue(ctx),
            Phase::Queued => {
                self.wait_end = Some(ctx.now());
                self.status = VehicleStatus::Crossing;
                self.phase = Phase::Crossing;
                info!(
                    "Time {}: Vehicle {} starts crossing from {} to {}",
                    ctx.now(),
                    self.id,
                    self.source,
                    self.destination
                );
                Step::Timeout(self.crossing_duration)
            }
            Phase::Crossing => {
                self.complete(ctx);
                Step::Finished
            }
            Phase::Finished => Step::Finished,
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vehicle {}: {}->{} status {}, arrival {}, wait {}, priority {}",
            self.id,
            self.source,
            self.destination,
            self.status,
            self.arrival_time,
            self.wait_time().unwrap_or(0),
            self.priority
        )
    }
}
