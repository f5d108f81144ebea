//! Cooperative processes driven by the clock
//!
//! A process runs until it reaches a suspension point and reports it as a
//! `Step`. The simulation turns the step into an agenda entry (timed wait) or
//! a place in a gate's wait order (lock wait), and resumes the process when
//! that wait is satisfied.

use super::clock::Clock;
use super::intersection::{LockRequest, SimIntersection};
use super::types::{Direction, ProcessId, SimTime};
use super::vehicle::Vehicle;

/// Why a process gave control back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Resume after this many time units
    Timeout(SimTime),
    /// Resume once the gate is granted
    Acquire(LockRequest),
    /// The process is over and will not be resumed
    Finished,
}

pub trait Process {
    fn resume(&mut self, ctx: &mut Context<'_>) -> Step;
}

/// What a resumed process may touch
pub struct Context<'a> {
    clock: &'a mut Clock,
    intersection: &'a mut SimIntersection,
}

impl<'a> Context<'a> {
    pub fn new(clock: &'a mut Clock, intersection: &'a mut SimIntersection) -> Self {
        Self {
            clock,
            intersection,
        }
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn intersection(&self) -> &SimIntersection {
        &*self.intersection
    }

    pub fn request_crossing(&mut self, vehicle: &Vehicle) -> LockRequest {
        self.intersection.request_crossing(vehicle)
    }

    pub fn remove_from_queue(&mut self, vehicle: &Vehicle) -> bool {
        let now = self.clock.now();
        self.intersection.remove_from_queue(vehicle, now)
    }

    /// Release a gate, waking whoever is next in its wait order
    pub fn release(&mut self, direction: Direction, process: ProcessId) {
        if let Some(next) = self.intersection.release(direction, process) {
            self.clock.schedule_now(next);
        }
    }

    pub fn turn_green(&mut self, direction: Direction) {
        let now = self.clock.now();
        if let Some(next) = self.intersection.turn_green(direction, now) {
            self.clock.schedule_now(next);
        }
    }

    pub fn turn_red(&mut self, direction: Direction) {
        let now = self.clock.now();
        self.intersection.turn_red(direction, now);
    }
}
