//! The intersection: per-approach gates, waiting queues and signal lights
//!
//! The intersection never owns vehicles. Queues hold lightweight entries that
//! refer back to vehicles by id. Only the scheduler changes lights; only the
//! vehicle at the head of a gate's wait order changes that gate's holder.

use log::{debug, info};

use super::lock::ApproachLock;
use super::types::{Direction, Light, PerDirection, ProcessId, SimTime, VehicleId};
use super::vehicle::Vehicle;

/// A vehicle's membership in its source queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedVehicle {
    pub id: VehicleId,
    pub destination: Direction,
    pub priority: u32,
}

/// Handle returned by `request_crossing`, satisfied once the approach's gate
/// is granted to the requesting process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockRequest {
    pub direction: Direction,
}

/// A single light transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalChange {
    pub time: SimTime,
    pub direction: Direction,
    pub light: Light,
}

/// Receives every light transition as it happens
pub trait SignalObserver {
    fn on_signal_change(&mut self, change: &SignalChange);
}

impl<F> SignalObserver for F
where
    F: FnMut(&SignalChange),
{
    fn on_signal_change(&mut self, change: &SignalChange) {
        self(change)
    }
}

pub struct SimIntersection {
    gates: PerDirection<ApproachLock>,
    queues: PerDirection<Vec<QueuedVehicle>>,
    lights: PerDirection<Light>,
    history: Vec<SignalChange>,
    observers: Vec<Box<dyn SignalObserver>>,
}

impl Default for SimIntersection {
    fn default() -> Self {
        Self::new()
    }
}

impl SimIntersection {
    /// All four approaches start red, their gates held by the scheduler
    pub fn new() -> Self {
        Self {
            gates: PerDirection::from_fn(|_| ApproachLock::held_by(ProcessId::Scheduler)),
            queues: PerDirection::default(),
            lights: PerDirection::default(),
            history: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn SignalObserver>) {
        self.observers.push(observer);
    }

    pub fn queue(&self, direction: Direction) -> &[QueuedVehicle] {
        &self.queues[direction]
    }

    pub fn light(&self, direction: Direction) -> Light {
        self.lights[direction]
    }

    pub fn lights(&self) -> &PerDirection<Light> {
        &self.lights
    }

    pub fn gate(&self, direction: Direction) -> &ApproachLock {
        &self.gates[direction]
    }

    /// The direction currently green, if any
    pub fn green_direction(&self) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&d| self.lights[d] == Light::Green)
    }

    pub fn signal_history(&self) -> &[SignalChange] {
        &self.history
    }

    /// Append a vehicle to its source queue and hand back the gate request it
    /// must wait on
    pub fn request_crossing(&mut self, vehicle: &Vehicle) -> LockRequest {
        let queue = &mut self.queues[vehicle.source];
        assert!(
            !queue.iter().any(|q| q.id == vehicle.id),
            "Vehicle {} queued twice on {}",
            vehicle.id,
            vehicle.source
        );
        queue.push(QueuedVehicle {
            id: vehicle.id,
            destination: vehicle.destination,
            priority: vehicle.priority,
        });
        LockRequest {
            direction: vehicle.source,
        }
    }

    /// Drop a vehicle from its source queue. Returns false if it was not there.
    pub fn remove_from_queue(&mut self, vehicle: &Vehicle, now: SimTime) -> bool {
        let queue = &mut self.queues[vehicle.source];
        match queue.iter().position(|q| q.id == vehicle.id) {
            Some(index) => {
                queue.remove(index);
                debug!(
                    "Time {}: Vehicle {} removed from {} queue",
                    now, vehicle.id, vehicle.source
                );
                true
            }
            None => false,
        }
    }

    /// Ask for a direction's gate. Returns true when granted immediately.
    pub fn acquire(&mut self, direction: Direction, process: ProcessId) -> bool {
        self.gates[direction].request(process)
    }

    /// Give a gate back, returning the process it was handed to
    pub fn release(&mut self, direction: Direction, process: ProcessId) -> Option<ProcessId> {
        self.gates[direction].release(process)
    }

    /// Sum of priorities over everything queued on `direction`
    pub fn load(&self, direction: Direction) -> u64 {
        self.queues[direction]
            .iter()
            .map(|q| u64::from(q.priority))
            .sum()
    }

    /// The non-serving direction whose load strictly exceeds the serving
    /// direction's and every earlier candidate's. Ties keep the earlier one.
    pub fn preemption_candidate(&self, serving: Direction) -> Option<(Direction, u64)> {
        let mut max_load = self.load(serving);
        let mut winner = None;

        for direction in Direction::ALL {
            if direction == serving || self.queues[direction].is_empty() {
                continue;
            }
            let load = self.load(direction);
            if load > max_load {
                max_load = load;
                winner = Some((direction, load));
            }
        }

        winner
    }

    /// Turn `direction` green by handing its gate from the scheduler to the
    /// first waiting vehicle, which is returned so it can be resumed
    pub fn turn_green(&mut self, direction: Direction, now: SimTime) -> Option<ProcessId> {
        if let Some(green) = self.green_direction() {
            panic!(
                "Time {}: {} turning green while {} is still green",
                now, direction, green
            );
        }
        let granted = self.gates[direction].release(ProcessId::Scheduler);
        self.set_light(direction, Light::Green, now);
        granted
    }

    /// Turn `direction` red. The scheduler must already hold its gate again,
    /// which cannot happen while a vehicle from `direction` is crossing.
    pub fn turn_red(&mut self, direction: Direction, now: SimTime) {
        assert!(
            self.gates[direction].is_held_by(ProcessId::Scheduler),
            "Time {}: {} turned red without the scheduler holding its gate",
            now,
            direction
        );
        self.set_light(direction, Light::Red, now);
    }

    fn set_light(&mut self, direction: Direction, light: Light, now: SimTime) {
        self.lights[direction] = light;
        let change = SignalChange {
            time: now,
            direction,
            light,
        };
        info!("Time {}: Direction {} turns {}", now, direction, light);
        for observer in &mut self.observers {
            observer.on_signal_change(&change);
        }
        self.history.push(change);
    }
}
