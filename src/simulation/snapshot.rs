//! Read-only view of the intersection for display layers

use std::fmt;

use super::types::{Direction, Light, PerDirection, SimTime, VehicleId};
use super::vehicle::VehicleStatus;

/// How many queued vehicles are drawn per approach before eliding
const MAX_DRAWN_PER_QUEUE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub id: VehicleId,
    pub destination: Direction,
    pub priority: u32,
    pub status: Option<VehicleStatus>,
}

/// Queues, lights and time at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionSnapshot {
    pub time: SimTime,
    pub lights: PerDirection<Light>,
    pub queues: PerDirection<Vec<QueueEntry>>,
    /// Direction the scheduler is mid-turn on
    pub serving: Option<Direction>,
}

impl IntersectionSnapshot {
    pub fn green_count(&self) -> usize {
        self.lights.iter().filter(|(_, light)| light.is_green()).count()
    }

    pub fn queued(&self) -> usize {
        self.queues.iter().map(|(_, queue)| queue.len()).sum()
    }

    /// One approach as e.g. `N [G] 1 5*` (crossing vehicles in parentheses)
    fn approach_line(&self, direction: Direction) -> String {
        let light = match self.lights[direction] {
            Light::Green => 'G',
            Light::Red => 'R',
        };
        let queue = &self.queues[direction];
        let mut line = format!("{} [{}]", direction, light);

        for entry in queue.iter().take(MAX_DRAWN_PER_QUEUE) {
            let marker = if entry.priority > 0 { "*" } else { "" };
            if entry.status == Some(VehicleStatus::Crossing) {
                line.push_str(&format!(" ({}{})", entry.id, marker));
            } else {
                line.push_str(&format!(" {}{}", entry.id, marker));
            }
        }
        if queue.len() > MAX_DRAWN_PER_QUEUE {
            line.push_str(&format!(" +{}", queue.len() - MAX_DRAWN_PER_QUEUE));
        }
        line
    }
}

impl fmt::Display for IntersectionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let north = self.approach_line(Direction::North);
        let south = self.approach_line(Direction::South);
        let east = self.approach_line(Direction::East);
        let west = self.approach_line(Direction::West);
        let pad = west.chars().count();

        writeln!(f, "=== Intersection at t={} ===", self.time)?;
        writeln!(f, "{:pad$}   {}", "", north, pad = pad)?;
        writeln!(f, "{:pad$}    |", "", pad = pad)?;
        writeln!(f, "{} --+-- {}", west, east)?;
        writeln!(f, "{:pad$}    |", "", pad = pad)?;
        writeln!(f, "{:pad$}   {}", "", south, pad = pad)?;
        match self.serving {
            Some(direction) => writeln!(f, "Serving: {}", direction),
            None => writeln!(f, "Serving: -"),
        }
    }
}
