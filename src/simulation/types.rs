//! Core types for the intersection simulation

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use anyhow::bail;

/// Simulated time in whole time units
pub type SimTime = u64;

/// Length of one scheduler tick
pub const TICK: SimTime = 1;

/// Time the scheduler waits after skipping an empty approach
pub const SKIP_DELAY: SimTime = 1;

/// Maximum number of ticks a direction stays green absent drain or preemption
pub const DEFAULT_TIME_QUANTUM: u64 = 10;

/// Time a vehicle occupies the intersection once it has right-of-way
pub const DEFAULT_CROSSING_DURATION: SimTime = 1;

/// Largest accepted quantum or crossing duration
pub const MAX_TIMING: SimTime = 1 << 32;

/// One of the four approaches to the intersection
///
/// The declaration order is the round-robin order and the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    /// Next direction in rotation order, wrapping around
    pub fn next(self) -> Direction {
        Direction::ALL[(self.index() + 1) % Direction::ALL.len()]
    }

    pub fn short_name(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::South => 'S',
            Direction::East => 'E',
            Direction::West => 'W',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Direction::North),
            "s" | "south" => Ok(Direction::South),
            "e" | "east" => Ok(Direction::East),
            "w" | "west" => Ok(Direction::West),
            other => bail!("Unknown direction '{}'", other),
        }
    }
}

/// A fixed record with one slot per direction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerDirection<T>([T; 4]);

impl<T> PerDirection<T> {
    pub fn from_fn(mut f: impl FnMut(Direction) -> T) -> Self {
        Self(Direction::ALL.map(&mut f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        Direction::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<Direction> for PerDirection<T> {
    type Output = T;

    fn index(&self, direction: Direction) -> &T {
        &self.0[direction.index()]
    }
}

impl<T> IndexMut<Direction> for PerDirection<T> {
    fn index_mut(&mut self, direction: Direction) -> &mut T {
        &mut self.0[direction.index()]
    }
}

/// A unique identifier for a vehicle, assigned by whoever creates it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VehicleId(pub usize);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a suspended process on the clock or in a lock's wait order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProcessId {
    Scheduler,
    Vehicle(VehicleId),
}

/// Light state of one approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Light {
    #[default]
    Red,
    Green,
}

impl Light {
    pub fn is_green(self) -> bool {
        self == Light::Green
    }
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Light::Red => write!(f, "red"),
            Light::Green => write!(f, "green"),
        }
    }
}
