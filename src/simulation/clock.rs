//! Virtual clock and wake-up agenda
//!
//! Processes never sleep on a real clock. A suspended process is an entry on
//! the agenda, keyed by the instant it becomes runnable and by the order the
//! wait was registered, so equal-time wake-ups resume first-registered first.

use std::cmp::Reverse;

use sorted_vec::SortedVec;

use super::types::{ProcessId, SimTime};

/// A pending resumption of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Wakeup {
    pub at: SimTime,
    /// Registration order, unique per clock
    pub seq: u64,
    pub process: ProcessId,
}

/// Monotonic simulated clock
pub struct Clock {
    now: SimTime,
    next_seq: u64,
    /// Ordered latest-first so the earliest wake-up sits at the end
    agenda: SortedVec<Reverse<Wakeup>>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            agenda: SortedVec::new(),
        }
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Register `process` to resume after `delay` time units. Wake-ups past
    /// the end of representable time stay parked at `SimTime::MAX`.
    pub fn schedule(&mut self, delay: SimTime, process: ProcessId) {
        let wakeup = Wakeup {
            at: self.now.saturating_add(delay),
            seq: self.next_seq,
            process,
        };
        self.next_seq += 1;
        self.agenda.insert(Reverse(wakeup));
    }

    /// Register `process` to resume at the current instant, after everything
    /// already registered for this instant
    pub fn schedule_now(&mut self, process: ProcessId) {
        self.schedule(0, process);
    }

    /// Time of the next pending wake-up
    pub fn peek(&self) -> Option<SimTime> {
        self.agenda.last().map(|Reverse(wakeup)| wakeup.at)
    }

    pub fn pending(&self) -> usize {
        self.agenda.len()
    }

    /// Remove the next wake-up and move the clock to its instant
    pub fn pop(&mut self) -> Option<Wakeup> {
        let Reverse(wakeup) = self.agenda.pop()?;
        debug_assert!(wakeup.at >= self.now, "agenda went back in time");
        self.now = wakeup.at;
        Some(wakeup)
    }

    /// Move the clock forward without running anything
    pub fn advance_to(&mut self, time: SimTime) {
        if time > self.now {
            self.now = time;
        }
    }
}
