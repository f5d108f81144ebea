//! Per-approach crossing gate
//!
//! A capacity-1 lock with a FIFO wait order. Vehicles hold it while crossing;
//! the scheduler holds it while the approach is red.

use std::collections::VecDeque;

use super::types::ProcessId;

#[derive(Debug, Clone, Default)]
pub struct ApproachLock {
    holder: Option<ProcessId>,
    waiters: VecDeque<ProcessId>,
}

impl ApproachLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lock already held by `holder`
    pub fn held_by(holder: ProcessId) -> Self {
        Self {
            holder: Some(holder),
            waiters: VecDeque::new(),
        }
    }

    pub fn holder(&self) -> Option<ProcessId> {
        self.holder
    }

    pub fn is_held_by(&self, process: ProcessId) -> bool {
        self.holder == Some(process)
    }

    pub fn waiters(&self) -> impl Iterator<Item = &ProcessId> {
        self.waiters.iter()
    }

    /// Ask for the lock. Returns true when granted on the spot, otherwise
    /// `process` joins the back of the wait order.
    pub fn request(&mut self, process: ProcessId) -> bool {
        debug_assert!(
            self.holder != Some(process) && !self.waiters.contains(&process),
            "{:?} requested a lock it already holds or waits for",
            process
        );
        if self.holder.is_none() {
            self.holder = Some(process);
            true
        } else {
            self.waiters.push_back(process);
            false
        }
    }

    /// Give the lock up. The first waiter, if any, becomes the holder and is
    /// returned so it can be resumed.
    pub fn release(&mut self, process: ProcessId) -> Option<ProcessId> {
        assert_eq!(
            self.holder,
            Some(process),
            "{:?} released a lock it does not hold",
            process
        );
        self.holder = self.waiters.pop_front();
        self.holder
    }
}
