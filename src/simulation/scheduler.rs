//! Round-robin signal scheduler with priority preemption
//!
//! The scheduler walks the approaches in N, S, E, W order. An empty approach
//! is skipped after a one-unit pause. A non-empty approach turns green for up
//! to `time_quantum` ticks; after every tick the scheduler stops early if the
//! queue has drained, or hands over to a competing approach whose summed
//! priority is strictly higher. Turning red means taking the approach's gate
//! back, which waits behind every vehicle already in the gate's wait order.

use log::info;

use super::intersection::LockRequest;
use super::process::{Context, Process, Step};
use super::types::{Direction, SKIP_DELAY, TICK};

/// Where the scheduler is in the current serving cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// About to examine the current direction
    Idle,
    /// Current direction is green; `elapsed` ticks of the quantum have run
    Serving { elapsed: u64 },
    /// Waiting to take the current direction's gate back.
    /// `preempt_to` is this turn's preemption winner, if one was found.
    Draining { preempt_to: Option<Direction> },
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    current: Direction,
    state: SchedulerState,
    time_quantum: u64,
    green_phases: usize,
    preemptions: usize,
}

impl Scheduler {
    pub fn new(time_quantum: u64) -> Self {
        Self {
            current: Direction::North,
            state: SchedulerState::Idle,
            time_quantum,
            green_phases: 0,
            preemptions: 0,
        }
    }

    pub fn current_direction(&self) -> Direction {
        self.current
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn time_quantum(&self) -> u64 {
        self.time_quantum
    }

    /// Number of times a direction has been turned green
    pub fn green_phases(&self) -> usize {
        self.green_phases
    }

    pub fn preemptions(&self) -> usize {
        self.preemptions
    }

    /// Direction the scheduler is serving, if it is mid-turn
    pub fn serving(&self) -> Option<Direction> {
        match self.state {
            SchedulerState::Idle => None,
            SchedulerState::Serving { .. } | SchedulerState::Draining { .. } => Some(self.current),
        }
    }

    fn drain(&mut self, preempt_to: Option<Direction>) -> Step {
        self.state = SchedulerState::Draining { preempt_to };
        Step::Acquire(LockRequest {
            direction: self.current,
        })
    }

    /// One quantum tick has passed while serving
    fn after_tick(&mut self, elapsed: u64, ctx: &mut Context<'_>) -> Step {
        let serving = self.current;
        let intersection = ctx.intersection();

        if intersection.queue(serving).is_empty() {
            return self.drain(None);
        }

        if let Some((winner, load)) = intersection.preemption_candidate(serving) {
            info!(
                "Time {}: Priority detected in direction {} with value {} (serving {} at {})",
                ctx.now(),
                winner,
                load,
                serving,
                intersection.load(serving)
            );
            self.preemptions += 1;
            return self.drain(Some(winner));
        }

        if elapsed >= self.time_quantum {
            return self.drain(None);
        }

        self.state = SchedulerState::Serving { elapsed };
        Step::Timeout(TICK)
    }
}

impl Process for Scheduler {
    fn resume(&mut self, ctx: &mut Context<'_>) -> Step {
        loop {
            match self.state {
                SchedulerState::Idle => {
                    if ctx.intersection().queue(self.current).is_empty() {
                        self.current = self.current.next();
                        return Step::Timeout(SKIP_DELAY);
                    }
                    ctx.turn_green(self.current);
                    self.green_phases += 1;
                    self.state = SchedulerState::Serving { elapsed: 0 };
                    return Step::Timeout(TICK);
                }
                SchedulerState::Serving { elapsed } => {
                    return self.after_tick(elapsed + 1, ctx);
                }
                SchedulerState::Draining { preempt_to } => {
                    // Gate is back with the scheduler
                    ctx.turn_red(self.current);
                    self.current = preempt_to.unwrap_or_else(|| self.current.next());
                    self.state = SchedulerState::Idle;
                }
            }
        }
    }
}
