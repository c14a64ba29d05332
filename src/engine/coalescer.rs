// src/engine/coalescer.rs

//! Pure coalescing state machine.
//!
//! Has no channels, no Tokio types, and performs no IO; the async shell in
//! [`super::runtime`] feeds it events and run completions.

use tracing::debug;

use crate::types::WatchEvent;

/// Where the trigger loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    /// Running, and at least one event arrived since the run started.
    RunningPendingRerun,
}

/// What the caller should do with an event it just fed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDecision {
    /// Idle -> Running: start the command sequence now.
    StartRun,
    /// First event during a run: a single rerun is now pending.
    RerunScheduled,
    /// A rerun was already pending; nothing more to remember.
    Coalesced,
}

/// At-most-one-pending-rerun coalescer.
#[derive(Debug)]
pub struct Coalescer {
    state: RunState,
    runs_started: usize,
    events_coalesced: usize,
}

impl Default for Coalescer {
    fn default() -> Self {
        Self::new()
    }
}

impl Coalescer {
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
            runs_started: 0,
            events_coalesced: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == RunState::Idle
    }

    /// Number of Idle -> Running transitions so far.
    pub fn runs_started(&self) -> usize {
        self.runs_started
    }

    /// Events that were absorbed without adding any work.
    pub fn events_coalesced(&self) -> usize {
        self.events_coalesced
    }

    /// Feed one event of interest.
    pub fn on_event(&mut self) -> EventDecision {
        match self.state {
            RunState::Idle => {
                self.state = RunState::Running;
                self.runs_started += 1;
                EventDecision::StartRun
            }
            RunState::Running => {
                self.state = RunState::RunningPendingRerun;
                debug!("event during run; scheduling one rerun");
                EventDecision::RerunScheduled
            }
            RunState::RunningPendingRerun => {
                self.events_coalesced += 1;
                EventDecision::Coalesced
            }
        }
    }

    /// Record an event that belongs to the burst which started the current
    /// run. It was already pending when the run began, so it adds nothing.
    pub fn absorb_into_current(&mut self) {
        self.events_coalesced += 1;
    }

    /// The command sequence returned. Moves back to `Idle` and, if a rerun
    /// was pending, returns the synthetic trigger to feed back in.
    pub fn on_run_finished(&mut self) -> Option<WatchEvent> {
        let previous = self.state;
        self.state = RunState::Idle;

        match previous {
            RunState::RunningPendingRerun => Some(WatchEvent::rerun()),
            RunState::Running => None,
            RunState::Idle => {
                debug!("run finished while coalescer was idle; ignoring");
                None
            }
        }
    }

    /// Drop any pending rerun (used on shutdown).
    pub fn cancel_pending(&mut self) {
        if self.state == RunState::RunningPendingRerun {
            self.state = RunState::Running;
        }
    }
}
