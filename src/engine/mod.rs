// src/engine/mod.rs

//! Orchestration engine for runwatch.
//!
//! - [`coalescer`]: pure state machine deciding when a run starts and
//!   whether a single rerun is pending.
//! - [`drain`]: the per-run listener that keeps draining watch events while
//!   commands execute.
//! - [`runtime`]: the async loop tying the event channel, the coalescer, the
//!   drain listener and the command backend together.

pub mod coalescer;
pub mod drain;
pub mod runtime;

pub use coalescer::{Coalescer, EventDecision, RunState};
pub use drain::{DrainListener, DrainOutcome};
pub use runtime::{Runtime, RuntimeSummary};

/// Capacity of the channel between the watch source and the runtime.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
