#![allow(dead_code)]

pub use runwatch_test_utils::{backends, builders, init_tracing, with_timeout};

use runwatch::types::{WatchEvent, WatchOp};

/// A plain write event for `path`.
pub fn write_event(path: &str) -> WatchEvent {
    WatchEvent::new(path, WatchOp::Write)
}
