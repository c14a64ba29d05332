// src/watch/mod.rs

//! File watching and change filtering.
//!
//! This module is responsible for:
//! - Compiling include / exclude glob patterns into filter stages.
//! - Wiring up a polling filesystem watcher (`notify`).
//! - Forwarding filtered changes to the runtime.
//!
//! It knows nothing about commands or runs; it only produces `WatchEvent`s.

pub mod event_handler;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use patterns::{Decision, FilterStage, PathFilter, StageKind};
pub use watcher::{spawn_watcher, WatcherHandle};
