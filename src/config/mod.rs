// src/config/mod.rs

//! Startup configuration for runwatch.
//!
//! There is no config file: everything comes from the command line plus an
//! optional ignore file.
//!
//! - `model.rs`: raw and validated configuration types.
//! - `loader.rs`: turn `CliArgs` into a raw config (working dir, ignore file).
//! - `validate.rs`: `TryFrom<RawWatchConfig> for WatchConfig`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_config, load_raw, parse_ignore_patterns, read_ignore_file};
pub use model::{RawWatchConfig, WatchConfig};
