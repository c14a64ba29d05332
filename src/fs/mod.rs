// src/fs/mod.rs

//! Filesystem access needed while resolving startup configuration.
//!
//! Only the working directory and the ignore file go through here; the
//! watcher talks to the real filesystem via `notify`.

use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Directory that relative roots and glob patterns are resolved against.
    fn current_dir(&self) -> io::Result<PathBuf>;
}

/// Implementation backed by `std::fs` and `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }
}
