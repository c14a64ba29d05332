// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("could not read ignore file {path:?}: {source}")]
    IgnoreFile {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("could not determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    #[error("failed to watch {path:?}: {source}")]
    WatchRoot {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RunwatchError>;
