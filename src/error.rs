//! Error Types
//!
//! Almost every failure during a run is degraded to a warning. The
//! variants here are the few conditions that end a run: bad
//! configuration, and log files that cannot be opened or written.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// A log file could not be created, duplicated, or written.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The simulator argument string could not be split into words.
    #[error("invalid simulator arguments: {0}")]
    InvalidArguments(String),

    /// The run prefix does not exist or is not a directory.
    #[error("run prefix is not a directory: {}", .0.display())]
    InvalidPrefix(PathBuf),

    /// The YAML run configuration could not be read or parsed.
    #[error("invalid run configuration: {0}")]
    Config(String),

    /// The sampler thread panicked before it could be joined.
    #[error("sampler thread panicked")]
    SamplerPanicked,

    /// The run report could not be serialized.
    #[error("failed to serialize run report: {0}")]
    Report(#[from] serde_json::Error),
}

impl SimError {
    /// Wraps an I/O error with a description of what was being attempted.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        SimError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SimError>;
