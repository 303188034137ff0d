//! External Tool Resolution
//!
//! Locates the helper executables a run shells out to. Every tool is
//! optional: a missing tool resolves to `None` and the caller skips
//! whatever it would have done with it.

use std::path::{Path, PathBuf};

use log::debug;

/// Name of the simulator executable searched for on `PATH`.
pub const SIMULATOR_NAME: &str = "shadow";

/// Resolves an executable on the search path.
///
/// Names containing a path separator are taken as paths and only checked
/// for existence.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    if name.contains('/') {
        let path = PathBuf::from(name);
        return path.is_file().then_some(path);
    }

    match which::which(name) {
        Ok(path) => {
            debug!("Resolved '{}' to {}", name, path.display());
            Some(path)
        }
        Err(e) => {
            debug!("'{}' not found on PATH: {}", name, e);
            None
        }
    }
}

/// Paths of the monitoring helpers used during a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolPaths {
    /// `date`, timestamps each memory sample
    pub date: Option<PathBuf>,
    /// `free`, the memory report
    pub free: Option<PathBuf>,
    /// `dstat`, the background system statistics collector
    pub dstat: Option<PathBuf>,
}

impl ToolPaths {
    /// Resolves every helper from `PATH`.
    pub fn discover() -> Self {
        Self {
            date: find_executable("date"),
            free: find_executable("free"),
            dstat: find_executable("dstat"),
        }
    }

    /// A set with no tools at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Overrides the `date` path.
    pub fn with_date(mut self, path: impl Into<PathBuf>) -> Self {
        self.date = Some(path.into());
        self
    }

    /// Overrides the `free` path.
    pub fn with_free(mut self, path: impl Into<PathBuf>) -> Self {
        self.free = Some(path.into());
        self
    }

    /// Overrides the `dstat` path.
    pub fn with_dstat(mut self, path: impl Into<PathBuf>) -> Self {
        self.dstat = Some(path.into());
        self
    }

    pub fn date(&self) -> Option<&Path> {
        self.date.as_deref()
    }

    pub fn free(&self) -> Option<&Path> {
        self.free.as_deref()
    }

    pub fn dstat(&self) -> Option<&Path> {
        self.dstat.as_deref()
    }
}
