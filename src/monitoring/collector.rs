//! Background System Statistics Collector
//!
//! Starts `dstat` for the length of the run. The tool writes its own CSV
//! through `--output`; its terminal output is discarded.

use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, info, warn};

use crate::execution::process::ProcessHandle;

/// File the collector writes, relative to the prefix.
pub const COLLECTOR_LOG: &str = "dstat.log";

/// cpu, memory, swap, time, disk throughput, system and filesystem stats.
const DSTAT_ARGS: &[&str] = &["-cmstTy", "--fs", "--output", COLLECTOR_LOG];

/// Starts the collector in `prefix` if `dstat` is available.
///
/// Returns `None` when there is no `dstat` or it fails to start; the run
/// simply goes on without system-level statistics.
pub fn start_collector(prefix: &Path, dstat: Option<&Path>) -> Option<ProcessHandle> {
    let Some(dstat) = dstat else {
        debug!("dstat not found; skipping system statistics");
        return None;
    };

    let spawned = Command::new(dstat)
        .args(DSTAT_ARGS)
        .current_dir(prefix)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match spawned {
        Ok(child) => {
            info!("Started dstat (pid {})", child.id());
            Some(ProcessHandle::new("dstat", child))
        }
        Err(e) => {
            warn!("Failed to start {}: {}", dstat.display(), e);
            None
        }
    }
}
