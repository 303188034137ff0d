//! Periodic Memory Sampler
//!
//! Runs `date` and `free` once per interval on a background thread,
//! appending both outputs to `free.log` until told to stop.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{channel, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info};

use super::signal::StopSignal;
use crate::environment::ToolPaths;
use crate::error::{Result, SimError};

/// File the sampler writes, relative to the prefix.
pub const SAMPLER_LOG: &str = "free.log";

/// Time between samples.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// UTC timestamp with nanoseconds and zone label.
const DATE_ARGS: &[&str] = &["--utc", "+%s.%N %Z seconds since epoch"];

/// Wide output, byte units, low/high memory statistics.
const FREE_ARGS: &[&str] = &["-w", "-b", "-l"];

/// Configuration of the memory sampling loop.
///
/// # Example
///
/// ```rust,no_run
/// use simrunner::environment::ToolPaths;
/// use simrunner::monitoring::PeriodicSampler;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let sampler = PeriodicSampler::new("/data/run", &ToolPaths::discover()).start()?;
///     // ... run the simulation ...
///     let samples = sampler.stop()?;
///     println!("took {} samples", samples);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PeriodicSampler {
    prefix: PathBuf,
    date: Option<PathBuf>,
    free: Option<PathBuf>,
    interval: Duration,
}

impl PeriodicSampler {
    /// Creates a sampler writing into `prefix` with the given tools.
    pub fn new(prefix: impl Into<PathBuf>, tools: &ToolPaths) -> Self {
        Self {
            prefix: prefix.into(),
            date: tools.date.clone(),
            free: tools.free.clone(),
            interval: DEFAULT_SAMPLE_INTERVAL,
        }
    }

    /// Sets the time slept between samples.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Path of the sampler log.
    pub fn log_path(&self) -> PathBuf {
        self.prefix.join(SAMPLER_LOG)
    }

    /// Opens the log and starts the sampling thread.
    ///
    /// The log is opened here, on the caller's thread, so that a file
    /// error is reported before anything else starts. Returns once the
    /// first sample has been written, so every run has at least one.
    pub fn start(self) -> Result<RunningSampler> {
        let log_path = self.log_path();
        let log = File::create(&log_path)
            .map_err(|e| SimError::io(format!("failed to create {}", log_path.display()), e))?;

        let stop = StopSignal::new();
        let thread_stop = stop.clone();
        let (ready_tx, ready_rx) = channel();

        let handle = thread::Builder::new()
            .name("free-sampler".to_string())
            .spawn(move || self.run_loop(log, &thread_stop, ready_tx))
            .map_err(|e| SimError::io("failed to spawn sampler thread", e))?;

        // Disconnected means the loop already failed; stop() reports why.
        let _ = ready_rx.recv();

        info!("Sampling memory into {}", log_path.display());
        Ok(RunningSampler { stop, handle })
    }

    /// Samples until `stop` is observed at the top of an iteration.
    ///
    /// Returns the number of iterations run. `log` is dropped, and so
    /// closed, on every return path.
    fn run_loop(&self, log: File, stop: &StopSignal, ready: Sender<()>) -> Result<usize> {
        let mut iterations = 0;
        let mut ready = Some(ready);

        while !stop.is_set() {
            if let Some(date) = &self.date {
                self.invoke(&log, date, DATE_ARGS)?;
            }
            if let Some(free) = &self.free {
                self.invoke(&log, free, FREE_ARGS)?;
            }

            iterations += 1;
            if let Some(tx) = ready.take() {
                let _ = tx.send(());
            }
            thread::sleep(self.interval);
        }

        debug!("Sampler stopped after {} iterations", iterations);
        Ok(iterations)
    }

    /// Runs one tool with stdout and stderr going to the shared log handle.
    fn invoke(&self, log: &File, program: &Path, args: &[&str]) -> Result<()> {
        let stdout = log
            .try_clone()
            .map_err(|e| SimError::io("failed to duplicate sampler log handle", e))?;
        let stderr = log
            .try_clone()
            .map_err(|e| SimError::io("failed to duplicate sampler log handle", e))?;

        let result = Command::new(program)
            .args(args)
            .current_dir(&self.prefix)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .status();

        match result {
            Ok(status) if !status.success() => {
                debug!("{} exited with {}", program.display(), status)
            }
            Ok(_) => {}
            Err(e) => debug!("Skipping {}: {}", program.display(), e),
        }

        Ok(())
    }
}

/// A sampler thread in progress.
#[derive(Debug)]
pub struct RunningSampler {
    stop: StopSignal,
    handle: JoinHandle<Result<usize>>,
}

impl RunningSampler {
    /// The signal that ends the loop.
    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    /// Returns true once the thread has returned.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Signals the loop to stop and joins the thread.
    ///
    /// Waits for at most one interval plus whatever invocations are
    /// already in flight.
    pub fn stop(self) -> Result<usize> {
        self.stop.set();
        self.handle.join().map_err(|_| SimError::SamplerPanicked)?
    }
}
