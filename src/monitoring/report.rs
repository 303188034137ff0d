//! Run Report
//!
//! Records what happened during a run and saves it next to the logs as
//! `simulate.json`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::execution::process::ProcessState;

/// File the report is written to, relative to the prefix.
pub const REPORT_FILE: &str = "simulate.json";

/// Summary of one simulation run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Run prefix
    pub prefix: PathBuf,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When teardown finished
    pub finished_at: Option<DateTime<Utc>>,

    /// Whether a simulator process was actually run
    pub simulator_ran: bool,

    /// Simulator exit code, if it exited normally
    pub simulator_exit_code: Option<i32>,

    /// Signal that killed the simulator, if any
    pub simulator_signal: Option<i32>,

    /// Final collector state ("exited", "terminated"), absent if never started
    pub collector: Option<String>,

    /// Sampler iterations completed
    pub samples: usize,
}

impl RunReport {
    /// Starts a report for `prefix`, timestamped now.
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            started_at: Utc::now(),
            finished_at: None,
            simulator_ran: false,
            simulator_exit_code: None,
            simulator_signal: None,
            collector: None,
            samples: 0,
        }
    }

    /// Records the simulator result. `None` means it never ran.
    pub fn record_simulator(&mut self, status: Option<ExitStatus>) {
        let Some(status) = status else {
            return;
        };

        self.simulator_ran = true;
        self.simulator_exit_code = status.code();

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            self.simulator_signal = status.signal();
        }
    }

    /// Records the collector's final state.
    pub fn record_collector(&mut self, state: Option<ProcessState>) {
        self.collector = state.map(|s| s.label().to_string());
    }

    /// Marks the run finished.
    pub fn finish(&mut self, samples: usize) {
        self.samples = samples;
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration, once finished.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        let simulator = match (self.simulator_ran, self.simulator_exit_code, self.simulator_signal) {
            (false, _, _) => "not run".to_string(),
            (true, Some(code), _) => format!("exit code {}", code),
            (true, None, Some(signal)) => format!("killed by signal {}", signal),
            (true, None, None) => "unknown status".to_string(),
        };

        let duration = self
            .duration()
            .map(|d| format!("{:.2}s", d.num_milliseconds() as f64 / 1000.0))
            .unwrap_or_else(|| "in progress".to_string());

        format!(
            "Run Summary:\n  Simulator: {}\n  dstat: {}\n  Memory samples: {}\n  Duration: {}",
            simulator,
            self.collector.as_deref().unwrap_or("not run"),
            self.samples,
            duration
        )
    }

    /// Path of the report file for this run.
    pub fn path(&self) -> PathBuf {
        self.prefix.join(REPORT_FILE)
    }

    /// Writes the report into the prefix.
    pub fn save(&self) -> Result<PathBuf> {
        let path = self.path();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)
            .map_err(|e| SimError::io(format!("failed to write {}", path.display()), e))?;

        info!("Saved run report to {}", path.display());
        Ok(path)
    }

    /// Reads the report saved in `prefix`.
    pub fn load(prefix: &Path) -> Result<Self> {
        let path = prefix.join(REPORT_FILE);
        let content = fs::read_to_string(&path)
            .map_err(|e| SimError::io(format!("failed to read {}", path.display()), e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::tempdir;

    fn exit_status(code: i32) -> ExitStatus {
        Command::new("sh")
            .arg("-c")
            .arg(format!("exit {}", code))
            .status()
            .unwrap()
    }

    #[test]
    fn test_new_report() {
        let report = RunReport::new("/data/run");
        assert!(!report.simulator_ran);
        assert!(report.finished_at.is_none());
        assert!(report.duration().is_none());
        assert_eq!(report.path(), PathBuf::from("/data/run/simulate.json"));
    }

    #[test]
    fn test_record_simulator_none() {
        let mut report = RunReport::new("/data/run");
        report.record_simulator(None);
        assert!(!report.simulator_ran);
        assert!(report.summary().contains("Simulator: not run"));
    }

    #[test]
    fn test_record_simulator_exit_code() {
        let mut report = RunReport::new("/data/run");
        report.record_simulator(Some(exit_status(4)));

        assert!(report.simulator_ran);
        assert_eq!(report.simulator_exit_code, Some(4));
        assert_eq!(report.simulator_signal, None);
        assert!(report.summary().contains("exit code 4"));
    }

    #[test]
    fn test_record_collector() {
        let mut report = RunReport::new("/data/run");
        report.record_collector(None);
        assert!(report.collector.is_none());

        report.record_collector(Some(ProcessState::Terminated(exit_status(0))));
        assert_eq!(report.collector.as_deref(), Some("terminated"));
    }

    #[test]
    fn test_finish_sets_duration() {
        let mut report = RunReport::new("/data/run");
        report.finish(3);

        assert_eq!(report.samples, 3);
        assert!(report.duration().unwrap() >= chrono::Duration::zero());
        assert!(report.summary().contains("Memory samples: 3"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let mut report = RunReport::new(temp_dir.path());
        report.record_simulator(Some(exit_status(0)));
        report.finish(2);

        let path = report.save().unwrap();
        assert!(path.exists());

        let loaded = RunReport::load(temp_dir.path()).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn test_load_missing_report() {
        let temp_dir = tempdir().unwrap();
        assert!(RunReport::load(temp_dir.path()).is_err());
    }
}
