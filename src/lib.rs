//! SimRunner - Shadow Simulation Runner
//!
//! Launches a Shadow network simulation inside a run prefix and records
//! how the host held up while it ran: `free` output once a second in
//! `free.log` and a continuous `dstat` capture in `dstat.log`.
//!
//! # Architecture
//!
//! - [`config`]: Run configuration and YAML loading
//! - [`execution`]: Orchestrator, simulator invocation, process handles
//! - [`environment`]: Resolution of external tools on `PATH`
//! - [`monitoring`]: Memory sampler, `dstat` collector, run report
//!
//! # Example
//!
//! ```rust,no_run
//! use simrunner::config::RunConfig;
//! use simrunner::execution::Orchestrator;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::new("/data/tornet-0.01")
//!         .with_simulator("/usr/local/bin/shadow")
//!         .with_compress(true);
//!
//!     let report = Orchestrator::new(config).run()?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod execution;
pub mod monitoring;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use config::{load_run_config, RunConfig};
pub use error::SimError;
pub use execution::Orchestrator;
pub use monitoring::RunReport;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "SimRunner";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_app_name() {
        assert_eq!(APP_NAME, "SimRunner");
    }

    #[test]
    fn test_module_exports_config() {
        let config = RunConfig::new("/data/run");
        assert!(config.simulator.is_none());
    }
}
