//! Simulation Orchestrator
//!
//! Sequences one run:
//! 1. Start `dstat` in the background (if available)
//! 2. Start the memory sampler thread
//! 3. Run the simulator to completion
//! 4. Stop `dstat`, stop and join the sampler
//! 5. Save the run report

use std::path::PathBuf;
use std::time::Duration;

use log::info;

use crate::config::RunConfig;
use crate::environment::ToolPaths;
use crate::error::Result;
use crate::monitoring::{start_collector, PeriodicSampler, RunReport, DEFAULT_SAMPLE_INTERVAL};

use super::process::cleanup_process;
use super::simulator::run_simulator;

/// Runs a simulation and its monitors.
///
/// # Example
///
/// ```rust,no_run
/// use simrunner::config::RunConfig;
/// use simrunner::execution::Orchestrator;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = RunConfig::new("/data/tornet-0.01").with_simulator("/usr/local/bin/shadow");
///     let report = Orchestrator::new(config).run()?;
///     println!("{}", report.summary());
///     Ok(())
/// }
/// ```
pub struct Orchestrator {
    config: RunConfig,
    tools: ToolPaths,
    sample_interval: Duration,
    save_report: bool,
}

impl Orchestrator {
    /// Creates an orchestrator, resolving monitoring tools from `PATH`.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            tools: ToolPaths::discover(),
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            save_report: true,
        }
    }

    /// Replaces the monitoring tools.
    pub fn set_tools(&mut self, tools: ToolPaths) {
        self.tools = tools;
    }

    /// Sets the time between memory samples.
    pub fn set_sample_interval(&mut self, interval: Duration) {
        self.sample_interval = interval;
    }

    /// Enables or disables writing `simulate.json`.
    pub fn set_save_report(&mut self, save: bool) {
        self.save_report = save;
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Executes the run.
    ///
    /// A missing simulator is not an error: the monitors still start and
    /// stop, and the report records that nothing was simulated. The
    /// simulator's exit status is recorded but never turned into an error.
    ///
    /// # Returns
    ///
    /// * `Ok(report)` - The run finished and all monitors were torn down
    /// * `Err` - Invalid configuration, or a log file could not be written
    pub fn run(&self) -> Result<RunReport> {
        self.config.validate()?;

        let prefix: PathBuf = self.config.prefix.clone();
        let mut report = RunReport::new(&prefix);

        info!("Starting a simulation from prefix {}", prefix.display());

        info!("Starting dstat");
        let mut collector = start_collector(&prefix, self.tools.dstat());

        info!("Starting free loop");
        let sampler = match PeriodicSampler::new(&prefix, &self.tools)
            .with_interval(self.sample_interval)
            .start()
        {
            Ok(sampler) => sampler,
            Err(e) => {
                cleanup_process(collector.as_mut());
                return Err(e);
            }
        };

        info!("Starting shadow");
        let simulated = run_simulator(&self.config);

        info!("Cleaning up");
        report.record_collector(cleanup_process(collector.as_mut()));
        let sampled = sampler.stop();

        let status = simulated?;
        let samples = sampled?;

        if let Some(status) = status {
            info!("Done simulating; shadow returned {}", status);
        }
        report.record_simulator(status);
        report.finish(samples);

        if self.save_report {
            report.save()?;
        }

        Ok(report)
    }
}
