//! Monitoring Module
//!
//! Everything that watches the machine while the simulator runs.
//!
//! # Components
//!
//! - [`PeriodicSampler`]: `date` + `free` once per interval into `free.log`
//! - [`start_collector`]: background `dstat` writing `dstat.log`
//! - [`StopSignal`]: tells the sampler thread to finish
//! - [`RunReport`]: what happened, saved as `simulate.json`

pub mod collector;
pub mod report;
pub mod sampler;
pub mod signal;

pub use collector::{start_collector, COLLECTOR_LOG};
pub use report::{RunReport, REPORT_FILE};
pub use sampler::{PeriodicSampler, RunningSampler, DEFAULT_SAMPLE_INTERVAL, SAMPLER_LOG};
pub use signal::StopSignal;
