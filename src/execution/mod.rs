//! Simulation Execution Module
//!
//! Runs the simulator and owns the lifecycle of every process a run
//! starts.
//!
//! # Architecture
//!
//! - [`engine`]: The orchestrator sequencing a whole run
//! - [`simulator`]: Simulator command line and invocation
//! - [`process`]: Handles for spawned processes and their cleanup

pub mod engine;
pub mod process;
pub mod simulator;

pub use engine::Orchestrator;
pub use process::{cleanup_process, ProcessHandle, ProcessState};
