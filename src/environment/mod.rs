//! Environment Module
//!
//! Resolution of the external executables a run depends on.

pub mod tools;

pub use tools::{find_executable, ToolPaths, SIMULATOR_NAME};
