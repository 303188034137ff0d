//! Run Configuration Module
//!
//! - [`model`]: The [`RunConfig`] data structure
//! - [`parser`]: YAML loading

pub mod model;
pub mod parser;

pub use model::{RunConfig, DEFAULT_SIMULATOR_ARGS, TEMPLATE_DIRECTORY_OPTION};
pub use parser::load_run_config;
