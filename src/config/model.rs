//! Run Configuration Model
//!
//! The immutable description of a single simulation run.
//!
//! # Example YAML Format
//!
//! ```yaml
//! prefix: /data/tornet-0.01
//! simulator: /home/user/.local/bin/shadow
//! simulator_args: --parallelism=8 --seed=42
//! use_realtime: false
//! compress: true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Simulator option naming the directory its data is copied from.
pub const TEMPLATE_DIRECTORY_OPTION: &str = "--template-directory";

/// Arguments passed to the simulator when none are configured.
pub const DEFAULT_SIMULATOR_ARGS: &str =
    "--parallelism=1 --seed=1 --template-directory=shadow.data.template";

/// Configuration for a single simulation run.
///
/// Built once at start-up and read-only for the rest of the run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Run prefix; every log file of the run is written here
    pub prefix: PathBuf,

    /// Resolved simulator executable; `None` means the run skips the simulator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulator: Option<PathBuf>,

    /// Extra arguments for the simulator, split with shell quoting rules
    #[serde(default = "default_simulator_args")]
    pub simulator_args: String,

    /// Wrap the simulator with a FIFO real-time priority launcher
    #[serde(default)]
    pub use_realtime: bool,

    /// Write the simulator log xz-compressed
    #[serde(default)]
    pub compress: bool,
}

fn default_simulator_args() -> String {
    DEFAULT_SIMULATOR_ARGS.to_string()
}

impl RunConfig {
    /// Creates a configuration for `prefix` with default settings and no simulator.
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            simulator: None,
            simulator_args: default_simulator_args(),
            use_realtime: false,
            compress: false,
        }
    }

    /// Sets the simulator executable path.
    pub fn with_simulator(mut self, path: impl Into<PathBuf>) -> Self {
        self.simulator = Some(path.into());
        self
    }

    /// Replaces the extra simulator arguments.
    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.simulator_args = args.into();
        self
    }

    /// Enables or disables real-time scheduling.
    pub fn with_realtime(mut self, enabled: bool) -> Self {
        self.use_realtime = enabled;
        self
    }

    /// Enables or disables compression of the simulator log.
    pub fn with_compress(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Returns the run prefix.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Splits the extra simulator arguments into words.
    ///
    /// Quoting follows POSIX shell rules, so `--x="a b"` stays one word.
    pub fn split_args(&self) -> Result<Vec<String>> {
        shlex::split(&self.simulator_args)
            .ok_or_else(|| SimError::InvalidArguments(self.simulator_args.clone()))
    }

    /// Returns true if the user arguments already choose a template directory.
    pub fn has_template_directory(&self) -> Result<bool> {
        Ok(self
            .split_args()?
            .iter()
            .any(|arg| is_template_directory_arg(arg)))
    }

    /// Checks that the configuration can be used for a run.
    pub fn validate(&self) -> Result<()> {
        if !self.prefix.is_dir() {
            return Err(SimError::InvalidPrefix(self.prefix.clone()));
        }
        self.split_args()?;
        Ok(())
    }
}

/// Matches both `--template-directory DIR` and `--template-directory=DIR`.
fn is_template_directory_arg(arg: &str) -> bool {
    arg == TEMPLATE_DIRECTORY_OPTION
        || arg
            .strip_prefix(TEMPLATE_DIRECTORY_OPTION)
            .is_some_and(|rest| rest.starts_with('='))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_uses_defaults() {
        let config = RunConfig::new("/tmp/run");
        assert_eq!(config.prefix(), Path::new("/tmp/run"));
        assert!(config.simulator.is_none());
        assert_eq!(config.simulator_args, DEFAULT_SIMULATOR_ARGS);
        assert!(!config.use_realtime);
        assert!(!config.compress);
    }

    #[test]
    fn test_builder_methods() {
        let config = RunConfig::new("/tmp/run")
            .with_simulator("/opt/shadow/bin/shadow")
            .with_args("--seed=7")
            .with_realtime(true)
            .with_compress(true);

        assert_eq!(config.simulator, Some(PathBuf::from("/opt/shadow/bin/shadow")));
        assert_eq!(config.simulator_args, "--seed=7");
        assert!(config.use_realtime);
        assert!(config.compress);
    }

    #[test]
    fn test_split_args_respects_quotes() {
        let config = RunConfig::new("/tmp").with_args("--seed=1 --log-level 'info debug'");
        let args = config.split_args().unwrap();
        assert_eq!(args, vec!["--seed=1", "--log-level", "info debug"]);
    }

    #[test]
    fn test_split_args_unbalanced_quote() {
        let config = RunConfig::new("/tmp").with_args("--seed='1");
        assert!(matches!(
            config.split_args(),
            Err(SimError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_split_args_empty() {
        let config = RunConfig::new("/tmp").with_args("");
        assert!(config.split_args().unwrap().is_empty());
    }

    #[test]
    fn test_has_template_directory_default_args() {
        let config = RunConfig::new("/tmp");
        assert!(config.has_template_directory().unwrap());
    }

    #[test]
    fn test_has_template_directory_separate_value() {
        let config = RunConfig::new("/tmp").with_args("--template-directory my.template");
        assert!(config.has_template_directory().unwrap());
    }

    #[test]
    fn test_has_template_directory_absent() {
        let config = RunConfig::new("/tmp").with_args("--parallelism=4");
        assert!(!config.has_template_directory().unwrap());
    }

    #[test]
    fn test_template_directory_lookalike_not_matched() {
        let config = RunConfig::new("/tmp").with_args("--template-directory-extra=x");
        assert!(!config.has_template_directory().unwrap());
    }

    #[test]
    fn test_validate_existing_prefix() {
        let temp_dir = tempdir().unwrap();
        let config = RunConfig::new(temp_dir.path());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_prefix() {
        let config = RunConfig::new("/nonexistent/run/prefix");
        assert!(matches!(config.validate(), Err(SimError::InvalidPrefix(_))));
    }

    #[test]
    fn test_validate_prefix_is_file() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("not_a_dir");
        std::fs::write(&file, "x").unwrap();

        let config = RunConfig::new(&file);
        assert!(matches!(config.validate(), Err(SimError::InvalidPrefix(_))));
    }
}
