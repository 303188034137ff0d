//! Run Configuration Loading
//!
//! Reads a [`RunConfig`] from a YAML file. Fields other than `prefix`
//! fall back to their defaults when omitted.

use std::fs;
use std::path::Path;

use log::{debug, info};

use super::model::RunConfig;
use crate::error::{Result, SimError};

/// Loads a run configuration from a YAML file.
///
/// A relative `prefix` inside the file is resolved against the directory
/// containing the file.
///
/// # Example
///
/// ```rust,no_run
/// use simrunner::config::load_run_config;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = load_run_config("run.yaml")?;
///     println!("Prefix: {}", config.prefix.display());
///     Ok(())
/// }
/// ```
pub fn load_run_config(path: impl AsRef<Path>) -> Result<RunConfig> {
    let path = path.as_ref();
    info!("Loading run configuration from: {}", path.display());

    let yaml_content = fs::read_to_string(path).map_err(|e| {
        SimError::Config(format!(
            "Failed to read '{}': {}. Check that the file exists and is readable.",
            path.display(),
            e
        ))
    })?;

    debug!("YAML content loaded ({} bytes)", yaml_content.len());

    parse_run_config(&yaml_content, path.parent())
}

/// Parses a run configuration from YAML text.
pub fn parse_run_config(yaml_content: &str, base_dir: Option<&Path>) -> Result<RunConfig> {
    let mut config: RunConfig = serde_yaml::from_str(yaml_content)
        .map_err(|e| SimError::Config(format!("Failed to parse YAML: {}", e)))?;

    if config.prefix.is_relative() {
        if let Some(base) = base_dir.filter(|b| !b.as_os_str().is_empty()) {
            config.prefix = base.join(&config.prefix);
        }
    }

    Ok(config)
}

/// Serializes a run configuration back to YAML.
pub fn to_yaml(config: &RunConfig) -> Result<String> {
    serde_yaml::to_string(config).map_err(|e| SimError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::DEFAULT_SIMULATOR_ARGS;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_run_config("prefix: /data/run1\n", None).unwrap();
        assert_eq!(config.prefix, PathBuf::from("/data/run1"));
        assert!(config.simulator.is_none());
        assert_eq!(config.simulator_args, DEFAULT_SIMULATOR_ARGS);
        assert!(!config.use_realtime);
        assert!(!config.compress);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
prefix: /data/run2
simulator: /opt/shadow/bin/shadow
simulator_args: "--parallelism=8 --seed=3"
use_realtime: true
compress: true
"#;
        let config = parse_run_config(yaml, None).unwrap();
        assert_eq!(config.simulator, Some(PathBuf::from("/opt/shadow/bin/shadow")));
        assert_eq!(config.simulator_args, "--parallelism=8 --seed=3");
        assert!(config.use_realtime);
        assert!(config.compress);
    }

    #[test]
    fn test_parse_missing_prefix_fails() {
        let result = parse_run_config("compress: true\n", None);
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn test_relative_prefix_resolved_against_file_dir() {
        let config = parse_run_config("prefix: run3\n", Some(Path::new("/configs"))).unwrap();
        assert_eq!(config.prefix, PathBuf::from("/configs/run3"));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("run.yaml");
        fs::write(&path, "prefix: sim\ncompress: true\n").unwrap();

        let config = load_run_config(&path).unwrap();
        assert_eq!(config.prefix, temp_dir.path().join("sim"));
        assert!(config.compress);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_run_config("/nonexistent/run.yaml");
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn test_yaml_roundtrip_preserves_fields() {
        let config = RunConfig::new("/data/run4")
            .with_simulator("/usr/local/bin/shadow")
            .with_compress(true);

        let yaml = to_yaml(&config).unwrap();
        let loaded = parse_run_config(&yaml, None).unwrap();
        assert_eq!(loaded, config);
    }
}
