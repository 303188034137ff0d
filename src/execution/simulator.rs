//! Simulator Invocation
//!
//! Builds the simulator command line and runs it to completion with its
//! standard output captured in the run prefix.

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use log::{debug, info, warn};
use xz2::write::XzEncoder;

use crate::config::RunConfig;
use crate::error::{Result, SimError};

/// File the simulator's standard output is written to.
pub const SIMULATOR_LOG: &str = "shadow.log";

/// Simulator configuration file, relative to the prefix.
pub const SIMULATOR_CONFIG: &str = "shadow.config.yaml";

/// Appended unless the user already picked a template directory.
pub const DEFAULT_TEMPLATE_DIRECTORY_ARG: &str = "--template-directory=shadow.data.template";

/// Launcher used for real-time scheduling.
pub const REALTIME_LAUNCHER: &str = "/usr/bin/chrt";

/// FIFO policy, priority 1.
pub const REALTIME_ARGS: &[&str] = &["-f", "1"];

/// xz preset used for compressed logs.
const XZ_PRESET: u32 = 6;

/// Returns the simulator log path for a run.
pub fn simulator_log_path(config: &RunConfig) -> PathBuf {
    if config.compress {
        config.prefix.join(format!("{}.xz", SIMULATOR_LOG))
    } else {
        config.prefix.join(SIMULATOR_LOG)
    }
}

/// Builds the full simulator argv, launcher included.
///
/// Shape: `[chrt -f 1] <simulator> <user args> [--template-directory=...] shadow.config.yaml`
pub fn build_command_line(config: &RunConfig, simulator: &Path) -> Result<Vec<OsString>> {
    let user_args = config.split_args()?;
    let mut argv: Vec<OsString> = Vec::with_capacity(user_args.len() + 6);

    if config.use_realtime {
        argv.push(REALTIME_LAUNCHER.into());
        argv.extend(REALTIME_ARGS.iter().map(|arg| OsString::from(*arg)));
    }

    argv.push(simulator.as_os_str().to_owned());
    argv.extend(user_args.into_iter().map(OsString::from));

    if !config.has_template_directory()? {
        argv.push(DEFAULT_TEMPLATE_DIRECTORY_ARG.into());
    }

    argv.push(SIMULATOR_CONFIG.into());
    Ok(argv)
}

/// Runs the simulator and blocks until it exits.
///
/// Returns `Ok(None)` when there is no simulator to run or it could not
/// be started; both are logged as warnings. Only log file failures are
/// returned as errors.
pub fn run_simulator(config: &RunConfig) -> Result<Option<ExitStatus>> {
    let Some(simulator) = config.simulator.as_deref() else {
        warn!("Cannot find shadow in your PATH. Is shadow installed (e.g., in ~/.local/bin)? Did you update your PATH?");
        warn!("Unable to run simulation without shadow.");
        return Ok(None);
    };

    let argv = build_command_line(config, simulator)?;
    let log_path = simulator_log_path(config);

    let log_file = File::create(&log_path)
        .map_err(|e| SimError::io(format!("failed to create {}", log_path.display()), e))?;

    debug!("Running simulator: {}", display_argv(&argv));
    info!("Writing simulator output to {}", log_path.display());

    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]).current_dir(&config.prefix);

    if config.compress {
        run_compressed(&mut command, log_file, &log_path)
    } else {
        command.stdout(Stdio::from(log_file));
        let Some(mut child) = spawn_simulator(&mut command, simulator) else {
            return Ok(None);
        };
        let status = child
            .wait()
            .map_err(|e| SimError::io("failed to wait for simulator", e))?;
        Ok(Some(status))
    }
}

/// Pipes the simulator's stdout through an xz encoder into `log_file`.
fn run_compressed(
    command: &mut Command,
    log_file: File,
    log_path: &Path,
) -> Result<Option<ExitStatus>> {
    command.stdout(Stdio::piped());
    let program = PathBuf::from(command.get_program());
    let Some(mut child) = spawn_simulator(command, &program) else {
        return Ok(None);
    };

    let mut encoder = XzEncoder::new(log_file, XZ_PRESET);
    let copied = match child.stdout.take() {
        Some(mut stdout) => io::copy(&mut stdout, &mut encoder),
        None => Ok(0),
    };
    let finished = encoder.finish();

    // Reap the child before reporting any write failure.
    let status = child.wait();

    let bytes = copied
        .map_err(|e| SimError::io(format!("failed to write {}", log_path.display()), e))?;
    finished.map_err(|e| SimError::io(format!("failed to finish {}", log_path.display()), e))?;
    debug!("Compressed {} bytes of simulator output", bytes);

    let status = status.map_err(|e| SimError::io("failed to wait for simulator", e))?;
    Ok(Some(status))
}

fn spawn_simulator(command: &mut Command, simulator: &Path) -> Option<Child> {
    match command.spawn() {
        Ok(child) => {
            info!("Simulator started (pid {})", child.id());
            Some(child)
        }
        Err(e) => {
            warn!("Failed to start {}: {}", simulator.display(), e);
            warn!("Unable to run simulation without shadow.");
            None
        }
    }
}

fn display_argv(argv: &[OsString]) -> String {
    argv.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
