//! SimRunner CLI Entry Point
//!
//! # Usage
//!
//! ```bash
//! # Run the simulation prepared in a prefix
//! simrunner /data/tornet-0.01
//!
//! # Custom simulator arguments, real-time scheduling, compressed log
//! simrunner /data/tornet-0.01 --args "--parallelism=8 --seed=3" --use-realtime --compress
//!
//! # Settings from a YAML file
//! simrunner --config run.yaml
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info, warn};

use simrunner::config::{load_run_config, RunConfig};
use simrunner::environment::{find_executable, SIMULATOR_NAME};
use simrunner::execution::Orchestrator;
use simrunner::{APP_NAME, VERSION};

/// Command-line options. `None` means "not given on the command line".
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    prefix: Option<PathBuf>,
    simulator_args: Option<String>,
    simulator: Option<PathBuf>,
    config_path: Option<PathBuf>,
    use_realtime: bool,
    compress: bool,
    verbose: bool,
    quiet: bool,
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: simrunner [OPTIONS] <PREFIX>");
    println!();
    println!("Arguments:");
    println!("  <PREFIX>            Directory holding shadow.config.yaml; logs are written here");
    println!();
    println!("Options:");
    println!("  -a, --args ARGS     Extra simulator arguments");
    println!("                      (default: \"{}\")", simrunner::config::DEFAULT_SIMULATOR_ARGS);
    println!("  --shadow PATH       Simulator executable (default: '{}' on PATH)", SIMULATOR_NAME);
    println!("  --use-realtime      Run the simulator with real-time FIFO priority");
    println!("  --compress          Write shadow.log xz-compressed");
    println!("  --config FILE       Load run settings from a YAML file");
    println!("  -v, --verbose       Enable debug logging");
    println!("  -q, --quiet         Only log warnings and errors");
    println!("  -h, --help          Show this help message");
    println!("  -V, --version       Show version information");
}

/// Parses command-line arguments.
fn parse_arguments(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--use-realtime" => cli.use_realtime = true,
            "--compress" => cli.compress = true,
            "--verbose" | "-v" => cli.verbose = true,
            "--quiet" | "-q" => cli.quiet = true,
            "--args" | "-a" => {
                i += 1;
                let value = args.get(i).ok_or("--args requires a value")?;
                cli.simulator_args = Some(value.clone());
            }
            "--shadow" => {
                i += 1;
                let value = args.get(i).ok_or("--shadow requires a path argument")?;
                cli.simulator = Some(PathBuf::from(value));
            }
            "--config" => {
                i += 1;
                let value = args.get(i).ok_or("--config requires a path argument")?;
                cli.config_path = Some(PathBuf::from(value));
            }
            arg if arg.starts_with("--args=") => {
                cli.simulator_args = Some(arg["--args=".len()..].to_string());
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                if cli.prefix.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                cli.prefix = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    if cli.prefix.is_none() && cli.config_path.is_none() {
        return Err("A run prefix is required".to_string());
    }

    Ok(cli)
}

/// Builds the run configuration from the optional file and the flags.
///
/// Flags win over file values. The simulator falls back to `shadow` on
/// `PATH`; not finding it is allowed.
fn build_config(cli: CliArgs) -> Result<RunConfig, Box<dyn std::error::Error>> {
    let mut config = match (&cli.config_path, &cli.prefix) {
        (Some(path), _) => load_run_config(path)?,
        (None, Some(prefix)) => RunConfig::new(prefix),
        (None, None) => return Err("A run prefix is required".into()),
    };

    if let Some(prefix) = cli.prefix {
        config.prefix = prefix;
    }
    if let Some(args) = cli.simulator_args {
        config.simulator_args = args;
    }
    config.use_realtime |= cli.use_realtime;
    config.compress |= cli.compress;

    let requested = cli.simulator.or(config.simulator.take());
    config.simulator = match requested {
        Some(path) => {
            let resolved = find_executable(&path.to_string_lossy());
            if resolved.is_none() {
                warn!("Simulator not found at {}", path.display());
            }
            resolved
        }
        None => find_executable(SIMULATOR_NAME),
    };

    Ok(config)
}

/// Main application entry point.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let cli = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    setup_logging(cli.verbose, cli.quiet);
    info!("{} v{}", APP_NAME, VERSION);

    let config = build_config(cli)?;
    if let Some(ref simulator) = config.simulator {
        info!("Simulator: {}", simulator.display());
    }

    let report = Orchestrator::new(config).run().map_err(|e| {
        error!("Simulation run failed: {}", e);
        e
    })?;

    info!("{}", report.summary());
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
