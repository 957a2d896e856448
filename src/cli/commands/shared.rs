//! Shared components for CLI commands
//!
//! This module contains logging setup and configuration loading used by
//! every command implementation.

use crate::cli::args::ProcessArgs;
use crate::config::Config;
use crate::Result;
use tracing::{debug, info};

/// Set up structured logging
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn setup_logging(level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mmp_processor={}", level)));

    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", level);
    Ok(())
}

/// Load configuration using layered approach (file -> env -> args)
pub fn load_configuration(args: &ProcessArgs) -> Result<Config> {
    let default_config_path = if args.config_file.is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => {
            // Try default config file location
            default_config_path
                .as_ref()
                .filter(|path| path.exists())
                .map(|path| path.as_path())
        }
    };

    let mut config = Config::load_layered(config_file)?;

    // Apply CLI argument overrides
    apply_cli_overrides(&mut config, args);

    // Final validation
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &ProcessArgs) {
    if let Some(code) = args.backtrack_code {
        config.processing.backtrack_processing_flag = code;
    }

    if args.sequential {
        config.performance.parallel = false;
    }
    if let Some(workers) = args.workers {
        config.performance.workers = workers;
    }

    if let Some(level) = args.get_log_level() {
        config.logging.level = level.to_string();
    }
}

/// Report where configuration came from once logging is running
pub fn log_configuration_source(args: &ProcessArgs, config: &Config) {
    match &args.config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => match Config::default_config_path() {
            Ok(path) if path.exists() => info!("Using config file: {}", path.display()),
            _ => info!("No config file found, using defaults and environment variables"),
        },
    }
    debug!("Effective configuration: {:?}", config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{Args, Commands};
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn process_args(extra: &[&str]) -> ProcessArgs {
        let mut argv = vec!["mmp-processor", "process", "-i", "in.json", "-o", "out.json"];
        argv.extend_from_slice(extra);
        match Args::try_parse_from(argv).unwrap().command {
            Some(Commands::Process(args)) => args,
            other => panic!("expected process command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_overrides_applied() {
        let args = process_args(&["--backtrack-code", "1", "--sequential", "-j", "3", "-vv"]);
        let mut config = Config::default();

        apply_cli_overrides(&mut config, &args);

        assert_eq!(config.processing.backtrack_processing_flag, 1);
        assert!(!config.performance.parallel);
        assert_eq!(config.performance.workers, 3);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let args = process_args(&[]);
        let mut config = Config::default();
        config.logging.level = "warn".to_string();
        let expected = config.clone();

        apply_cli_overrides(&mut config, &args);

        assert_eq!(config, expected);
    }

    #[test]
    fn test_load_configuration_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[quality_control]\nctd_pressure_npts_min = 42\n\n[processing]\nbacktrack_processing_flag = 3"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let args = process_args(&["--config", &path, "--backtrack-code", "1"]);

        let config = load_configuration(&args).unwrap();

        assert_eq!(config.quality_control.ctd_pressure_npts_min, 42);
        // CLI wins over the file
        assert_eq!(config.processing.backtrack_processing_flag, 1);
    }
}
