//! Command-line argument definitions for the MMP processor
//!
//! This module defines the complete CLI interface using clap derive API.

use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the moored profiler processor
///
/// Reconciles CTD and engineering masks of imported MMP deployments and voids
/// profiles that fail minimum coverage checks.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mmp-processor",
    version,
    about = "Reconcile and quality-control McLane Moored Profiler deployments",
    long_about = "Processes imported McLane Moored Profiler deployments: flags backtrack episodes \
                  in the engineering stream, synchronizes the CTD and engineering good-data masks, \
                  propagates CTD pressure onto the engineering stream and voids profiles that are \
                  too short or too shallow. Every step is recorded in each profile's provenance trail."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the MMP processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the mask reconciliation and QC pipeline on a deployment
    Process(ProcessArgs),
    /// Print per-profile mask coverage and status of a deployment
    Summarize(SummarizeArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Deployment JSON file produced by the importer
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        help = "Input deployment JSON file"
    )]
    pub input_path: PathBuf,

    /// Destination for the processed deployment
    ///
    /// Parent directories are created if they don't exist.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output path for the processed deployment JSON"
    )]
    pub output_path: PathBuf,

    /// Optional processing report with stats and per-profile status trails
    #[arg(
        short = 'r',
        long = "report",
        value_name = "FILE",
        help = "Write a JSON processing report"
    )]
    pub report_path: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// ~/.config/mmp-processor/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Backtrack policy code
    ///
    /// 1 flags the entire profile bad, 2 flags data from shortly before the
    /// first backtrack onwards, 3 flags only zero-pressure samples.
    #[arg(
        short = 'b',
        long = "backtrack-code",
        value_name = "CODE",
        help = "Backtrack processing code (1, 2 or 3)"
    )]
    pub backtrack_code: Option<i32>,

    /// Process profiles one at a time instead of on a worker pool
    #[arg(long = "sequential", help = "Disable parallel profile processing")]
    pub sequential: bool,

    /// Number of parallel workers
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of parallel workers (defaults to CPU count)"
    )]
    pub workers: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Hide progress bars
    #[arg(long = "no-progress", help = "Disable progress bars")]
    pub no_progress: bool,
}

/// Arguments for the summarize command
#[derive(Debug, Clone, Parser)]
pub struct SummarizeArgs {
    /// Deployment JSON file to summarize
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        help = "Deployment JSON file to summarize"
    )]
    pub input_path: PathBuf,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input_path.exists() {
            return Err(Error::file_not_found(self.input_path.display().to_string()));
        }

        if !self.input_path.is_file() {
            return Err(Error::configuration(format!(
                "Input path is not a file: {}",
                self.input_path.display()
            )));
        }

        if self.output_path == self.input_path {
            return Err(Error::configuration(
                "Output path must differ from the input path",
            ));
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(Error::configuration(
                    "Number of workers must be greater than 0",
                ));
            }
            if workers > 256 {
                return Err(Error::configuration("Number of workers cannot exceed 256"));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Log level requested by verbosity flags, `None` to use the configured level
    pub fn get_log_level(&self) -> Option<&'static str> {
        if self.quiet {
            Some("error")
        } else {
            match self.verbose {
                0 => None,
                1 => Some("info"),
                2 => Some("debug"),
                _ => Some("trace"),
            }
        }
    }

    /// Check if we should show progress bars
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

impl SummarizeArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    fn process_args(args: &[&str]) -> ProcessArgs {
        match parse(args).command {
            Some(Commands::Process(process_args)) => process_args,
            other => panic!("expected process command, got {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let args = parse(&["mmp-processor"]);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_process_args_parsing() {
        let args = process_args(&[
            "mmp-processor",
            "process",
            "--input",
            "in.json",
            "--output",
            "out.json",
            "--backtrack-code",
            "3",
            "--sequential",
            "-j",
            "2",
            "-vv",
        ]);

        assert_eq!(args.input_path, PathBuf::from("in.json"));
        assert_eq!(args.output_path, PathBuf::from("out.json"));
        assert_eq!(args.backtrack_code, Some(3));
        assert!(args.sequential);
        assert_eq!(args.workers, Some(2));
        assert_eq!(args.get_log_level(), Some("debug"));
        assert!(args.show_progress());
        assert!(args.report_path.is_none());
    }

    #[test]
    fn test_process_requires_input_and_output() {
        assert!(Args::try_parse_from(["mmp-processor", "process", "-i", "in.json"]).is_err());
        assert!(Args::try_parse_from(["mmp-processor", "process", "-o", "out.json"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result =
            Args::try_parse_from(["mmp-processor", "process", "-i", "a", "-o", "b", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_mapping() {
        let quiet = process_args(&["mmp-processor", "process", "-i", "a", "-o", "b", "-q"]);
        assert_eq!(quiet.get_log_level(), Some("error"));
        assert!(!quiet.show_progress());

        let default = process_args(&["mmp-processor", "process", "-i", "a", "-o", "b"]);
        assert_eq!(default.get_log_level(), None);

        let no_progress =
            process_args(&["mmp-processor", "process", "-i", "a", "-o", "b", "--no-progress"]);
        assert!(!no_progress.show_progress());
    }

    #[test]
    fn test_validate_missing_input() {
        let args = process_args(&[
            "mmp-processor",
            "process",
            "-i",
            "/nonexistent/deployment.json",
            "-o",
            "out.json",
        ]);
        assert!(matches!(
            args.validate().unwrap_err(),
            Error::FileNotFound { .. }
        ));
    }

    #[test]
    fn test_validate_workers() {
        let mut input = NamedTempFile::new().unwrap();
        writeln!(input, "{{}}").unwrap();
        let path = input.path().to_str().unwrap().to_string();

        let mut args = process_args(&["mmp-processor", "process", "-i", &path, "-o", "out.json"]);
        assert!(args.validate().is_ok());

        args.workers = Some(0);
        assert!(args.validate().is_err());

        args.workers = Some(4);
        args.output_path = args.input_path.clone();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_summarize_args() {
        let args = parse(&["mmp-processor", "summarize", "--input", "d.json", "-v"]);
        match args.command {
            Some(Commands::Summarize(summarize)) => {
                assert_eq!(summarize.input_path, PathBuf::from("d.json"));
                assert_eq!(summarize.get_log_level(), "info");
            }
            other => panic!("expected summarize command, got {:?}", other),
        }
    }
}
