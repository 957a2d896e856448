//! Command implementations for the MMP processor CLI
//!
//! Each command is implemented in its own module:
//! - `process`: Mask reconciliation and QC pipeline with JSON output
//! - `summarize`: Per-profile coverage and status listing

pub mod process;
pub mod shared;
pub mod summarize;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner for the MMP processor
///
/// Dispatches to the appropriate subcommand handler. Without a subcommand
/// nothing is run; `main` prints help before getting here.
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Process(process_args)) => {
            process::run_process(process_args).await.map(|_| ())
        }
        Some(Commands::Summarize(summarize_args)) => {
            summarize::run_summarize(summarize_args).await
        }
        None => Ok(()),
    }
}
