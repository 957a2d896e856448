//! Process command implementation for the MMP processor CLI
//!
//! Loads a deployment, runs the profile pipeline on a blocking worker thread
//! and writes the processed deployment plus an optional JSON report.

use super::shared::{load_configuration, log_configuration_source, setup_logging};
use crate::app::services::deployment_io::{
    ProcessingReport, load_deployment, save_deployment, save_report,
};
use crate::app::services::profile_processor::{ProcessingStats, ProfileProcessor};
use crate::cli::args::ProcessArgs;
use crate::{Error, Result};
use colored::*;
use indicatif::HumanDuration;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Process command runner
///
/// 1. Load configuration and set up logging
/// 2. Validate inputs and load the deployment
/// 3. Run flag -> sync -> quality filter
/// 4. Write outputs and print a summary
pub async fn run_process(args: ProcessArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    let config = load_configuration(&args)?;
    setup_logging(&config.logging.level, args.quiet)?;
    log_configuration_source(&args, &config);

    info!("Starting MMP processor");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let deployment = load_deployment(&args.input_path).await?;

    // The pipeline is CPU-bound; keep it off the async executor
    let processor = ProfileProcessor::new(config.clone());
    let show_progress = args.show_progress();
    let result = tokio::task::spawn_blocking(move || processor.process(deployment, show_progress))
        .await
        .map_err(|e| Error::processing_interrupted(format!("Processing task failed: {}", e)))??;

    save_deployment(&args.output_path, &result.deployment).await?;

    if let Some(report_path) = &args.report_path {
        let report = ProcessingReport::new(&result, &config);
        save_report(report_path, &report).await?;
        info!("Processing report written to {}", report_path.display());
    }

    if !args.quiet {
        print_summary(&args, &result.stats, start_time.elapsed());
    }

    Ok(result.stats)
}

/// Print a human-readable summary to stdout
fn print_summary(args: &ProcessArgs, stats: &ProcessingStats, elapsed: Duration) {
    println!("\n{}", "MMP Processing Complete".bright_green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "  {} {} ({} processable)",
        "Profiles:".bright_cyan(),
        stats.total_profiles.to_string().bright_white().bold(),
        stats.processable_profiles
    );
    println!(
        "  {} {} flagged, {} without pressure data",
        "Backtrack:".bright_cyan(),
        stats.backtrack_flagged,
        stats.backtrack_not_flagged
    );
    println!(
        "  {} {} synced ({:.1}%)",
        "Sync:".bright_cyan(),
        stats.synced,
        stats.sync_rate()
    );
    println!(
        "  {} {} ENG, {} CTD",
        "Voided:".bright_cyan(),
        stats.eng_quality.voided_count(),
        stats.ctd_quality.voided_count()
    );
    println!(
        "  {} {}",
        "Processing time:".bright_cyan(),
        HumanDuration(elapsed)
    );

    if !stats.illegal_backtrack_codes.is_empty() {
        println!(
            "{} illegal backtrack code, {} profiles left unflagged",
            "Warning:".bright_yellow().bold(),
            stats.illegal_backtrack_codes.len()
        );
    }
    if !stats.timing_faults.is_empty() {
        println!(
            "{} CTD timing faults in profiles {:?}",
            "Warning:".bright_yellow().bold(),
            stats.timing_faults
        );
    }
    if !stats.not_synced.is_empty() {
        println!(
            "{} {} profiles had an empty stream: {:?}",
            "Note:".bright_yellow(),
            stats.not_synced.len(),
            stats.not_synced
        );
    }

    println!(
        "\n  {} {}",
        "Output:".bright_cyan(),
        args.output_path.display()
    );
    if let Some(report_path) = &args.report_path {
        println!("  {} {}", "Report:".bright_cyan(), report_path.display());
    }
    println!();
}
