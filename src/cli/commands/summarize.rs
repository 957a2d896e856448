//! Summarize command implementation for the MMP processor CLI

use super::shared::setup_logging;
use crate::app::models::ProfileRecord;
use crate::app::services::deployment_io::load_deployment;
use crate::cli::args::SummarizeArgs;
use crate::Result;
use colored::*;

/// Print one line per profile with mask coverage and the latest status
pub async fn run_summarize(args: SummarizeArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false)?;

    let deployment = load_deployment(&args.input_path).await?;

    println!(
        "{} {} ({} profiles)",
        "Deployment:".bright_cyan(),
        deployment.name.as_str().bright_white().bold(),
        deployment.profile_count()
    );
    println!(
        "{:>7}  {:>16}  {:>16}  {}",
        "profile", "CTD good/total", "ENG good/total", "last status (CTD | ENG)"
    );

    for (ctd, eng) in deployment.ctd.iter().zip(&deployment.eng) {
        println!("{}", summary_line(ctd, eng));
    }

    Ok(())
}

fn coverage(record: &ProfileRecord) -> String {
    format!(
        "{}/{}",
        record.good_sample_count(),
        record.profile_mask.len()
    )
}

/// Format the summary row for one profile pair
pub fn summary_line(ctd: &ProfileRecord, eng: &ProfileRecord) -> String {
    format!(
        "{:>7}  {:>16}  {:>16}  {} | {}",
        ctd.profile_number,
        coverage(ctd),
        coverage(eng),
        ctd.provenance.last_status().unwrap_or("-"),
        eng.provenance.last_status().unwrap_or("-")
    )
}
