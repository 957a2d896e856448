//! JSON interchange for deployments and processing reports
//!
//! Deployments arrive from the importer as a JSON serialization of
//! [`Deployment`] and leave in the same shape with finalized masks, so the
//! binning stage can read them without knowing about this pipeline.

use crate::app::models::{Deployment, InstrumentStream, ProfileRecord, ProcessingStage};
use crate::app::services::profile_processor::{ProcessingResult, ProcessingStats};
use crate::config::Config;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Load a deployment from a JSON file and validate its structure
pub async fn load_deployment(path: &Path) -> Result<Deployment> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::file_read(
            path,
            format!("Failed to read deployment file: {}", path.display()),
            e,
        )
    })?;

    let deployment: Deployment = serde_json::from_str(&content).map_err(|e| {
        Error::json(
            path.display().to_string(),
            "Failed to parse deployment",
            e,
        )
    })?;
    deployment.validate()?;

    info!(
        "Loaded deployment '{}' with {} profiles from {}",
        deployment.name,
        deployment.profile_count(),
        path.display()
    );
    Ok(deployment)
}

/// Write a deployment as pretty-printed JSON, creating parent directories
pub async fn save_deployment(path: &Path, deployment: &Deployment) -> Result<()> {
    let json = serde_json::to_string_pretty(deployment).map_err(|e| {
        Error::json(
            path.display().to_string(),
            "Failed to serialize deployment",
            e,
        )
    })?;
    write_json(path, json).await?;

    info!(
        "Saved deployment '{}' ({} profiles) to {}",
        deployment.name,
        deployment.profile_count(),
        path.display()
    );
    Ok(())
}

/// Final state of one profile record, as recorded in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileTrail {
    pub stream: InstrumentStream,
    pub profile_number: u32,
    pub samples: usize,
    pub good_samples: usize,
    pub data_status: Vec<String>,
    pub operation_history: Vec<ProcessingStage>,
}

impl ProfileTrail {
    pub fn from_record(record: &ProfileRecord) -> Self {
        Self {
            stream: record.stream,
            profile_number: record.profile_number,
            samples: record.profile_mask.len(),
            good_samples: record.good_sample_count(),
            data_status: record.provenance.data_status().to_vec(),
            operation_history: record.provenance.operation_history().to_vec(),
        }
    }
}

/// Summary of one pipeline run, written next to the processed deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub generated_at: DateTime<Utc>,
    pub deployment: String,
    pub config: Config,
    pub stats: ProcessingStats,
    pub profiles: Vec<ProfileTrail>,
}

impl ProcessingReport {
    /// Build a report from a finished run
    pub fn new(result: &ProcessingResult, config: &Config) -> Self {
        let deployment = &result.deployment;
        let profiles = deployment
            .ctd
            .iter()
            .zip(&deployment.eng)
            .filter(|(ctd, _)| ctd.profile_number != 0)
            .flat_map(|(ctd, eng)| [ProfileTrail::from_record(ctd), ProfileTrail::from_record(eng)])
            .collect();

        Self {
            generated_at: Utc::now(),
            deployment: deployment.name.clone(),
            config: config.clone(),
            stats: result.stats.clone(),
            profiles,
        }
    }
}

/// Write a processing report as pretty-printed JSON
pub async fn save_report(path: &Path, report: &ProcessingReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(|e| {
        Error::json(path.display().to_string(), "Failed to serialize report", e)
    })?;
    write_json(path, json).await?;

    debug!(
        "Wrote processing report with {} profile entries to {}",
        report.profiles.len(),
        path.display()
    );
    Ok(())
}

async fn write_json(path: &Path, json: String) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            Error::io(
                format!("Failed to create output directory: {}", parent.display()),
                e,
            )
        })?;
    }

    tokio::fs::write(path, json)
        .await
        .map_err(|e| Error::io(format!("Failed to write file: {}", path.display()), e))
}
