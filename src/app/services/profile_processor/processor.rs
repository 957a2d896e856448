//! Main profile processor implementation and pipeline orchestration
//!
//! This module contains the ProfileProcessor struct, which runs backtrack
//! flagging, mask synchronization and quality filtering over a whole deployment.
//! Per-profile work shares no state between profiles, so the first two stages
//! can run on a rayon worker pool; results are identical to a sequential run.

use crate::app::models::{Deployment, ProfileRecord, SensorField};
use crate::config::Config;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPool;
use rayon::prelude::*;
use tracing::{debug, info};

use super::{
    backtrack::{FlagOutcome, flag_backtrack},
    quality_filter::void_short_profiles,
    stats::{ProcessingResult, ProcessingStats},
    synchronization::{SyncOutcome, sync_masks},
};

/// Pipeline stages to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSteps {
    pub flag_backtrack: bool,
    pub sync_masks: bool,
    pub quality_filter: bool,
}

impl Default for PipelineSteps {
    fn default() -> Self {
        Self {
            flag_backtrack: true,
            sync_masks: true,
            quality_filter: true,
        }
    }
}

/// Profile processor for MMP deployments
///
/// # Example
///
/// ```rust
/// use mmp_processor::app::services::profile_processor::ProfileProcessor;
/// use mmp_processor::{Config, Deployment};
///
/// # fn example(deployment: Deployment) -> mmp_processor::Result<()> {
/// let processor = ProfileProcessor::new(Config::default());
/// let result = processor.process(deployment, false)?;
/// println!("{}", result.summary());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProfileProcessor {
    config: Config,
}

impl ProfileProcessor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline: flag -> sync -> quality filter
    pub fn process(&self, deployment: Deployment, show_progress: bool) -> Result<ProcessingResult> {
        self.process_custom(deployment, PipelineSteps::default(), show_progress)
    }

    /// Run selected pipeline stages
    ///
    /// The deployment is validated first; a misaligned deployment is an error.
    /// Per-profile conditions never abort the run.
    pub fn process_custom(
        &self,
        mut deployment: Deployment,
        steps: PipelineSteps,
        show_progress: bool,
    ) -> Result<ProcessingResult> {
        deployment.validate()?;

        let mut stats = ProcessingStats::new();
        stats.total_profiles = deployment.profile_count();
        let selected = deployment.processable_profile_numbers();
        stats.processable_profiles = selected.len();

        info!(
            "Starting profile processing for deployment '{}': {} profiles \
             (backtrack: {}, sync: {}, quality filter: {})",
            deployment.name,
            stats.total_profiles,
            steps.flag_backtrack,
            steps.sync_masks,
            steps.quality_filter
        );

        let pool = self.build_thread_pool()?;

        // Step 1: backtrack flagging of the engineering stream
        if steps.flag_backtrack {
            let pb = show_progress
                .then(|| Self::create_progress_bar(selected.len() as u64, "Backtrack flagging"));
            let outcomes = self.flag_all(&mut deployment.eng, pool.as_ref(), pb.as_ref());
            for (profile_number, outcome) in outcomes {
                stats.record_flag(profile_number, outcome);
            }
            if let Some(pb) = pb {
                pb.finish_with_message(format!(
                    "Backtrack flagging complete: {} flagged",
                    stats.backtrack_flagged
                ));
            }
        }

        // Step 2: CTD/engineering mask synchronization
        if steps.sync_masks {
            let pb = show_progress
                .then(|| Self::create_progress_bar(selected.len() as u64, "Mask synchronization"));
            let outcomes = Self::sync_all(
                &mut deployment.ctd,
                &mut deployment.eng,
                pool.as_ref(),
                pb.as_ref(),
            );
            for (profile_number, outcome) in outcomes {
                stats.record_sync(profile_number, outcome);
            }
            if let Some(pb) = pb {
                pb.finish_with_message(format!(
                    "Mask synchronization complete: {} synced",
                    stats.synced
                ));
            }
        }

        // Step 3: minimum-coverage quality filter, engineering then CTD
        if steps.quality_filter {
            let qc = &self.config.quality_control;
            stats.eng_quality = void_short_profiles(
                &mut deployment.eng,
                &selected,
                SensorField::Pressure,
                &qc.eng_thresholds(),
            );
            stats.ctd_quality = void_short_profiles(
                &mut deployment.ctd,
                &selected,
                SensorField::Pressure,
                &qc.ctd_thresholds(),
            );
        }

        info!("{}", stats.summary());

        if !stats.timing_faults.is_empty() {
            info!(
                "CTD timing faults flagged bad in profiles {:?}",
                stats.timing_faults
            );
        }

        if !stats.is_successful() {
            debug!(
                "Low CTD retention in deployment '{}': {:.1}%",
                deployment.name,
                stats.success_rate()
            );
        }

        Ok(ProcessingResult::new(deployment, stats))
    }

    fn flag_all(
        &self,
        records: &mut [ProfileRecord],
        pool: Option<&ThreadPool>,
        pb: Option<&ProgressBar>,
    ) -> Vec<(u32, FlagOutcome)> {
        let code = self.config.processing.backtrack_processing_flag;
        let flag_one = |record: &mut ProfileRecord| {
            let outcome = flag_backtrack(record, code);
            if let Some(pb) = pb {
                pb.inc(1);
            }
            (record.profile_number, outcome)
        };

        match pool {
            Some(pool) => pool.install(|| {
                records
                    .par_iter_mut()
                    .filter(|record| record.profile_number != 0)
                    .map(flag_one)
                    .collect()
            }),
            None => records
                .iter_mut()
                .filter(|record| record.profile_number != 0)
                .map(flag_one)
                .collect(),
        }
    }

    fn sync_all(
        ctd: &mut [ProfileRecord],
        eng: &mut [ProfileRecord],
        pool: Option<&ThreadPool>,
        pb: Option<&ProgressBar>,
    ) -> Vec<(u32, SyncOutcome)> {
        let sync_one = |(ctd, eng): (&mut ProfileRecord, &mut ProfileRecord)| {
            let outcome = sync_masks(ctd, eng);
            if let Some(pb) = pb {
                pb.inc(1);
            }
            (ctd.profile_number, outcome)
        };

        match pool {
            Some(pool) => pool.install(|| {
                ctd.par_iter_mut()
                    .zip(eng.par_iter_mut())
                    .filter(|(ctd, _)| ctd.profile_number != 0)
                    .map(sync_one)
                    .collect()
            }),
            None => ctd
                .iter_mut()
                .zip(eng.iter_mut())
                .filter(|(ctd, _)| ctd.profile_number != 0)
                .map(sync_one)
                .collect(),
        }
    }

    /// Worker pool for parallel runs, `None` when running sequentially
    fn build_thread_pool(&self) -> Result<Option<ThreadPool>> {
        let performance = &self.config.performance;
        if !performance.parallel {
            return Ok(None);
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(performance.workers)
            .build()
            .map(Some)
            .map_err(|e| Error::configuration(format!("Failed to build worker pool: {}", e)))
    }

    /// Create a progress bar for processing operations
    fn create_progress_bar(total: u64, operation: &str) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message(operation.to_string());
        pb
    }
}
