//! Processing statistics and result structures for the profile pipeline
//!
//! This module provides types for tracking per-stage outcomes across a
//! deployment and for handing the processed deployment back to callers.

use crate::app::models::Deployment;
use serde::{Deserialize, Serialize};

use super::backtrack::FlagOutcome;
use super::quality_filter::VoidReport;
use super::synchronization::SyncOutcome;

/// Statistics for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Profile slots in the deployment (including profile 0)
    pub total_profiles: usize,
    /// Profiles eligible for processing (profile 0 excluded)
    pub processable_profiles: usize,
    /// Engineering records whose mask was flagged
    pub backtrack_flagged: usize,
    /// Engineering records with no pressure data
    pub backtrack_not_flagged: usize,
    /// Profiles that hit an unrecognised backtrack code
    pub illegal_backtrack_codes: Vec<u32>,
    /// Pairs synchronized successfully
    pub synced: usize,
    /// Pairs skipped because a stream was empty
    pub not_synced: Vec<u32>,
    /// Pairs whose CTD timestamps were unusable
    pub timing_faults: Vec<u32>,
    /// Engineering quality filter report
    pub eng_quality: VoidReport,
    /// CTD quality filter report
    pub ctd_quality: VoidReport,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally one backtrack flagging outcome
    pub fn record_flag(&mut self, profile_number: u32, outcome: FlagOutcome) {
        match outcome {
            FlagOutcome::Flagged(_) => self.backtrack_flagged += 1,
            FlagOutcome::NotFlagged => self.backtrack_not_flagged += 1,
            FlagOutcome::IllegalCode(_) => self.illegal_backtrack_codes.push(profile_number),
        }
    }

    /// Tally one synchronization outcome
    pub fn record_sync(&mut self, profile_number: u32, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Synced => self.synced += 1,
            SyncOutcome::NotSynced => self.not_synced.push(profile_number),
            SyncOutcome::TimingFault => self.timing_faults.push(profile_number),
        }
    }

    /// Profiles voided in either stream
    pub fn total_voided(&self) -> usize {
        self.eng_quality.voided_count() + self.ctd_quality.voided_count()
    }

    /// Percentage of processable profiles that were synchronized
    pub fn sync_rate(&self) -> f64 {
        if self.processable_profiles == 0 {
            100.0
        } else {
            (self.synced as f64 / self.processable_profiles as f64) * 100.0
        }
    }

    /// Percentage of processable profiles that kept their CTD payload
    pub fn success_rate(&self) -> f64 {
        if self.processable_profiles == 0 {
            100.0
        } else {
            let kept = self
                .processable_profiles
                .saturating_sub(self.ctd_quality.voided_count());
            (kept as f64 / self.processable_profiles as f64) * 100.0
        }
    }

    /// Check if processing was mostly successful (>90% of CTD profiles kept)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }

    pub fn summary(&self) -> String {
        format!(
            "Processing Summary: {} profiles ({} processable) | \
             Backtrack flagged: {} (illegal code: {}) | \
             Synced: {} ({:.1}%), not synced: {}, timing faults: {} | \
             Voided: {} ENG, {} CTD",
            self.total_profiles,
            self.processable_profiles,
            self.backtrack_flagged,
            self.illegal_backtrack_codes.len(),
            self.synced,
            self.sync_rate(),
            self.not_synced.len(),
            self.timing_faults.len(),
            self.eng_quality.voided_count(),
            self.ctd_quality.voided_count()
        )
    }
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// Processed deployment, same shape as the input
    pub deployment: Deployment,
    pub stats: ProcessingStats,
}

impl ProcessingResult {
    pub fn new(deployment: Deployment, stats: ProcessingStats) -> Self {
        Self { deployment, stats }
    }

    pub fn profile_count(&self) -> usize {
        self.deployment.profile_count()
    }

    pub fn is_successful(&self) -> bool {
        self.stats.is_successful()
    }

    pub fn summary(&self) -> String {
        self.stats.summary()
    }
}
