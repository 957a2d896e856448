//! Unit tests for processing statistics

use crate::app::services::profile_processor::backtrack::{BacktrackPolicy, FlagOutcome};
use crate::app::services::profile_processor::quality_filter::VoidReport;
use crate::app::services::profile_processor::stats::ProcessingStats;
use crate::app::services::profile_processor::synchronization::SyncOutcome;

#[test]
fn test_new_stats_are_empty() {
    let stats = ProcessingStats::new();
    assert_eq!(stats.total_profiles, 0);
    assert_eq!(stats.total_voided(), 0);
    assert_eq!(stats.success_rate(), 100.0);
    assert!(stats.is_successful());
}

#[test]
fn test_record_flag_outcomes() {
    let mut stats = ProcessingStats::new();
    stats.record_flag(1, FlagOutcome::Flagged(BacktrackPolicy::FlagEntireProfile));
    stats.record_flag(2, FlagOutcome::Flagged(BacktrackPolicy::FlagZeroPressureOnly));
    stats.record_flag(3, FlagOutcome::NotFlagged);
    stats.record_flag(4, FlagOutcome::IllegalCode(9));

    assert_eq!(stats.backtrack_flagged, 2);
    assert_eq!(stats.backtrack_not_flagged, 1);
    assert_eq!(stats.illegal_backtrack_codes, vec![4]);
}

#[test]
fn test_record_sync_outcomes() {
    let mut stats = ProcessingStats::new();
    stats.processable_profiles = 4;
    stats.record_sync(1, SyncOutcome::Synced);
    stats.record_sync(2, SyncOutcome::Synced);
    stats.record_sync(3, SyncOutcome::NotSynced);
    stats.record_sync(4, SyncOutcome::TimingFault);

    assert_eq!(stats.synced, 2);
    assert_eq!(stats.not_synced, vec![3]);
    assert_eq!(stats.timing_faults, vec![4]);
    assert_eq!(stats.sync_rate(), 50.0);
}

#[test]
fn test_success_rate_counts_ctd_voids() {
    let mut stats = ProcessingStats::new();
    stats.processable_profiles = 10;
    stats.ctd_quality = VoidReport {
        examined: 10,
        voided: vec![3],
    };
    stats.eng_quality = VoidReport {
        examined: 10,
        voided: vec![3, 4],
    };

    assert_eq!(stats.success_rate(), 90.0);
    assert!(!stats.is_successful());
    assert_eq!(stats.total_voided(), 3);
}

#[test]
fn test_summary_mentions_counts() {
    let mut stats = ProcessingStats::new();
    stats.total_profiles = 6;
    stats.processable_profiles = 5;
    stats.synced = 5;
    stats.ctd_quality.voided = vec![2];

    let summary = stats.summary();
    assert!(summary.contains("6 profiles (5 processable)"));
    assert!(summary.contains("Synced: 5 (100.0%)"));
    assert!(summary.contains("Voided: 0 ENG, 1 CTD"));
}

#[test]
fn test_stats_serialize() {
    let mut stats = ProcessingStats::new();
    stats.timing_faults = vec![7];

    let json = serde_json::to_string(&stats).unwrap();
    let restored: ProcessingStats = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, stats);
}
