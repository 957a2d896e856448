//! Minimum-coverage quality control for profile records
//!
//! A profile is voided when its discriminator field holds too few samples or
//! spans too small a value range. Voided records keep their slot in the array
//! and their scalar metadata; only the sensor payload is emptied.

use crate::app::models::{ProcessingStage, ProfileRecord, SensorField};
use crate::constants::{THRESHOLD_DISABLED, status};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Point-count and range thresholds for one discriminator field
///
/// A record fails when `n <= min_points` or `range <= min_range`. Pass `-1` to
/// disable a test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityThresholds {
    pub min_points: i64,
    pub min_range: f64,
}

impl QualityThresholds {
    pub fn new(min_points: i64, min_range: f64) -> Self {
        Self {
            min_points,
            min_range,
        }
    }

    /// Thresholds that no record can fail
    pub fn disabled() -> Self {
        Self::new(THRESHOLD_DISABLED, THRESHOLD_DISABLED as f64)
    }
}

/// Outcome of a quality filter pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoidReport {
    /// Number of selected records that were examined
    pub examined: usize,
    /// Profile numbers whose payload was emptied
    pub voided: Vec<u32>,
}

impl VoidReport {
    pub fn voided_count(&self) -> usize {
        self.voided.len()
    }

    pub fn is_clean(&self) -> bool {
        self.voided.is_empty()
    }
}

/// Check a record against the thresholds for one discriminator field
pub fn fails_thresholds(
    record: &ProfileRecord,
    field: SensorField,
    thresholds: &QualityThresholds,
) -> bool {
    let n = record.field_len(field) as i64;
    let too_few_points = n <= thresholds.min_points;
    let too_narrow = record.field_range(field) <= thresholds.min_range;
    too_few_points || too_narrow
}

/// Void the sensor payload of every selected record failing the thresholds
///
/// Records whose profile number is not in `selected` are left untouched. Every
/// selected record gets the stage identifier and either `allDataSetToEMPTY` or
/// `noChange` in its status trail.
pub fn void_short_profiles(
    records: &mut [ProfileRecord],
    selected: &[u32],
    field: SensorField,
    thresholds: &QualityThresholds,
) -> VoidReport {
    let selected: HashSet<u32> = selected.iter().copied().collect();
    let mut report = VoidReport::default();

    for record in records
        .iter_mut()
        .filter(|record| selected.contains(&record.profile_number))
    {
        report.examined += 1;
        record
            .provenance
            .push_stage(ProcessingStage::VoidShortProfiles);

        if fails_thresholds(record, field, thresholds) {
            debug!(
                "{} profile {}: {} has {} points spanning {}, voiding payload",
                record.stream,
                record.profile_number,
                field,
                record.field_len(field),
                record.field_range(field)
            );
            record.void_sensor_payload();
            record.provenance.push_status(status::ALL_DATA_SET_TO_EMPTY);
            report.voided.push(record.profile_number);
        } else {
            record.provenance.push_status(status::NO_CHANGE);
        }
    }

    info!(
        "Quality filtering on {}: {} of {} profiles voided {:?}",
        field,
        report.voided_count(),
        report.examined,
        report.voided
    );

    report
}
