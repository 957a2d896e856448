//! Unit tests for minimum-coverage quality filtering

use super::*;
use crate::app::models::{InstrumentStream, ProcessingStage, ProfileRecord, SensorData, SensorField};
use crate::app::services::profile_processor::quality_filter::{
    QualityThresholds, fails_thresholds, void_short_profiles,
};
use crate::constants::status;

#[test]
fn test_short_profile_voided_and_metadata_kept() {
    let mut records = vec![create_ctd_profile(1, 5)];
    let date = records[0].profile_date;
    let direction = records[0].profile_direction;

    let report = void_short_profiles(
        &mut records,
        &[1],
        SensorField::Pressure,
        &QualityThresholds::new(5, -1.0),
    );

    assert_eq!(report.voided, vec![1]);
    assert_eq!(report.examined, 1);

    let record = &records[0];
    for &field in &record.sensor_fields {
        assert_eq!(record.field_len(field), 0, "{} not voided", field);
    }
    assert_eq!(record.profile_number, 1);
    assert_eq!(record.profile_date, date);
    assert_eq!(record.profile_direction, direction);
    assert_eq!(record.stream, InstrumentStream::Ctd);
    assert_eq!(
        record.provenance.last_status(),
        Some(status::ALL_DATA_SET_TO_EMPTY)
    );
}

#[test]
fn test_voiding_preserves_matrix_columns() {
    let mut records = vec![create_ctd_profile(2, 8)];

    void_short_profiles(
        &mut records,
        &[2],
        SensorField::Pressure,
        &QualityThresholds::new(100, -1.0),
    );

    match records[0].channels.get(&SensorField::Oxygen) {
        Some(SensorData::Matrix(matrix)) => {
            assert_eq!(matrix.columns(), 2);
            assert_eq!(matrix.rows(), 0);
        }
        other => panic!("oxygen channel should remain a matrix, got {:?}", other),
    }
    assert!(records[0].channels[&SensorField::Temperature].is_empty());
}

#[test]
fn test_channels_outside_sensor_fields_untouched() {
    let mut record = create_ctd_profile(3, 8);
    record.sensor_fields = vec![SensorField::Pressure];
    let mut records = vec![record];

    void_short_profiles(
        &mut records,
        &[3],
        SensorField::Pressure,
        &QualityThresholds::new(100, -1.0),
    );

    assert!(records[0].pressure.is_empty());
    assert_eq!(records[0].time.len(), 8);
    assert_eq!(records[0].channels[&SensorField::Temperature].len(), 8);
}

#[test]
fn test_boundary_point_count_fails() {
    let record = create_ctd_profile(1, 10);

    assert!(fails_thresholds(
        &record,
        SensorField::Pressure,
        &QualityThresholds::new(10, -1.0)
    ));
    assert!(!fails_thresholds(
        &record,
        SensorField::Pressure,
        &QualityThresholds::new(9, -1.0)
    ));
}

#[test]
fn test_range_threshold() {
    // Pressure 10.0 .. 14.5 dbar, range 4.5
    let record = create_ctd_profile(1, 10);

    assert!(fails_thresholds(
        &record,
        SensorField::Pressure,
        &QualityThresholds::new(-1, 4.5)
    ));
    assert!(!fails_thresholds(
        &record,
        SensorField::Pressure,
        &QualityThresholds::new(-1, 4.0)
    ));
}

#[test]
fn test_non_finite_values_give_zero_range() {
    let mut record = create_ctd_profile(1, 10);
    record.pressure[4] = f64::NAN;

    assert!(fails_thresholds(
        &record,
        SensorField::Pressure,
        &QualityThresholds::new(-1, 0.0)
    ));
    // A zero range only fails a non-negative threshold
    assert!(!fails_thresholds(
        &record,
        SensorField::Pressure,
        &QualityThresholds::disabled()
    ));
}

#[test]
fn test_empty_record_fails_enabled_thresholds() {
    let record = ProfileRecord::empty(InstrumentStream::Engineering, 4);

    assert!(fails_thresholds(
        &record,
        SensorField::Pressure,
        &QualityThresholds::new(0, -1.0)
    ));
    assert!(!fails_thresholds(
        &record,
        SensorField::Pressure,
        &QualityThresholds::disabled()
    ));
}

#[test]
fn test_unselected_records_untouched() {
    let mut records = vec![create_ctd_profile(1, 5), create_ctd_profile(2, 5)];
    let untouched = records[1].clone();

    let report = void_short_profiles(
        &mut records,
        &[1],
        SensorField::Pressure,
        &QualityThresholds::new(50, -1.0),
    );

    assert_eq!(report.examined, 1);
    assert_eq!(records[1], untouched);
    assert!(records[0].pressure.is_empty());
}

#[test]
fn test_passing_record_gets_no_change_status() {
    let mut records = vec![create_ctd_profile(1, 50)];
    let before = records[0].pressure.clone();

    let report = void_short_profiles(
        &mut records,
        &[1],
        SensorField::Pressure,
        &QualityThresholds::new(10, 5.0),
    );

    assert!(report.is_clean());
    assert_eq!(records[0].pressure, before);
    assert_eq!(records[0].provenance.last_status(), Some(status::NO_CHANGE));
    assert!(
        records[0]
            .provenance
            .has_stage(ProcessingStage::VoidShortProfiles)
    );
}

#[test]
fn test_discriminator_can_be_a_channel() {
    let mut records = vec![create_ctd_profile(1, 20)];
    // Temperature spans 0.19 degrees
    let report = void_short_profiles(
        &mut records,
        &[1],
        SensorField::Temperature,
        &QualityThresholds::new(-1, 1.0),
    );

    assert_eq!(report.voided, vec![1]);
    assert!(records[0].pressure.is_empty());
}

#[test]
fn test_void_is_idempotent() {
    let mut records = vec![create_ctd_profile(1, 5)];
    let thresholds = QualityThresholds::new(5, -1.0);

    void_short_profiles(&mut records, &[1], SensorField::Pressure, &thresholds);
    let report = void_short_profiles(&mut records, &[1], SensorField::Pressure, &thresholds);

    assert_eq!(report.voided, vec![1]);
    assert_eq!(records[0].field_len(SensorField::Time), 0);
    assert_eq!(records[0].profile_number, 1);
}
