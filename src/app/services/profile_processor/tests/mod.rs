//! Comprehensive tests for profile processor module
//!
//! This module provides unit and integration tests for all profile processing components.

pub mod quality_filter_tests;
pub mod stats_tests;

// Test helper functions and fixtures
use crate::app::models::{
    Deployment, InstrumentStream, ProfileDirection, ProfileRecord, SampleMatrix, SensorData,
    SensorField,
};
use crate::config::Config;

/// Deployment start time used by the fixtures (2023-06-15T12:00:00Z)
pub const EPOCH_START: f64 = 1_686_830_400.0;

/// Evenly spaced timestamps starting at `start`
pub fn uniform_times(start: f64, n: usize, rate_hz: f64) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 / rate_hz).collect()
}

/// Build a CTD record from time and pressure samples
pub fn create_ctd_record(profile_number: u32, time: Vec<f64>, pressure: Vec<f64>) -> ProfileRecord {
    ProfileRecord::from_samples(InstrumentStream::Ctd, profile_number, time, pressure)
        .expect("fixture samples must have equal lengths")
}

/// Build an engineering record from time and pressure samples
pub fn create_eng_record(profile_number: u32, time: Vec<f64>, pressure: Vec<f64>) -> ProfileRecord {
    ProfileRecord::from_samples(InstrumentStream::Engineering, profile_number, time, pressure)
        .expect("fixture samples must have equal lengths")
}

/// The ten-sample engineering record with two zero-pressure gaps, sampled at 1 Hz
pub fn create_backtrack_record() -> ProfileRecord {
    let pressure = vec![0.0, 0.0, 5.0, 10.0, 15.0, 0.0, 0.0, 20.0, 25.0, 0.0];
    create_eng_record(1, uniform_times(EPOCH_START, pressure.len(), 1.0), pressure)
}

/// A descending CTD profile at 1 Hz with a temperature series and an oxygen matrix
pub fn create_ctd_profile(profile_number: u32, n: usize) -> ProfileRecord {
    let start = EPOCH_START + profile_number as f64 * 10_000.0;
    let time = uniform_times(start, n, 1.0);
    let pressure: Vec<f64> = (0..n).map(|i| 10.0 + 0.5 * i as f64).collect();
    let temperature: Vec<f64> = (0..n).map(|i| 12.0 - 0.01 * i as f64).collect();
    let oxygen: Vec<f64> = (0..n).flat_map(|i| [200.0 + i as f64, 4.0]).collect();

    create_ctd_record(profile_number, time, pressure)
        .with_direction(ProfileDirection::Descending)
        .with_channel(SensorField::Temperature, SensorData::Series(temperature))
        .with_channel(
            SensorField::Oxygen,
            SensorData::Matrix(SampleMatrix::new(2, oxygen).expect("two columns per row")),
        )
}

/// The engineering counterpart of [`create_ctd_profile`], sampled every 4 s
pub fn create_eng_profile(profile_number: u32, n: usize) -> ProfileRecord {
    let start = EPOCH_START + profile_number as f64 * 10_000.0;
    let time = uniform_times(start, n, 0.25);
    let pressure: Vec<f64> = (0..n).map(|i| 9.0 + 2.0 * i as f64).collect();
    let turbidity: Vec<f64> = (0..n).map(|i| 0.1 + 0.001 * i as f64).collect();

    create_eng_record(profile_number, time, pressure)
        .with_channel(SensorField::Turbidity, SensorData::Series(turbidity))
}

/// A deployment with an empty profile 0 followed by `profiles` populated profiles
pub fn create_test_deployment(profiles: u32, ctd_samples: usize) -> Deployment {
    let eng_samples = (ctd_samples - 1) / 4 + 1;
    let mut ctd = vec![ProfileRecord::empty(InstrumentStream::Ctd, 0)];
    let mut eng = vec![ProfileRecord::empty(InstrumentStream::Engineering, 0)];
    for number in 1..=profiles {
        ctd.push(create_ctd_profile(number, ctd_samples));
        eng.push(create_eng_profile(number, eng_samples));
    }
    Deployment::new("TEST-MOORING", ctd, eng)
}

/// Configuration with every quality test disabled and sequential execution
pub fn create_permissive_config() -> Config {
    let mut config = Config::default();
    config.quality_control = crate::config::QualityControlConfig::disabled();
    config.performance.parallel = false;
    config
}
