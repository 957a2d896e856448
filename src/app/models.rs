//! Data models for MMP profile processing
//!
//! This module contains the core data structures for one instrument stream's
//! profile ([`ProfileRecord`]) and for a whole mooring deployment
//! ([`Deployment`]), which holds index-aligned CTD and engineering record arrays.

pub mod provenance;
pub mod sensor;

pub use provenance::{ProcessingStage, ProvenanceLog};
pub use sensor::{SampleMatrix, SensorData, SensorField, discriminator_range};

use crate::constants::status;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Enumerations
// =============================================================================

/// Instrument stream a record was imported from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentStream {
    /// CTD pressure/temperature/conductivity stream
    Ctd,
    /// Engineering and auxiliary sensor stream
    Engineering,
    /// Acoustic current meter stream
    CurrentMeter,
}

impl InstrumentStream {
    /// Sensor fields voided when a profile of this stream fails quality control
    pub fn default_sensor_fields(&self) -> Vec<SensorField> {
        use SensorField::*;
        match self {
            InstrumentStream::Ctd => vec![
                Time,
                Pressure,
                Dpdt,
                ProfileMask,
                Temperature,
                Conductivity,
                Salinity,
                Oxygen,
            ],
            InstrumentStream::Engineering => vec![
                Time,
                Pressure,
                Dpdt,
                ProfileMask,
                Turbidity,
                Chlorophyll,
                Par,
                Voltage,
                Current,
            ],
            InstrumentStream::CurrentMeter => vec![Time, Pressure, ProfileMask, Velocity],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InstrumentStream::Ctd => "CTD",
            InstrumentStream::Engineering => "ENG",
            InstrumentStream::CurrentMeter => "ACM",
        }
    }
}

impl fmt::Display for InstrumentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Vertical direction of travel during a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileDirection {
    Ascending,
    Descending,
    #[default]
    Unknown,
}

/// Import-time backtrack indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacktrackFlag {
    Yes,
    No,
    #[default]
    Unset,
}

impl fmt::Display for BacktrackFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BacktrackFlag::Yes => write!(f, "yes"),
            BacktrackFlag::No => write!(f, "no"),
            BacktrackFlag::Unset => write!(f, "unset"),
        }
    }
}

// =============================================================================
// Profile Record
// =============================================================================

/// One instrument stream's samples for one profile
///
/// Records with no data stay structurally valid: every sequence is empty and
/// `acquisition_rate_hz` is NaN, so they live in the same homogeneous arrays
/// as populated records. Records are never removed from a deployment; a voided
/// profile keeps its scalar metadata and loses its sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Instrument stream this record belongs to
    pub stream: InstrumentStream,

    /// Profile identifier; profile 0 is never processed
    pub profile_number: u32,

    /// Representative timestamp (median of the in-profile timestamps)
    pub profile_date: Option<DateTime<Utc>>,

    pub profile_direction: ProfileDirection,

    /// Sample timestamps in seconds since the UNIX epoch
    #[serde(with = "nan_vec")]
    pub time: Vec<f64>,

    /// Pressure in dbar, one value per sample
    #[serde(with = "nan_vec")]
    pub pressure: Vec<f64>,

    /// Pressure rate of change in dbar/s
    #[serde(with = "nan_vec", default)]
    pub dpdt: Vec<f64>,

    /// Per-sample validity; `true` means usable
    pub profile_mask: Vec<bool>,

    /// Remaining sensor channels
    #[serde(default)]
    pub channels: BTreeMap<SensorField, SensorData>,

    /// Fields emptied when the profile is voided
    pub sensor_fields: Vec<SensorField>,

    /// Derived sampling rate; NaN with fewer than two timed samples
    #[serde(with = "nan_f64")]
    pub acquisition_rate_hz: f64,

    pub backtrack_flag: BacktrackFlag,

    #[serde(default)]
    pub provenance: ProvenanceLog,
}

impl ProfileRecord {
    /// Create an empty record with every field present
    pub fn empty(stream: InstrumentStream, profile_number: u32) -> Self {
        Self {
            stream,
            profile_number,
            profile_date: None,
            profile_direction: ProfileDirection::Unknown,
            time: Vec::new(),
            pressure: Vec::new(),
            dpdt: Vec::new(),
            profile_mask: Vec::new(),
            channels: BTreeMap::new(),
            sensor_fields: stream.default_sensor_fields(),
            acquisition_rate_hz: f64::NAN,
            backtrack_flag: BacktrackFlag::Unset,
            provenance: ProvenanceLog::new(),
        }
    }

    /// Create a record from imported time and pressure samples
    ///
    /// Follows the import convention: the mask is `true` wherever raw pressure is
    /// nonzero, and dP/dt, acquisition rate and profile date are derived from the
    /// samples.
    pub fn from_samples(
        stream: InstrumentStream,
        profile_number: u32,
        time: Vec<f64>,
        pressure: Vec<f64>,
    ) -> Result<Self> {
        if time.len() != pressure.len() {
            return Err(Error::deployment_validation(format!(
                "{} profile {}: {} timestamps but {} pressure values",
                stream,
                profile_number,
                time.len(),
                pressure.len()
            )));
        }

        let mut record = Self::empty(stream, profile_number);
        record.profile_mask = pressure.iter().map(|&p| p != 0.0).collect();
        record.dpdt = pressure_rate(&time, &pressure);
        record.time = time;
        record.pressure = pressure;
        record.refresh_derived();
        record
            .provenance
            .record(ProcessingStage::Import, status::IMPORTED);
        Ok(record)
    }

    /// Attach a sensor channel
    pub fn with_channel(mut self, field: SensorField, data: SensorData) -> Self {
        self.channels.insert(field, data);
        self
    }

    /// Set the profile direction
    pub fn with_direction(mut self, direction: ProfileDirection) -> Self {
        self.profile_direction = direction;
        self
    }

    /// Recompute acquisition rate and profile date from `time`
    pub fn refresh_derived(&mut self) {
        self.acquisition_rate_hz = acquisition_rate(&self.time);
        self.profile_date = median_timestamp(&self.time);
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty() && self.pressure.is_empty() && self.profile_mask.is_empty()
    }

    /// Number of samples currently marked usable
    pub fn good_sample_count(&self) -> usize {
        self.profile_mask.iter().filter(|&&good| good).count()
    }

    /// Fraction of samples marked usable (0 for empty records)
    pub fn mask_coverage(&self) -> f64 {
        if self.profile_mask.is_empty() {
            0.0
        } else {
            self.good_sample_count() as f64 / self.profile_mask.len() as f64
        }
    }

    /// Validate that the per-sample sequences have consistent lengths
    pub fn validate(&self) -> Result<()> {
        let n = self.pressure.len();
        if self.profile_mask.len() != n {
            return Err(Error::deployment_validation(format!(
                "{} profile {}: mask has {} entries for {} pressure samples",
                self.stream,
                self.profile_number,
                self.profile_mask.len(),
                n
            )));
        }
        // A timing fault leaves time NaN-filled, never shorter than pressure
        if !self.time.is_empty() && self.time.len() != n {
            return Err(Error::deployment_validation(format!(
                "{} profile {}: {} timestamps for {} pressure samples",
                self.stream,
                self.profile_number,
                self.time.len(),
                n
            )));
        }
        if !self.dpdt.is_empty() && self.dpdt.len() != n {
            return Err(Error::deployment_validation(format!(
                "{} profile {}: {} dP/dt values for {} pressure samples",
                self.stream,
                self.profile_number,
                self.dpdt.len(),
                n
            )));
        }
        Ok(())
    }

    /// Number of samples held by a field (rows for matrices, 0 when absent)
    pub fn field_len(&self, field: SensorField) -> usize {
        match field {
            SensorField::Time => self.time.len(),
            SensorField::Pressure => self.pressure.len(),
            SensorField::Dpdt => self.dpdt.len(),
            SensorField::ProfileMask => self.profile_mask.len(),
            other => self.channels.get(&other).map_or(0, SensorData::len),
        }
    }

    /// Value range of a field as used by the quality discriminators
    pub fn field_range(&self, field: SensorField) -> f64 {
        match field {
            SensorField::Time => discriminator_range(&self.time),
            SensorField::Pressure => discriminator_range(&self.pressure),
            SensorField::Dpdt => discriminator_range(&self.dpdt),
            SensorField::ProfileMask => {
                let coerced: Vec<f64> = self
                    .profile_mask
                    .iter()
                    .map(|&good| if good { 1.0 } else { 0.0 })
                    .collect();
                discriminator_range(&coerced)
            }
            other => self
                .channels
                .get(&other)
                .map_or(0.0, |data| discriminator_range(data.values())),
        }
    }

    /// Empty one field, preserving its dimensionality
    pub fn void_field(&mut self, field: SensorField) {
        match field {
            SensorField::Time => self.time.clear(),
            SensorField::Pressure => self.pressure.clear(),
            SensorField::Dpdt => self.dpdt.clear(),
            SensorField::ProfileMask => self.profile_mask.clear(),
            other => {
                if let Some(data) = self.channels.get_mut(&other) {
                    data.void();
                }
            }
        }
    }

    /// Empty every field listed in `sensor_fields`
    pub fn void_sensor_payload(&mut self) {
        let fields = self.sensor_fields.clone();
        for field in fields {
            self.void_field(field);
        }
    }
}

// =============================================================================
// Deployment
// =============================================================================

/// All profile records of one mooring deployment
///
/// `ctd[i]` and `eng[i]` describe the same physical profile, sampled by
/// independent clocks and sensors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    /// Deployment identifier (e.g. mooring name)
    #[serde(default)]
    pub name: String,

    pub ctd: Vec<ProfileRecord>,

    pub eng: Vec<ProfileRecord>,
}

impl Deployment {
    pub fn new(name: impl Into<String>, ctd: Vec<ProfileRecord>, eng: Vec<ProfileRecord>) -> Self {
        Self {
            name: name.into(),
            ctd,
            eng,
        }
    }

    /// Number of profile slots (including profile 0 if present)
    pub fn profile_count(&self) -> usize {
        self.ctd.len()
    }

    /// Profile numbers eligible for processing (profile 0 excluded)
    pub fn processable_profile_numbers(&self) -> Vec<u32> {
        self.eng
            .iter()
            .map(|record| record.profile_number)
            .filter(|&number| number != 0)
            .collect()
    }

    /// Validate index alignment and per-record shapes
    pub fn validate(&self) -> Result<()> {
        if self.ctd.len() != self.eng.len() {
            return Err(Error::deployment_validation(format!(
                "CTD array has {} records but engineering array has {}",
                self.ctd.len(),
                self.eng.len()
            )));
        }

        for (index, (ctd, eng)) in self.ctd.iter().zip(&self.eng).enumerate() {
            if ctd.profile_number != eng.profile_number {
                return Err(Error::deployment_validation(format!(
                    "Index {} pairs CTD profile {} with engineering profile {}",
                    index, ctd.profile_number, eng.profile_number
                )));
            }
            if ctd.stream != InstrumentStream::Ctd || eng.stream != InstrumentStream::Engineering
            {
                return Err(Error::deployment_validation(format!(
                    "Index {} holds {} and {} records, expected CTD and ENG",
                    index, ctd.stream, eng.stream
                )));
            }
            ctd.validate()?;
            eng.validate()?;
        }

        Ok(())
    }
}

// =============================================================================
// Derived Quantities
// =============================================================================

/// Sampling rate in Hz from the finite timestamps: `(n - 1) / (t_last - t_first)`
pub fn acquisition_rate(time: &[f64]) -> f64 {
    let finite: Vec<f64> = time.iter().copied().filter(|t| t.is_finite()).collect();
    if finite.len() < 2 {
        return f64::NAN;
    }
    let duration = finite[finite.len() - 1] - finite[0];
    if duration <= 0.0 {
        return f64::NAN;
    }
    (finite.len() - 1) as f64 / duration
}

/// Median of the finite timestamps as a UTC date
pub fn median_timestamp(time: &[f64]) -> Option<DateTime<Utc>> {
    let mut finite: Vec<f64> = time.iter().copied().filter(|t| t.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);
    let mid = finite.len() / 2;
    let median = if finite.len() % 2 == 0 {
        (finite[mid - 1] + finite[mid]) / 2.0
    } else {
        finite[mid]
    };
    DateTime::<Utc>::from_timestamp_millis((median * 1000.0).round() as i64)
}

/// Pressure rate of change: central differences inside, one-sided at the ends
pub fn pressure_rate(time: &[f64], pressure: &[f64]) -> Vec<f64> {
    let n = time.len().min(pressure.len());
    if n < 2 {
        return vec![f64::NAN; n];
    }
    (0..n)
        .map(|i| {
            let (lo, hi) = match i {
                0 => (0, 1),
                i if i == n - 1 => (n - 2, n - 1),
                i => (i - 1, i + 1),
            };
            (pressure[hi] - pressure[lo]) / (time[hi] - time[lo])
        })
        .collect()
}

// =============================================================================
// Serde Helpers
// =============================================================================

/// Serialize non-finite samples as JSON `null` and read `null` back as NaN
pub(crate) mod nan_vec {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            if value.is_finite() {
                seq.serialize_element(value)?;
            } else {
                seq.serialize_element(&Option::<f64>::None)?;
            }
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let raw: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}

/// Scalar counterpart of [`nan_vec`]
pub(crate) mod nan_f64 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_record() -> ProfileRecord {
        let time: Vec<f64> = (0..10).map(|i| 1_600_000_000.0 + i as f64).collect();
        let pressure = vec![0.0, 0.0, 5.0, 10.0, 15.0, 0.0, 0.0, 20.0, 25.0, 0.0];
        ProfileRecord::from_samples(InstrumentStream::Engineering, 3, time, pressure).unwrap()
    }

    mod record_tests {
        use super::*;

        #[test]
        fn test_empty_record_is_structurally_valid() {
            let record = ProfileRecord::empty(InstrumentStream::Ctd, 7);
            assert!(record.is_empty());
            assert!(record.validate().is_ok());
            assert!(record.acquisition_rate_hz.is_nan());
            assert_eq!(record.profile_date, None);
            assert_eq!(record.backtrack_flag, BacktrackFlag::Unset);
            assert_eq!(
                record.sensor_fields,
                InstrumentStream::Ctd.default_sensor_fields()
            );
        }

        #[test]
        fn test_from_samples_follows_import_convention() {
            let record = create_test_record();
            assert_eq!(
                record.profile_mask,
                vec![false, false, true, true, true, false, false, true, true, false]
            );
            assert_eq!(record.dpdt.len(), 10);
            assert!((record.acquisition_rate_hz - 1.0).abs() < 1e-12);
            assert!(record.provenance.has_stage(ProcessingStage::Import));
        }

        #[test]
        fn test_from_samples_rejects_length_mismatch() {
            let result = ProfileRecord::from_samples(
                InstrumentStream::Ctd,
                1,
                vec![0.0, 1.0],
                vec![5.0],
            );
            assert!(result.is_err());
        }

        #[test]
        fn test_validate_detects_short_mask() {
            let mut record = create_test_record();
            record.profile_mask.pop();
            assert!(record.validate().is_err());
        }

        #[test]
        fn test_mask_coverage() {
            let record = create_test_record();
            assert_eq!(record.good_sample_count(), 5);
            assert!((record.mask_coverage() - 0.5).abs() < 1e-12);
            assert_eq!(
                ProfileRecord::empty(InstrumentStream::Ctd, 1).mask_coverage(),
                0.0
            );
        }

        #[test]
        fn test_field_len_and_range() {
            let record = create_test_record().with_channel(
                SensorField::Velocity,
                SensorData::Matrix(SampleMatrix::new(2, vec![0.1, 0.2, 0.3, 0.4]).unwrap()),
            );
            assert_eq!(record.field_len(SensorField::Pressure), 10);
            assert_eq!(record.field_range(SensorField::Pressure), 25.0);
            assert_eq!(record.field_range(SensorField::ProfileMask), 1.0);
            assert_eq!(record.field_len(SensorField::Velocity), 2);
            assert_eq!(record.field_len(SensorField::Oxygen), 0);
            assert_eq!(record.field_range(SensorField::Oxygen), 0.0);
        }

        #[test]
        fn test_void_sensor_payload_keeps_metadata() {
            let mut record = create_test_record().with_channel(
                SensorField::Turbidity,
                SensorData::Series(vec![1.0; 10]),
            );
            let date = record.profile_date;
            record.void_sensor_payload();

            assert!(record.is_empty());
            assert!(record.dpdt.is_empty());
            assert_eq!(record.field_len(SensorField::Turbidity), 0);
            assert_eq!(record.profile_number, 3);
            assert_eq!(record.profile_date, date);
            assert!(record.validate().is_ok());
        }
    }

    mod derived_tests {
        use super::*;

        #[test]
        fn test_acquisition_rate_needs_two_samples() {
            assert!(acquisition_rate(&[]).is_nan());
            assert!(acquisition_rate(&[5.0]).is_nan());
            assert!(acquisition_rate(&[5.0, 5.0]).is_nan());
            assert!((acquisition_rate(&[0.0, 0.5, 1.0, 1.5]) - 2.0).abs() < 1e-12);
        }

        #[test]
        fn test_acquisition_rate_ignores_nan() {
            let rate = acquisition_rate(&[0.0, f64::NAN, 1.0, 2.0]);
            assert!((rate - 1.0).abs() < 1e-12);
        }

        #[test]
        fn test_median_timestamp() {
            let expected = Utc.with_ymd_and_hms(2020, 9, 13, 12, 26, 40).unwrap();
            let t = expected.timestamp() as f64;
            assert_eq!(
                median_timestamp(&[t - 10.0, t, t + 10.0, f64::NAN]),
                Some(expected)
            );
            assert_eq!(median_timestamp(&[t - 1.0, t + 1.0]), Some(expected));
            assert_eq!(median_timestamp(&[f64::NAN]), None);
        }

        #[test]
        fn test_pressure_rate() {
            let rate = pressure_rate(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 2.0, 6.0]);
            assert_eq!(rate, vec![1.0, 1.0, 2.5, 4.0]);
            assert!(pressure_rate(&[0.0], &[1.0])[0].is_nan());
        }
    }

    mod deployment_tests {
        use super::*;

        fn aligned_deployment() -> Deployment {
            let ctd = (0..3)
                .map(|n| ProfileRecord::empty(InstrumentStream::Ctd, n))
                .collect();
            let eng = (0..3)
                .map(|n| ProfileRecord::empty(InstrumentStream::Engineering, n))
                .collect();
            Deployment::new("test mooring", ctd, eng)
        }

        #[test]
        fn test_aligned_deployment_validates() {
            let deployment = aligned_deployment();
            assert!(deployment.validate().is_ok());
            assert_eq!(deployment.profile_count(), 3);
            assert_eq!(deployment.processable_profile_numbers(), vec![1, 2]);
        }

        #[test]
        fn test_misaligned_profile_numbers_rejected() {
            let mut deployment = aligned_deployment();
            deployment.eng[2].profile_number = 9;
            assert!(deployment.validate().is_err());
        }

        #[test]
        fn test_length_mismatch_rejected() {
            let mut deployment = aligned_deployment();
            deployment.eng.pop();
            assert!(deployment.validate().is_err());
        }

        #[test]
        fn test_swapped_streams_rejected() {
            let mut deployment = aligned_deployment();
            deployment.ctd[1].stream = InstrumentStream::Engineering;
            assert!(deployment.validate().is_err());
        }
    }

    #[test]
    fn test_serde_round_trip_with_nan() {
        let mut record = create_test_record();
        record.pressure[4] = f64::NAN;
        record.acquisition_rate_hz = f64::NAN;

        let json = serde_json::to_string(&record).unwrap();
        let back: ProfileRecord = serde_json::from_str(&json).unwrap();

        assert!(back.pressure[4].is_nan());
        assert!(back.acquisition_rate_hz.is_nan());
        assert_eq!(back.profile_mask, record.profile_mask);
        assert_eq!(back.provenance, record.provenance);
        assert_eq!(back.profile_date, record.profile_date);
    }
}
