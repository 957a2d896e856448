//! Sensor field identifiers and payload containers
//!
//! Every channel a profile record can carry is named by a closed [`SensorField`]
//! enum, so batch operations such as voiding address fields by name.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::nan_vec;

/// Identifier for every field of a profile record that holds per-sample data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorField {
    /// Sample timestamps
    Time,
    /// Pressure in dbar
    Pressure,
    /// Pressure rate of change in dbar/s
    Dpdt,
    /// Per-sample validity mask
    ProfileMask,
    Temperature,
    Conductivity,
    Salinity,
    Oxygen,
    Turbidity,
    Chlorophyll,
    Par,
    /// Engineering battery voltage
    Voltage,
    /// Engineering motor current
    Current,
    /// Acoustic current meter velocity components (one column per component)
    Velocity,
}

impl SensorField {
    /// Fields stored directly on the record rather than in the channel map
    pub const CORE: [SensorField; 4] = [
        SensorField::Time,
        SensorField::Pressure,
        SensorField::Dpdt,
        SensorField::ProfileMask,
    ];

    /// Get the snake_case name used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorField::Time => "time",
            SensorField::Pressure => "pressure",
            SensorField::Dpdt => "dpdt",
            SensorField::ProfileMask => "profile_mask",
            SensorField::Temperature => "temperature",
            SensorField::Conductivity => "conductivity",
            SensorField::Salinity => "salinity",
            SensorField::Oxygen => "oxygen",
            SensorField::Turbidity => "turbidity",
            SensorField::Chlorophyll => "chlorophyll",
            SensorField::Par => "par",
            SensorField::Voltage => "voltage",
            SensorField::Current => "current",
            SensorField::Velocity => "velocity",
        }
    }

    /// Check whether the field is one of the record's core sequences
    pub fn is_core(&self) -> bool {
        Self::CORE.contains(self)
    }
}

impl fmt::Display for SensorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SensorField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let field = match s.trim().to_lowercase().as_str() {
            "time" => SensorField::Time,
            "pressure" => SensorField::Pressure,
            "dpdt" => SensorField::Dpdt,
            "profile_mask" => SensorField::ProfileMask,
            "temperature" => SensorField::Temperature,
            "conductivity" => SensorField::Conductivity,
            "salinity" => SensorField::Salinity,
            "oxygen" => SensorField::Oxygen,
            "turbidity" => SensorField::Turbidity,
            "chlorophyll" => SensorField::Chlorophyll,
            "par" => SensorField::Par,
            "voltage" => SensorField::Voltage,
            "current" => SensorField::Current,
            "velocity" => SensorField::Velocity,
            other => {
                return Err(Error::configuration(format!(
                    "Unknown sensor field '{}'",
                    other
                )));
            }
        };
        Ok(field)
    }
}

// =============================================================================
// Sensor Payload
// =============================================================================

/// Two-dimensional sample block stored row-major (one row per sample)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMatrix {
    columns: usize,
    #[serde(with = "nan_vec")]
    values: Vec<f64>,
}

impl SampleMatrix {
    /// Create a matrix from row-major values
    pub fn new(columns: usize, values: Vec<f64>) -> Result<Self> {
        let ragged = if columns == 0 {
            !values.is_empty()
        } else {
            values.len() % columns != 0
        };
        if ragged {
            return Err(Error::deployment_validation(format!(
                "Matrix with {} columns cannot hold {} values",
                columns,
                values.len()
            )));
        }
        Ok(Self { columns, values })
    }

    /// Create a matrix with the given column count and no rows
    pub fn empty(columns: usize) -> Self {
        Self {
            columns,
            values: Vec::new(),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            0
        } else {
            self.values.len() / self.columns
        }
    }

    /// Get a single row, if present
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.rows() {
            return None;
        }
        let start = index * self.columns;
        Some(&self.values[start..start + self.columns])
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Drop every row, keeping the column count
    pub fn clear_rows(&mut self) {
        self.values.clear();
    }
}

/// Per-sample payload of one sensor channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SensorData {
    /// One value per sample
    Series(#[serde(with = "nan_vec")] Vec<f64>),
    /// Several values per sample
    Matrix(SampleMatrix),
}

impl SensorData {
    /// Number of samples (rows for matrices)
    pub fn len(&self) -> usize {
        match self {
            SensorData::Series(values) => values.len(),
            SensorData::Matrix(matrix) => matrix.rows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored values, flattened
    pub fn values(&self) -> &[f64] {
        match self {
            SensorData::Series(values) => values,
            SensorData::Matrix(matrix) => matrix.values(),
        }
    }

    /// Reset to zero samples while keeping the channel's dimensionality
    pub fn void(&mut self) {
        match self {
            SensorData::Series(values) => values.clear(),
            SensorData::Matrix(matrix) => matrix.clear_rows(),
        }
    }
}

/// Value range used by the profile quality discriminators
///
/// Returns `max - min`, or 0 when the slice is empty or holds any non-finite value.
pub fn discriminator_range(values: &[f64]) -> f64 {
    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return 0.0;
    }
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    max - min
}
