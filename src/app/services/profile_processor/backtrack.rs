//! Backtrack flagging for engineering-stream profiles
//!
//! A backtrack is an episode where the profiler stalls or reverses mid-cast.
//! The raw engineering pressure sensor reports exactly zero during such an
//! episode, which is also its natural value before profiling starts, so the
//! import-time mask (`pressure != 0`) already marks those samples bad. This
//! module decides how much of the surrounding data to discard.

use crate::app::models::{ProcessingStage, ProfileRecord};
use crate::constants::{BACKTRACK_TIMESHIFT_SECONDS, backtrack_codes, status};
use tracing::{debug, warn};

/// Backtrack handling policy selected by a configuration code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktrackPolicy {
    /// Code 1: the whole profile is bad
    FlagEntireProfile,
    /// Code 2: good until shortly before the first backtrack, bad afterwards
    FlagAfterFirstBacktrack,
    /// Code 3: bad only where raw pressure is exactly zero
    FlagZeroPressureOnly,
}

impl BacktrackPolicy {
    /// Map a configuration code to a policy
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            backtrack_codes::FLAG_ENTIRE_PROFILE => Some(Self::FlagEntireProfile),
            backtrack_codes::FLAG_AFTER_FIRST_BACKTRACK => Some(Self::FlagAfterFirstBacktrack),
            backtrack_codes::FLAG_ZERO_PRESSURE_ONLY => Some(Self::FlagZeroPressureOnly),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::FlagEntireProfile => backtrack_codes::FLAG_ENTIRE_PROFILE,
            Self::FlagAfterFirstBacktrack => backtrack_codes::FLAG_AFTER_FIRST_BACKTRACK,
            Self::FlagZeroPressureOnly => backtrack_codes::FLAG_ZERO_PRESSURE_ONLY,
        }
    }
}

/// Result of flagging one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    /// Mask updated under the given policy
    Flagged(BacktrackPolicy),
    /// Record had no pressure data
    NotFlagged,
    /// Code not recognised; mask untouched
    IllegalCode(i32),
}

/// Flag backtrack episodes with the default 75 s timeshift
pub fn flag_backtrack(record: &mut ProfileRecord, code: i32) -> FlagOutcome {
    flag_backtrack_with_timeshift(record, code, BACKTRACK_TIMESHIFT_SECONDS)
}

/// Flag backtrack episodes in an engineering record's mask
///
/// Codes 1 and 3 replace the mask wholesale; code 2 only clears entries from
/// `timeshift_seconds` before the first `true -> false` step onwards. The stage
/// identifier is always recorded.
pub fn flag_backtrack_with_timeshift(
    record: &mut ProfileRecord,
    code: i32,
    timeshift_seconds: f64,
) -> FlagOutcome {
    record.provenance.push_stage(ProcessingStage::FlagBacktrack);

    if record.pressure.is_empty() {
        debug!(
            "Profile {}: no pressure data, backtrack not flagged",
            record.profile_number
        );
        record.provenance.push_status(status::BACKTRACK_NOT_FLAGGED);
        return FlagOutcome::NotFlagged;
    }

    let Some(policy) = BacktrackPolicy::from_code(code) else {
        warn!(
            "Profile {}: illegal backtrack code {}, mask left unchanged",
            record.profile_number, code
        );
        record.provenance.push_status(status::BACKTRACK_ILLEGAL_CODE);
        return FlagOutcome::IllegalCode(code);
    };

    match policy {
        BacktrackPolicy::FlagEntireProfile => {
            record.profile_mask = vec![false; record.profile_mask.len()];
        }
        BacktrackPolicy::FlagAfterFirstBacktrack => {
            let shift = timeshift_samples(record.acquisition_rate_hz, timeshift_seconds);
            match first_true_to_false(&record.profile_mask) {
                Some(onset) => {
                    let start = onset.saturating_sub(shift);
                    debug!(
                        "Profile {}: first backtrack at sample {}, flagging from sample {}",
                        record.profile_number, onset, start
                    );
                    record.profile_mask[start..].fill(false);
                }
                None => debug!(
                    "Profile {}: no backtrack transition found, mask unchanged",
                    record.profile_number
                ),
            }
        }
        BacktrackPolicy::FlagZeroPressureOnly => {
            record.profile_mask = record.pressure.iter().map(|&p| p != 0.0).collect();
        }
    }

    record
        .provenance
        .push_status(format!("{} {}", status::BACKTRACK_FLAGGED_PREFIX, code));
    FlagOutcome::Flagged(policy)
}

/// Index of the first decreasing step in the mask
///
/// The step at `i` runs from `mask[i] == true` to `mask[i + 1] == false`, so
/// the returned index is the last good sample before the first backtrack.
pub fn first_true_to_false(mask: &[bool]) -> Option<usize> {
    mask.windows(2).position(|pair| pair[0] && !pair[1])
}

/// Number of samples covering `seconds` at `rate_hz`, rounded up
///
/// A non-finite or non-positive rate yields no shift.
pub fn timeshift_samples(rate_hz: f64, seconds: f64) -> usize {
    let samples = (rate_hz * seconds).ceil();
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}
