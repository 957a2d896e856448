//! Application constants for the MMP processor
//!
//! This module contains the status strings, stage identifiers, default thresholds
//! and environment variable names used throughout the profile processing pipeline.

// =============================================================================
// Backtrack Handling
// =============================================================================

/// Backtrack policy codes accepted by the flagger
pub mod backtrack_codes {
    /// Flag the entire profile bad
    pub const FLAG_ENTIRE_PROFILE: i32 = 1;

    /// Flag data good until just before the first backtrack
    pub const FLAG_AFTER_FIRST_BACKTRACK: i32 = 2;

    /// Flag bad only the sections where raw pressure reads exactly zero
    pub const FLAG_ZERO_PRESSURE_ONLY: i32 = 3;

    /// All recognised codes
    pub const ALL: &[i32] = &[
        FLAG_ENTIRE_PROFILE,
        FLAG_AFTER_FIRST_BACKTRACK,
        FLAG_ZERO_PRESSURE_ONLY,
    ];
}

/// Margin subtracted ahead of the first detected backtrack (seconds).
///
/// The pressure plateau that triggers detection lags the real stall onset by
/// roughly one minute.
pub const BACKTRACK_TIMESHIFT_SECONDS: f64 = 75.0;

// =============================================================================
// Provenance Status Strings
// =============================================================================

/// Status strings appended to a record's `data_status` trail
pub mod status {
    pub const BACKTRACK_NOT_FLAGGED: &str = "backtrack NOT FLAGGED";
    pub const BACKTRACK_ILLEGAL_CODE: &str = "ILLEGAL backtrack code";
    pub const BACKTRACK_FLAGGED_PREFIX: &str = "backtrack FLAGGED: code";

    pub const NOT_SYNCED: &str = "NOT SYNC'ED";
    pub const MASK_FLAGGED_BAD: &str = "MASK FLAGGED BAD";
    pub const SYNCED: &str = "sync'ed";

    pub const ALL_DATA_SET_TO_EMPTY: &str = "allDataSetToEMPTY";
    pub const NO_CHANGE: &str = "noChange";

    pub const IMPORTED: &str = "imported";
}

// =============================================================================
// Quality Control Defaults
// =============================================================================

/// Default minimum engineering pressure point count (profiles with n <= this are voided)
pub const DEFAULT_ENG_PRESSURE_NPTS_MIN: i64 = 20;

/// Default minimum engineering pressure range in dbar
pub const DEFAULT_ENG_PRESSURE_RANGE_MIN_DB: f64 = 10.0;

/// Default minimum CTD pressure point count
pub const DEFAULT_CTD_PRESSURE_NPTS_MIN: i64 = 100;

/// Default minimum CTD pressure range in dbar
pub const DEFAULT_CTD_PRESSURE_RANGE_MIN_DB: f64 = 10.0;

/// Threshold value that disables a point-count or range test
pub const THRESHOLD_DISABLED: i64 = -1;

/// Default backtrack processing code
pub const DEFAULT_BACKTRACK_PROCESSING_FLAG: i32 = backtrack_codes::FLAG_AFTER_FIRST_BACKTRACK;

// =============================================================================
// Configuration and Environment
// =============================================================================

/// Default configuration file name inside the user config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name under the user config directory
pub const APP_CONFIG_DIR: &str = "mmp-processor";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overrides
pub mod env_vars {
    pub const BACKTRACK_PROCESSING_FLAG: &str = "MMP_BACKTRACK_PROCESSING_FLAG";
    pub const ENG_PRESSURE_NPTS_MIN: &str = "MMP_ENG_PRESSURE_NPTS_MIN";
    pub const ENG_PRESSURE_RANGE_MIN_DB: &str = "MMP_ENG_PRESSURE_RANGE_MIN_DB";
    pub const CTD_PRESSURE_NPTS_MIN: &str = "MMP_CTD_PRESSURE_NPTS_MIN";
    pub const CTD_PRESSURE_RANGE_MIN_DB: &str = "MMP_CTD_PRESSURE_RANGE_MIN_DB";
    pub const WORKERS: &str = "MMP_WORKERS";
    pub const LOG_LEVEL: &str = "MMP_LOG_LEVEL";

    /// Prefix shared by every override
    pub const PREFIX: &str = "MMP_";
}
