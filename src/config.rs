//! Configuration management and validation.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then `MMP_*` environment variables, then command-line overrides applied by
//! the CLI layer.

use crate::app::services::profile_processor::QualityThresholds;
use crate::constants::{
    self, APP_CONFIG_DIR, CONFIG_FILE_NAME, DEFAULT_BACKTRACK_PROCESSING_FLAG,
    DEFAULT_CTD_PRESSURE_NPTS_MIN, DEFAULT_CTD_PRESSURE_RANGE_MIN_DB,
    DEFAULT_ENG_PRESSURE_NPTS_MIN, DEFAULT_ENG_PRESSURE_RANGE_MIN_DB, DEFAULT_LOG_LEVEL,
    THRESHOLD_DISABLED, backtrack_codes, env_vars,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Log levels accepted by the logging configuration
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub processing: ProcessingConfig,
    pub quality_control: QualityControlConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
}

/// Pipeline behaviour settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Backtrack policy code (1, 2 or 3); other values are reported per profile
    pub backtrack_processing_flag: i32,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            backtrack_processing_flag: DEFAULT_BACKTRACK_PROCESSING_FLAG,
        }
    }
}

/// Minimum coverage thresholds, one pair per stream
///
/// A profile is voided when its pressure point count is `<=` the `npts_min`
/// value or its pressure range is `<=` the `range_min_db` value. `-1` disables
/// a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityControlConfig {
    pub eng_pressure_npts_min: i64,
    pub eng_pressure_range_min_db: f64,
    pub ctd_pressure_npts_min: i64,
    pub ctd_pressure_range_min_db: f64,
}

impl Default for QualityControlConfig {
    fn default() -> Self {
        Self {
            eng_pressure_npts_min: DEFAULT_ENG_PRESSURE_NPTS_MIN,
            eng_pressure_range_min_db: DEFAULT_ENG_PRESSURE_RANGE_MIN_DB,
            ctd_pressure_npts_min: DEFAULT_CTD_PRESSURE_NPTS_MIN,
            ctd_pressure_range_min_db: DEFAULT_CTD_PRESSURE_RANGE_MIN_DB,
        }
    }
}

impl QualityControlConfig {
    /// Configuration with every test disabled
    pub fn disabled() -> Self {
        Self {
            eng_pressure_npts_min: THRESHOLD_DISABLED,
            eng_pressure_range_min_db: THRESHOLD_DISABLED as f64,
            ctd_pressure_npts_min: THRESHOLD_DISABLED,
            ctd_pressure_range_min_db: THRESHOLD_DISABLED as f64,
        }
    }

    pub fn eng_thresholds(&self) -> QualityThresholds {
        QualityThresholds::new(self.eng_pressure_npts_min, self.eng_pressure_range_min_db)
    }

    pub fn ctd_thresholds(&self) -> QualityThresholds {
        QualityThresholds::new(self.ctd_pressure_npts_min, self.ctd_pressure_range_min_db)
    }
}

/// Parallelism settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Process profiles on a worker pool instead of sequentially
    pub parallel: bool,

    /// Number of worker threads
    pub workers: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            workers: num_cpus::get(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Default config file location (`<config dir>/mmp-processor/config.toml`)
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_CONFIG_DIR).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))
    }

    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::file_read(
                path,
                format!("Failed to read config file '{}'", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&contents, &path.display().to_string())
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::config_parsing(origin, e))
    }

    /// Load with the layered approach (defaults -> file -> environment)
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(std::env::vars())?;
        Ok(config)
    }

    /// Apply `MMP_*` overrides from an iterator of environment variables
    pub fn apply_env_overrides<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if !key.starts_with(env_vars::PREFIX) {
                continue;
            }
            match key.as_str() {
                env_vars::BACKTRACK_PROCESSING_FLAG => {
                    self.processing.backtrack_processing_flag = parse_env(&key, &value)?;
                }
                env_vars::ENG_PRESSURE_NPTS_MIN => {
                    self.quality_control.eng_pressure_npts_min = parse_env(&key, &value)?;
                }
                env_vars::ENG_PRESSURE_RANGE_MIN_DB => {
                    self.quality_control.eng_pressure_range_min_db = parse_env(&key, &value)?;
                }
                env_vars::CTD_PRESSURE_NPTS_MIN => {
                    self.quality_control.ctd_pressure_npts_min = parse_env(&key, &value)?;
                }
                env_vars::CTD_PRESSURE_RANGE_MIN_DB => {
                    self.quality_control.ctd_pressure_range_min_db = parse_env(&key, &value)?;
                }
                env_vars::WORKERS => {
                    self.performance.workers = parse_env(&key, &value)?;
                }
                env_vars::LOG_LEVEL => {
                    self.logging.level = value.trim().to_lowercase();
                }
                _ => debug!("Ignoring unrecognised environment variable {}", key),
            }
        }
        Ok(())
    }

    /// Validate configuration values
    ///
    /// An unrecognised backtrack code is not rejected here: the flagger records
    /// it per profile and leaves masks untouched.
    pub fn validate(&self) -> Result<()> {
        if !backtrack_codes::ALL.contains(&self.processing.backtrack_processing_flag) {
            warn!(
                "Backtrack processing flag {} is not one of {:?}; engineering masks will not be flagged",
                self.processing.backtrack_processing_flag,
                backtrack_codes::ALL
            );
        }

        let qc = &self.quality_control;
        for (name, value) in [
            ("eng_pressure_npts_min", qc.eng_pressure_npts_min),
            ("ctd_pressure_npts_min", qc.ctd_pressure_npts_min),
        ] {
            if value < constants::THRESHOLD_DISABLED {
                return Err(Error::configuration(format!(
                    "{} must be -1 (disabled) or non-negative, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("eng_pressure_range_min_db", qc.eng_pressure_range_min_db),
            ("ctd_pressure_range_min_db", qc.ctd_pressure_range_min_db),
        ] {
            if !value.is_finite() || value < constants::THRESHOLD_DISABLED as f64 {
                return Err(Error::configuration(format!(
                    "{} must be -1 (disabled) or a finite non-negative value, got {}",
                    name, value
                )));
            }
        }

        if self.performance.workers == 0 {
            return Err(Error::configuration("workers must be at least 1"));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::configuration(format!(
                "Invalid log level '{}', expected one of {:?}",
                self.logging.level, VALID_LOG_LEVELS
            )));
        }

        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::configuration(format!(
            "Environment variable {} has invalid value '{}'",
            key, value
        ))
    })
}
