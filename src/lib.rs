//! MMP Processor Library
//!
//! A Rust library for reconciling and quality-controlling moored profiler data
//! after the raw instrument files have been unpacked and imported.
//!
//! This library provides tools for:
//! - Flagging backtrack episodes where the profiler stalls or reverses mid-cast
//! - Synchronizing CTD and engineering masks onto one consistent validity set
//! - Propagating CTD pressure and dP/dt onto the engineering stream
//! - Voiding profiles that fail minimum point-count or pressure-range checks
//! - Keeping an append-only provenance trail on every profile record

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod deployment_io;
        pub mod interpolation;
        pub mod profile_processor;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Deployment, ProfileDirection, ProfileRecord};
pub use config::Config;

/// Result type alias for the MMP processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for MMP processing operations
///
/// Per-profile conditions (empty streams, timing faults, illegal backtrack codes)
/// are not errors: they are recorded in each record's provenance trail.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error
    #[error("JSON error in '{file}': {message}")]
    Json {
        file: String,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// TOML configuration parsing error
    #[error("Configuration file '{file}' could not be parsed")]
    ConfigParsing {
        file: String,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Deployment structure error
    #[error("Deployment validation error: {message}")]
    DeploymentValidation { message: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a JSON error with context
    pub fn json(
        file: impl Into<String>,
        message: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::Json {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration parsing error
    pub fn config_parsing(file: impl Into<String>, source: toml::de::Error) -> Self {
        Self::ConfigParsing {
            file: file.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a deployment validation error
    pub fn deployment_validation(message: impl Into<String>) -> Self {
        Self::DeploymentValidation {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Map a failed read of `path`, reporting a missing file as [`Error::FileNotFound`]
    pub fn file_read(
        path: &std::path::Path,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::file_not_found(path.display().to_string())
        } else {
            Self::io(message, source)
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json {
            file: "unknown".to_string(),
            message: "JSON processing failed".to_string(),
            source: error,
        }
    }
}
