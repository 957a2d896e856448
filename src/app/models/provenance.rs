//! Append-only provenance trail for profile records
//!
//! Each processing stage that touches a record appends its stage identifier to
//! `operation_history` and, when it has something to say, a human-readable
//! entry to `data_status`. Entries are never removed or rewritten.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a processing stage recorded in a record's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    /// Record populated by the external importer
    Import,
    /// Backtrack flagging of the engineering stream
    FlagBacktrack,
    /// CTD/engineering mask synchronization
    SyncMasks,
    /// Minimum coverage quality filter
    VoidShortProfiles,
}

impl ProcessingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStage::Import => "import",
            ProcessingStage::FlagBacktrack => "flag_backtrack",
            ProcessingStage::SyncMasks => "sync_masks",
            ProcessingStage::VoidShortProfiles => "void_short_profiles",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status and operation history of one profile record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceLog {
    #[serde(default)]
    data_status: Vec<String>,
    #[serde(default)]
    operation_history: Vec<ProcessingStage>,
}

impl ProvenanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a status string
    pub fn push_status(&mut self, status: impl Into<String>) {
        self.data_status.push(status.into());
    }

    /// Append a stage identifier
    pub fn push_stage(&mut self, stage: ProcessingStage) {
        self.operation_history.push(stage);
    }

    /// Append a stage identifier together with its status string
    pub fn record(&mut self, stage: ProcessingStage, status: impl Into<String>) {
        self.push_stage(stage);
        self.push_status(status);
    }

    pub fn data_status(&self) -> &[String] {
        &self.data_status
    }

    pub fn operation_history(&self) -> &[ProcessingStage] {
        &self.operation_history
    }

    pub fn last_status(&self) -> Option<&str> {
        self.data_status.last().map(String::as_str)
    }

    /// Check whether any status entry equals `status`
    pub fn has_status(&self, status: &str) -> bool {
        self.data_status.iter().any(|s| s == status)
    }

    /// Check whether the stage has been applied at least once
    pub fn has_stage(&self, stage: ProcessingStage) -> bool {
        self.operation_history.contains(&stage)
    }

    pub fn is_empty(&self) -> bool {
        self.data_status.is_empty() && self.operation_history.is_empty()
    }

    /// Status trail joined for display
    pub fn trail(&self) -> String {
        self.data_status.join(" | ")
    }
}
