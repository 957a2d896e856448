//! Profile processing module for McLane Moored Profiler deployments
//!
//! This module reconciles the good-data masks of the CTD and engineering
//! streams of each profile and voids profiles with too little coverage. Every
//! step appends to the record's provenance log so downstream consumers can see
//! what happened to each profile.
//!
//! # Architecture
//!
//! - [`processor`] - Main ProfileProcessor struct and pipeline orchestration
//! - [`backtrack`] - Engineering-stream backtrack flagging
//! - [`synchronization`] - CTD/engineering mask synchronization
//! - [`quality_filter`] - Minimum point-count and pressure-range filtering
//! - [`stats`] - Processing statistics and result structures
//!
//! # Processing Pipeline
//!
//! 1. **Backtrack Flagging**: Mark engineering samples recorded during stalls or reversals
//! 2. **Mask Synchronization**: Keep only samples both streams consider good
//! 3. **Quality Filtering**: Empty the payload of short or shallow profiles
//!
//! Profile number 0 is never processed.
//!
//! # Example Usage
//!
//! ```rust
//! use mmp_processor::app::services::profile_processor::ProfileProcessor;
//! use mmp_processor::Config;
//!
//! # fn example(deployment: mmp_processor::Deployment) -> mmp_processor::Result<()> {
//! let processor = ProfileProcessor::new(Config::default());
//! let result = processor.process(deployment, false)?;
//!
//! println!("Processing summary: {}", result.summary());
//! println!("Processed {} profiles", result.profile_count());
//! # Ok(())
//! # }
//! ```

pub mod backtrack;
pub mod processor;
pub mod quality_filter;
pub mod stats;
pub mod synchronization;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use backtrack::{BacktrackPolicy, FlagOutcome, flag_backtrack, flag_backtrack_with_timeshift};
pub use processor::{PipelineSteps, ProfileProcessor};
pub use quality_filter::{QualityThresholds, VoidReport, fails_thresholds, void_short_profiles};
pub use stats::{ProcessingResult, ProcessingStats};
pub use synchronization::{SyncOutcome, sync_masks};
