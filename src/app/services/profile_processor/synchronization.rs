//! CTD / engineering mask synchronization
//!
//! The CTD and engineering streams of one profile are sampled by independent
//! clocks. Each stream's mask is resampled onto the other stream's timestamps
//! by linear interpolation (0 outside the other stream's time range) and a
//! sample stays good only where its own mask is true and the resampled value is
//! exactly 1.0. A fractional value means the sample sits between a good and a
//! bad sample of the other stream, so it is not inside a validated interval.
//!
//! Afterwards the engineering stream adopts pressure and dP/dt interpolated
//! from the more accurate CTD stream, so binning downstream uses one pressure
//! reference.

use crate::app::models::{ProcessingStage, ProfileRecord};
use crate::app::services::interpolation::{Extrapolation, LinearInterpolant, mask_to_f64};
use crate::constants::status;
use tracing::{debug, warn};

/// Result of synchronizing one CTD/engineering pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Masks combined and engineering pressure replaced
    Synced,
    /// A required sequence was empty; nothing combined
    NotSynced,
    /// CTD timestamps missing or non-finite; CTD mask flagged bad
    TimingFault,
}

/// Synchronize the masks of a CTD record and its paired engineering record
pub fn sync_masks(ctd: &mut ProfileRecord, eng: &mut ProfileRecord) -> SyncOutcome {
    // The profile date is only reliably known from the engineering clock
    ctd.profile_date = eng.profile_date;
    ctd.backtrack_flag = eng.backtrack_flag;

    ctd.provenance.push_stage(ProcessingStage::SyncMasks);
    eng.provenance.push_stage(ProcessingStage::SyncMasks);

    if eng.pressure.is_empty() || ctd.pressure.is_empty() || eng.time.is_empty() {
        debug!(
            "Profile {}: empty stream data, masks not synchronized",
            ctd.profile_number
        );
        ctd.provenance.push_status(status::NOT_SYNCED);
        eng.provenance.push_status(status::NOT_SYNCED);
        return SyncOutcome::NotSynced;
    }

    eng.profile_direction = ctd.profile_direction;

    if ctd.time.is_empty() || ctd.time.iter().any(|t| !t.is_finite()) {
        warn!(
            "Profile {}: CTD timestamps missing or non-finite, CTD mask flagged bad",
            ctd.profile_number
        );
        let n = ctd.pressure.len();
        ctd.profile_mask = vec![false; n];
        ctd.time = vec![f64::NAN; n];
        ctd.provenance.push_status(status::MASK_FLAGGED_BAD);
        eng.provenance.push_status(status::NOT_SYNCED);
        return SyncOutcome::TimingFault;
    }

    let ctd_from_eng = LinearInterpolant::new(
        &eng.time,
        &mask_to_f64(&eng.profile_mask),
        Extrapolation::Fill(0.0),
    )
    .resample(&ctd.time);
    let eng_from_ctd = LinearInterpolant::new(
        &ctd.time,
        &mask_to_f64(&ctd.profile_mask),
        Extrapolation::Fill(0.0),
    )
    .resample(&eng.time);

    restrict_to_good_interval(&mut ctd.profile_mask, &ctd_from_eng);
    restrict_to_good_interval(&mut eng.profile_mask, &eng_from_ctd);

    let nan_fill = Extrapolation::Fill(f64::NAN);
    eng.pressure = LinearInterpolant::new(&ctd.time, &ctd.pressure, nan_fill).resample(&eng.time);
    eng.dpdt = if ctd.dpdt.len() == ctd.time.len() {
        LinearInterpolant::new(&ctd.time, &ctd.dpdt, nan_fill).resample(&eng.time)
    } else {
        warn!(
            "Profile {}: CTD dP/dt has {} values for {} samples, engineering dP/dt set to NaN",
            ctd.profile_number,
            ctd.dpdt.len(),
            ctd.time.len()
        );
        vec![f64::NAN; eng.time.len()]
    };

    debug!(
        "Profile {}: synchronized, {} CTD and {} ENG samples remain good",
        ctd.profile_number,
        ctd.good_sample_count(),
        eng.good_sample_count()
    );

    ctd.provenance.push_status(status::SYNCED);
    eng.provenance.push_status(status::SYNCED);
    SyncOutcome::Synced
}

/// AND a mask with "resampled value is exactly 1.0"
fn restrict_to_good_interval(mask: &mut [bool], resampled: &[f64]) {
    for (good, &value) in mask.iter_mut().zip(resampled) {
        *good = *good && value == 1.0;
    }
}
