//! Volume-drift evaluation.
//!
//! Drift is the absolute fractional change of a track's enclosed volume
//! against its run-start baseline:
//!
//! ```text
//! drift = |v - v0| / v0
//! ```
//!
//! A track *exceeds* when `drift > max_volume_change`. Equality does not
//! trigger. The baseline is never the previous frame's volume, so slow
//! cumulative drift is still caught.

use meshprop_common::track::TrackId;
use serde::Serialize;

/// Absolute fractional change of `volume` relative to `baseline`.
///
/// `baseline` must be positive; the controller rejects other baselines
/// before the first step.
#[inline]
pub fn fractional_drift(volume: f64, baseline: f64) -> f64 {
    (volume - baseline).abs() / baseline
}

/// Strict threshold test. NaN drift counts as exceeded.
#[inline]
pub fn exceeds(drift: f64, max_volume_change: f64) -> bool {
    drift.is_nan() || drift > max_volume_change
}

/// Result of measuring one track after refinement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriftCheck {
    /// Measured track.
    pub track: TrackId,
    /// Run-start volume.
    pub baseline: f64,
    /// Volume after this step's refinement.
    pub volume: f64,
    /// `|volume - baseline| / baseline`.
    pub drift: f64,
    /// Whether `drift` is over the threshold.
    pub exceeded: bool,
}

impl DriftCheck {
    /// Measure `volume` against `baseline` with threshold `max_volume_change`.
    pub fn evaluate(track: TrackId, baseline: f64, volume: f64, max_volume_change: f64) -> Self {
        let drift = fractional_drift(volume, baseline);
        Self {
            track,
            baseline,
            volume,
            drift,
            exceeded: exceeds(drift, max_volume_change),
        }
    }
}

/// Outcome of evaluating every measured track in one frame step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DriftSummary {
    /// Tracks over the threshold, in batch order.
    pub offenders: Vec<DriftCheck>,
    /// Largest drift seen this step (0.0 if nothing was measured).
    pub max_drift: f64,
}

impl DriftSummary {
    /// Fold one check into the summary.
    pub fn record(&mut self, check: DriftCheck) {
        if check.drift > self.max_drift || check.drift.is_nan() {
            self.max_drift = check.drift;
        }
        if check.exceeded {
            self.offenders.push(check);
        }
    }

    /// If true, the batch must stop after this step.
    #[inline]
    pub fn stop_required(&self) -> bool {
        !self.offenders.is_empty()
    }

    /// First offending track in batch order (for diagnostics).
    pub fn first_offender(&self) -> Option<TrackId> {
        self.offenders.first().map(|c| c.track)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
