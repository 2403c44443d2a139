//! Run report: what every frame step did to every track, and why the run
//! ended.
//!
//! Per-track step outcomes use `bitflags` so one record can carry, e.g.,
//! `SEEDED | REFINED | DRIFT_EXCEEDED`.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use meshprop_common::track::{Direction, FrameIndex, StepPlan, TrackId};

use crate::drift::DriftSummary;
use crate::propagation::Baseline;

bitflags! {
    /// What happened to one track during one frame step.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TrackStepFlags: u8 {
        /// A mesh already existed at the target frame; no seeding call made.
        const ALREADY_PRESENT = 0x01;
        /// Seeded from the source frame this step.
        const SEEDED          = 0x02;
        /// Seeding failed; track skipped for this frame.
        const SEED_FAILED     = 0x04;
        /// Ran the deform/remesh cycles and was measured.
        const REFINED         = 0x08;
        /// Volume drift over threshold. Stops the batch after this step.
        const DRIFT_EXCEEDED  = 0x10;
    }
}

impl Default for TrackStepFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// One track's outcome for one frame step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackStepRecord {
    /// Track.
    pub track: TrackId,
    /// Outcome flags.
    pub flags: TrackStepFlags,
    /// Volume after refinement (None if not refined).
    pub volume: Option<f64>,
    /// Drift against baseline (None if not refined).
    pub drift: Option<f64>,
}

impl TrackStepRecord {
    pub(crate) fn new(track: TrackId) -> Self {
        Self {
            track,
            flags: TrackStepFlags::empty(),
            volume: None,
            drift: None,
        }
    }

    /// Whether this track now has a refined mesh at the step's target frame.
    #[inline]
    pub fn advanced(&self) -> bool {
        self.flags.contains(TrackStepFlags::REFINED)
    }
}

/// Everything one frame step did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    /// Source frame.
    pub from: FrameIndex,
    /// Target frame, the active frame for refinement.
    pub to: FrameIndex,
    /// Per-track outcomes, in batch order.
    pub tracks: Vec<TrackStepRecord>,
    /// Drift evaluation across the refined tracks.
    pub drift: DriftSummary,
}

impl StepRecord {
    /// If true, this step set the batch stop flag.
    #[inline]
    pub fn stop_required(&self) -> bool {
        self.drift.stop_required()
    }

    /// Number of tracks refined this step.
    pub fn refined_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.advanced()).count()
    }

    /// Outcome for `track`, if it is in the batch.
    pub fn track(&self, track: TrackId) -> Option<&TrackStepRecord> {
        self.tracks.iter().find(|t| t.track == track)
    }
}

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// Every planned step ran (possibly zero, possibly clamped).
    Completed,
    /// A track drifted too far; the run ended after `frame` was refined.
    DriftExceeded {
        /// Frame whose refinement triggered the stop.
        frame: FrameIndex,
        /// Offending tracks in batch order.
        offenders: Vec<TrackId>,
    },
}

/// Result of one `propagate` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropagationReport {
    /// Requested vs. clamped step count.
    pub plan: StepPlan,
    /// Frame the run ended on.
    pub final_frame: FrameIndex,
    /// Baseline volumes captured before the first step.
    pub baselines: Vec<Baseline>,
    /// Steps that ran, in order.
    pub steps: Vec<StepRecord>,
    /// Why the run ended.
    pub stop: StopReason,
}

impl PropagationReport {
    /// Direction of the run.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.plan.direction
    }

    /// Number of frame steps performed.
    #[inline]
    pub fn steps_completed(&self) -> usize {
        self.steps.len()
    }

    /// Whether the drift criterion ended the run.
    #[inline]
    pub fn stopped_by_drift(&self) -> bool {
        matches!(self.stop, StopReason::DriftExceeded { .. })
    }

    /// Frames `track` was refined into during this run, in order.
    pub fn frames_advanced(&self, track: TrackId) -> Vec<FrameIndex> {
        self.steps
            .iter()
            .filter(|s| s.track(track).is_some_and(TrackStepRecord::advanced))
            .map(|s| s.to)
            .collect()
    }

    /// Largest drift seen across the whole run.
    pub fn max_drift(&self) -> f64 {
        self.steps
            .iter()
            .map(|s| s.drift.max_drift)
            .fold(0.0, f64::max)
    }

    /// One-line human summary; drift shown as a percentage.
    pub fn summary(&self) -> String {
        let clamp = if self.plan.is_clamped() {
            format!(" (clamped from {})", self.plan.requested)
        } else {
            String::new()
        };
        let ending = match &self.stop {
            StopReason::Completed => "completed".to_string(),
            StopReason::DriftExceeded { frame, offenders } => {
                let names: Vec<String> = offenders.iter().map(ToString::to_string).collect();
                format!("stopped at frame {frame} by {}", names.join(", "))
            }
        };
        format!(
            "{} {}/{} steps{} from frame {} to {}: {}, max drift {:.1}%",
            self.plan.direction,
            self.steps.len(),
            self.plan.planned,
            clamp,
            self.plan.start_frame,
            self.final_frame,
            ending,
            self.max_drift() * 100.0,
        )
    }
}
