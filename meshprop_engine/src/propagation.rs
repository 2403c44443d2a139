//! Frame-propagation controller.
//!
//! Drives a [`MeshEngine`] through consecutive frame steps for a batch of
//! tracks. All run state (baselines, active frame, stop flag) lives in an
//! explicit [`BatchState`] threaded through [`step`]; nothing is read from
//! or written to ambient engine selection.
//!
//! ## Frame Step
//!
//! 1. **Seed** every track that has no mesh at `to` from its mesh at `from`.
//!    Runs for the whole batch before any refinement. A failed seed only
//!    skips that track for this frame.
//! 2. **Refine** every track with a mesh at `to`: `REFINE_CYCLES` ×
//!    {deform; remesh}, then measure the volume against the run-start
//!    baseline.
//! 3. **Stop check**: the batch stops after this step if any track
//!    exceeded the drift threshold. The step itself always finishes for
//!    every track.
//!
//! ## Fail-Fast Validation
//!
//! `propagate` refuses to start on invalid criteria, an empty or
//! duplicated batch, a start frame outside the sequence, a missing start
//! mesh, or an unusable baseline volume.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use meshprop_common::consts::REFINE_CYCLES;
use meshprop_common::criteria::Criteria;
use meshprop_common::engine::MeshEngine;
use meshprop_common::error::PropagationError;
use meshprop_common::track::{Direction, FrameIndex, MeshSlot, StepPlan, TrackId};

use crate::drift::{DriftCheck, DriftSummary};
use crate::report::{PropagationReport, StepRecord, StopReason, TrackStepFlags, TrackStepRecord};
use crate::sink::DiagnosticSink;

// ─── Batch State ────────────────────────────────────────────────────

/// Run-start volume of one track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Baseline {
    /// Track.
    pub track: TrackId,
    /// Volume at the start frame.
    pub volume: f64,
}

/// State owned by one propagation run.
///
/// Created once by [`BatchState::capture`]; each [`step`] consumes it and
/// returns the successor.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchState {
    /// Active frame: the last frame refined, or the start frame.
    frame: FrameIndex,
    /// One baseline per batch track, in batch order.
    baselines: Vec<Baseline>,
    /// Batch stop flag.
    stopped: bool,
}

impl BatchState {
    /// Measure every track once at `start_frame` and build the initial state.
    ///
    /// # Errors
    /// - `PropagationError::ZeroBaselineVolume` if a volume is not finite and positive.
    /// - `PropagationError::Engine` if the engine cannot measure a track.
    pub fn capture<E: MeshEngine + ?Sized>(
        engine: &E,
        tracks: &[TrackId],
        start_frame: FrameIndex,
    ) -> Result<Self, PropagationError> {
        let mut baselines = Vec::with_capacity(tracks.len());
        for &track in tracks {
            let slot = MeshSlot::new(track, start_frame);
            let volume = engine
                .compute_volume(slot)
                .map_err(|e| PropagationError::engine(slot, e))?;
            if !(volume.is_finite() && volume > 0.0) {
                return Err(PropagationError::ZeroBaselineVolume { track, volume });
            }
            debug!("Baseline {slot}: volume={volume}");
            baselines.push(Baseline { track, volume });
        }
        Ok(Self {
            frame: start_frame,
            baselines,
            stopped: false,
        })
    }

    /// Active frame.
    #[inline]
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    /// Baselines in batch order.
    #[inline]
    pub fn baselines(&self) -> &[Baseline] {
        &self.baselines
    }

    /// Baseline volume of `track`, if it is in the batch.
    pub fn baseline_of(&self, track: TrackId) -> Option<f64> {
        self.baselines
            .iter()
            .find(|b| b.track == track)
            .map(|b| b.volume)
    }

    /// Whether the batch stop flag is set.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

// ─── Frame Step ─────────────────────────────────────────────────────

/// One step from `from` to its neighbor `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStep {
    /// Direction of travel.
    pub direction: Direction,
    /// Source frame (already tracked).
    pub from: FrameIndex,
    /// Target frame (seeded and refined by this step).
    pub to: FrameIndex,
}

impl FrameStep {
    /// Step from `from` toward `direction`, or `None` past frame 0.
    pub fn toward(direction: Direction, from: FrameIndex) -> Option<Self> {
        direction
            .neighbor(from)
            .map(|to| Self { direction, from, to })
    }
}

/// Run one frame step for the whole batch.
///
/// `state.frame()` must equal `frame_step.from`. Returns the successor
/// state (active frame = `frame_step.to`, stop flag set if any track
/// drifted) and a record of what each track did.
///
/// # Errors
/// `PropagationError::Engine` if deform, remesh or volume measurement fails.
/// Seeding failures are not errors.
pub fn step<E, S>(
    engine: &mut E,
    sink: &mut S,
    state: BatchState,
    frame_step: FrameStep,
    criteria: &Criteria,
) -> Result<(BatchState, StepRecord), PropagationError>
where
    E: MeshEngine + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    debug_assert_eq!(state.frame, frame_step.from);
    let FrameStep {
        direction,
        from,
        to,
    } = frame_step;

    let mut records: Vec<TrackStepRecord> = state
        .baselines
        .iter()
        .map(|b| TrackStepRecord::new(b.track))
        .collect();

    // Phase 1: seed every track lacking a mesh at `to`.
    for rec in records.iter_mut() {
        if engine.has_frame(rec.track, to) {
            rec.flags |= TrackStepFlags::ALREADY_PRESENT;
            continue;
        }
        match engine.seed(direction, rec.track, from) {
            Ok(()) => {
                rec.flags |= TrackStepFlags::SEEDED;
                debug!("Seeded {} at frame {to} from {from}", rec.track);
            }
            Err(e) => {
                rec.flags |= TrackStepFlags::SEED_FAILED;
                warn!("Skipping {} at frame {to}: {e}", rec.track);
            }
        }
    }

    // Phase 2: refine and measure every track that now has a mesh at `to`.
    let mut summary = DriftSummary::default();
    for (rec, baseline) in records.iter_mut().zip(&state.baselines) {
        if !engine.has_frame(rec.track, to) {
            continue;
        }
        let slot = MeshSlot::new(rec.track, to);
        refine(engine, slot, criteria)?;
        let volume = engine
            .compute_volume(slot)
            .map_err(|e| PropagationError::engine(slot, e))?;

        let check = DriftCheck::evaluate(
            rec.track,
            baseline.volume,
            volume,
            criteria.max_volume_change,
        );
        rec.flags |= TrackStepFlags::REFINED;
        rec.volume = Some(volume);
        rec.drift = Some(check.drift);
        debug!(
            "Refined {slot}: volume={volume}, drift={:.4}",
            check.drift
        );

        if check.exceeded {
            rec.flags |= TrackStepFlags::DRIFT_EXCEEDED;
            let name = display_name(&*engine, rec.track);
            warn!(
                "{name} exceeded volume drift at frame {to}: {:.4} > {:.4}",
                check.drift, criteria.max_volume_change
            );
            sink.report(&format!(
                "{name} stopping: volume drift {:.4} exceeds {:.4} (baseline {}, now {})",
                check.drift, criteria.max_volume_change, check.baseline, check.volume
            ));
        }
        summary.record(check);
    }

    let stopped = summary.stop_required();
    let record = StepRecord {
        from,
        to,
        tracks: records,
        drift: summary,
    };
    let next = BatchState {
        frame: to,
        baselines: state.baselines,
        stopped,
    };
    Ok((next, record))
}

/// `REFINE_CYCLES` × {deform; remesh} on one slot.
fn refine<E: MeshEngine + ?Sized>(
    engine: &mut E,
    slot: MeshSlot,
    criteria: &Criteria,
) -> Result<(), PropagationError> {
    for _ in 0..REFINE_CYCLES {
        engine
            .deform(slot, criteria.iterations_per_deform)
            .map_err(|e| PropagationError::engine(slot, e))?;
        engine
            .remesh(slot, criteria.min_edge_length, criteria.max_edge_length)
            .map_err(|e| PropagationError::engine(slot, e))?;
    }
    Ok(())
}

fn display_name<E: MeshEngine + ?Sized>(engine: &E, track: TrackId) -> String {
    match engine.track_name(track) {
        Some(name) => format!("{name} ({track})"),
        None => track.to_string(),
    }
}

// ─── Run ────────────────────────────────────────────────────────────

/// Parameters of one propagation run.
#[derive(Debug, Clone, Copy)]
pub struct PropagationRequest<'a> {
    /// Batch, in processing order. Must be non-empty and duplicate-free.
    pub tracks: &'a [TrackId],
    /// Frame every track already has a mesh at.
    pub start_frame: FrameIndex,
    /// Stepping direction.
    pub direction: Direction,
    /// Requested steps; clamped to the sequence bounds.
    pub step_count: u32,
    /// Run criteria.
    pub criteria: &'a Criteria,
}

/// Propagate a batch of tracks frame by frame.
///
/// Validates the request, captures one baseline volume per track, then
/// runs up to `step_count` frame steps (clamped to the sequence). Stops
/// after the first step in which any track's drift exceeds
/// `criteria.max_volume_change`.
///
/// # Errors
/// See the module docs for fail-fast conditions; engine faults during
/// refinement abort the run.
pub fn propagate<E, S>(
    engine: &mut E,
    sink: &mut S,
    request: PropagationRequest<'_>,
) -> Result<PropagationReport, PropagationError>
where
    E: MeshEngine + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    let PropagationRequest {
        tracks,
        start_frame,
        direction,
        step_count,
        criteria,
    } = request;

    validate_request(&*engine, tracks, start_frame, criteria)?;
    let mut state = BatchState::capture(&*engine, tracks, start_frame)?;

    let plan = StepPlan::clamp(direction, start_frame, step_count, engine.frame_count());
    info!(
        "Propagating {} tracks {direction} from frame {start_frame}: {} of {} steps",
        tracks.len(),
        plan.planned,
        plan.requested
    );
    if plan.is_clamped() {
        debug!(
            "Step count clamped to sequence boundary (target frame {})",
            plan.target_frame()
        );
    }

    let mut steps = Vec::with_capacity(plan.planned as usize);
    for (from, to) in plan.frame_steps() {
        let frame_step = FrameStep {
            direction,
            from,
            to,
        };
        let (next, record) = step(engine, sink, state, frame_step, criteria)?;
        state = next;
        steps.push(record);
        if state.is_stopped() {
            break;
        }
    }

    let stop = match steps.last() {
        Some(last) if state.is_stopped() => StopReason::DriftExceeded {
            frame: last.to,
            offenders: last.drift.offenders.iter().map(|c| c.track).collect(),
        },
        _ => StopReason::Completed,
    };

    let report = PropagationReport {
        plan,
        final_frame: state.frame(),
        baselines: state.baselines,
        steps,
        stop,
    };
    info!("{}", report.summary());
    sink.report(&report.summary());
    Ok(report)
}

/// Fail-fast checks run before any engine mutation.
fn validate_request<E: MeshEngine + ?Sized>(
    engine: &E,
    tracks: &[TrackId],
    start_frame: FrameIndex,
    criteria: &Criteria,
) -> Result<(), PropagationError> {
    criteria
        .validate()
        .map_err(PropagationError::InvalidCriteria)?;

    if tracks.is_empty() {
        return Err(PropagationError::EmptyBatch);
    }
    let mut seen = HashSet::with_capacity(tracks.len());
    for &track in tracks {
        if !seen.insert(track) {
            return Err(PropagationError::DuplicateTrack(track));
        }
    }

    let frame_count = engine.frame_count();
    if start_frame >= frame_count {
        return Err(PropagationError::StartFrameOutOfRange {
            frame: start_frame,
            frame_count,
        });
    }
    for &track in tracks {
        if !engine.has_frame(track, start_frame) {
            return Err(PropagationError::MissingStartMesh {
                track,
                frame: start_frame,
            });
        }
    }
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────
