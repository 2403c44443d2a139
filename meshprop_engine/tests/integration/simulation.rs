//! Integration test: propagation over the simulation engine.

use meshprop_common::criteria::Criteria;
use meshprop_common::engine::MeshEngine;
use meshprop_common::track::{Direction, MeshSlot, TrackId};

use meshprop_engine::simulation::SimTrackConfig;
use meshprop_engine::{
    PropagationRequest, RecordingSink, SimulationEngine, StopReason, TrackSelection, propagate,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn track(name: &str, volume: f64, deform_rate: f64) -> SimTrackConfig {
    SimTrackConfig {
        name: name.to_string(),
        volume,
        deform_rate,
        frames: vec![],
        collapse_at: None,
        collapse_factor: 0.5,
    }
}

fn threshold(max_volume_change: f64) -> Criteria {
    Criteria {
        max_volume_change,
        ..Criteria::default()
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn steady_tracks_reach_the_requested_frame() {
    let configs = [track("a", 100.0, 0.0), track("b", 40.0, 0.0)];
    let mut engine = SimulationEngine::from_configs(20, 0, &configs).unwrap();
    let mut sink = RecordingSink::new();
    let criteria = Criteria::default();
    let tracks = engine.track_ids();

    let report = propagate(
        &mut engine,
        &mut sink,
        PropagationRequest {
            tracks: &tracks,
            start_frame: 0,
            direction: Direction::Forward,
            step_count: 6,
            criteria: &criteria,
        },
    )
    .unwrap();

    assert_eq!(report.stop, StopReason::Completed);
    assert_eq!(report.final_frame, 6);
    assert_eq!(report.max_drift(), 0.0);
    for &id in &tracks {
        assert!(engine.has_frame(id, 6));
        assert!(!engine.has_frame(id, 7));
        let mesh = engine.mesh(MeshSlot::new(id, 6)).unwrap();
        assert_eq!(mesh.deform_passes, 3);
        assert_eq!(mesh.remesh_passes, 3);
    }

    let diag = engine.diagnostics().unwrap();
    assert_eq!(diag.seeds, 12);
    assert_eq!(diag.deforms, 36);
    assert_eq!(diag.remeshes, 36);
    // Two baselines plus one measurement per refined mesh.
    assert_eq!(diag.volume_queries, 2 + 12);
}

#[test]
fn slow_growth_accumulates_until_threshold() {
    // 1.01^9 - 1 ≈ 0.094 after three steps, 1.01^12 - 1 ≈ 0.127 after four.
    let configs = [track("grower", 100.0, 0.01), track("steady", 50.0, 0.0)];
    let mut engine = SimulationEngine::from_configs(30, 0, &configs).unwrap();
    let mut sink = RecordingSink::new();
    let criteria = threshold(0.1);
    let tracks = engine.track_ids();

    let report = propagate(
        &mut engine,
        &mut sink,
        PropagationRequest {
            tracks: &tracks,
            start_frame: 0,
            direction: Direction::Forward,
            step_count: 20,
            criteria: &criteria,
        },
    )
    .unwrap();

    assert_eq!(report.steps_completed(), 4);
    assert_eq!(
        report.stop,
        StopReason::DriftExceeded {
            frame: 4,
            offenders: vec![TrackId(0)]
        }
    );
    assert!(sink.contains("grower (track-0) stopping"));
    assert!(engine.has_frame(TrackId(1), 4));
    assert!(!engine.has_frame(TrackId(1), 5));
}

#[test]
fn collapse_during_backward_run_stops_batch() {
    let collapsing = SimTrackConfig {
        collapse_at: Some(7),
        collapse_factor: 0.4,
        ..track("nucleus", 80.0, 0.0)
    };
    let configs = [track("membrane", 120.0, 0.0), collapsing];
    let mut engine = SimulationEngine::from_configs(12, 10, &configs).unwrap();
    let mut sink = RecordingSink::new();
    let criteria = threshold(0.3);
    let tracks = engine.track_ids();

    let report = propagate(
        &mut engine,
        &mut sink,
        PropagationRequest {
            tracks: &tracks,
            start_frame: 10,
            direction: Direction::Backward,
            step_count: 10,
            criteria: &criteria,
        },
    )
    .unwrap();

    assert_eq!(report.final_frame, 7);
    assert_eq!(report.frames_advanced(TrackId(0)), vec![9, 8, 7]);
    assert_eq!(
        report.stop,
        StopReason::DriftExceeded {
            frame: 7,
            offenders: vec![TrackId(1)]
        }
    );
    assert!(!engine.has_frame(TrackId(0), 6));
}

#[test]
fn selection_drives_batch_membership() {
    let configs = [
        track("a", 10.0, 0.0),
        track("b", 10.0, 0.5),
        track("c", 10.0, 0.0),
    ];
    let mut engine = SimulationEngine::from_configs(8, 0, &configs).unwrap();
    let mut sink = RecordingSink::new();
    let criteria = Criteria::default();

    // "b" would blow the threshold; leave it out of the batch.
    let mut selection = TrackSelection::new();
    for name in ["a", "c", "a"] {
        if let Some(id) = engine.find_track(name) {
            selection.add(id);
        }
    }
    assert_eq!(selection.len(), 2);

    let report = propagate(
        &mut engine,
        &mut sink,
        PropagationRequest {
            tracks: selection.as_slice(),
            start_frame: 0,
            direction: Direction::Forward,
            step_count: 5,
            criteria: &criteria,
        },
    )
    .unwrap();

    assert_eq!(report.stop, StopReason::Completed);
    assert_eq!(report.baselines.len(), 2);
    assert!(!engine.has_frame(TrackId(1), 1));
}

#[test]
fn runs_through_trait_objects() {
    let configs = [track("a", 10.0, 0.0)];
    let mut simulation = SimulationEngine::from_configs(4, 0, &configs).unwrap();
    let mut recording = RecordingSink::new();
    let criteria = Criteria::default();
    let tracks = [TrackId(0)];

    let engine: &mut dyn MeshEngine = &mut simulation;
    let sink: &mut dyn meshprop_engine::DiagnosticSink = &mut recording;
    let report = propagate(
        engine,
        sink,
        PropagationRequest {
            tracks: &tracks,
            start_frame: 0,
            direction: Direction::Forward,
            step_count: 3,
            criteria: &criteria,
        },
    )
    .unwrap();

    assert_eq!(report.final_frame, 3);
    assert_eq!(recording.messages().len(), 1);
}
