//! Integration test: scenario file to JSON report.

use std::io::Write;

use tempfile::NamedTempFile;

use meshprop_common::config::ConfigError;
use meshprop_common::track::Direction;

use meshprop_engine::config::load_run_config;
use meshprop_engine::{
    PropagationRequest, RecordingSink, SimulationEngine, TrackSelection, propagate,
};

const SCENARIO: &str = r#"
[shared]
log_level = "debug"
service_name = "embryo-04-backward"

[criteria]
iterations_per_deform = 200
max_volume_change = 0.25

[run]
direction = "backward"
steps = 50
start_frame = 6
frame_count = 12

[[tracks]]
name = "cell-a"
volume = 100.0

[[tracks]]
name = "cell-b"
volume = 60.0
frames = [2, 6]
collapse_at = 4
collapse_factor = 0.5
"#;

fn write_scenario(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn scenario_file_runs_and_serializes_report() {
    let file = write_scenario(SCENARIO);
    let config = load_run_config(file.path()).unwrap();
    assert_eq!(config.run.direction, Direction::Backward);
    assert_eq!(config.criteria.iterations_per_deform, 200);

    let mut engine = SimulationEngine::from_configs(
        config.run.frame_count,
        config.run.start_frame,
        &config.tracks,
    )
    .unwrap();
    let selection: TrackSelection = config
        .tracks
        .iter()
        .filter_map(|t| engine.find_track(&t.name))
        .collect();
    let mut sink = RecordingSink::new();

    let report = propagate(
        &mut engine,
        &mut sink,
        PropagationRequest {
            tracks: selection.as_slice(),
            start_frame: config.run.start_frame,
            direction: config.run.direction,
            step_count: config.run.steps,
            criteria: &config.criteria,
        },
    )
    .unwrap();

    // cell-b collapses to half its volume when seeded into frame 4.
    assert_eq!(report.plan.planned, 6);
    assert_eq!(report.final_frame, 4);
    assert!(report.stopped_by_drift());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["stop"]["reason"], "drift_exceeded");
    assert_eq!(json["stop"]["frame"], 4);
    assert_eq!(json["stop"]["offenders"][0], 1);
    assert_eq!(json["plan"]["direction"], "backward");
    assert_eq!(json["steps"].as_array().unwrap().len(), 2);
}

#[test]
fn scenario_with_unknown_key_is_rejected() {
    let file = write_scenario(&SCENARIO.replace("collapse_factor", "collapse_ratio"));
    assert!(matches!(
        load_run_config(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn scenario_frame_outside_sequence_is_rejected() {
    let file = write_scenario(&SCENARIO.replace("frames = [2, 6]", "frames = [6, 12]"));
    let err = load_run_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
    assert!(err.to_string().contains("cell-b"));
}

#[test]
fn missing_scenario_file() {
    assert!(matches!(
        load_run_config(std::path::Path::new("/nonexistent/meshprop.toml")),
        Err(ConfigError::FileNotFound)
    ));
}
