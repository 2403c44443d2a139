//! Simulated meshes and tracks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use meshprop_common::track::FrameIndex;

/// Volume-only stand-in for a surface mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimMesh {
    /// Enclosed volume.
    pub volume: f64,
    /// Deform calls applied since seeding.
    pub deform_passes: u32,
    /// Remesh calls applied since seeding.
    pub remesh_passes: u32,
}

impl SimMesh {
    /// Fresh mesh with the given volume.
    pub const fn new(volume: f64) -> Self {
        Self {
            volume,
            deform_passes: 0,
            remesh_passes: 0,
        }
    }

    /// Copy used to seed a neighbor frame.
    pub fn seeded_copy(&self) -> Self {
        Self::new(self.volume)
    }
}

/// Scenario description of one simulated track.
///
/// # TOML Example
///
/// ```toml
/// [[tracks]]
/// name = "cell-a"
/// volume = 100.0
/// deform_rate = 0.01
/// collapse_at = 4
/// collapse_factor = 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimTrackConfig {
    /// Track name used in reports.
    pub name: String,
    /// Volume of every initially present mesh.
    pub volume: f64,
    /// Fractional volume change per `deform` call.
    #[serde(default)]
    pub deform_rate: f64,
    /// Frames that already hold a mesh; empty means just the run's start frame.
    #[serde(default)]
    pub frames: Vec<FrameIndex>,
    /// Frame whose seeded mesh collapses.
    #[serde(default)]
    pub collapse_at: Option<FrameIndex>,
    /// Volume multiplier applied on collapse.
    #[serde(default = "default_collapse_factor")]
    pub collapse_factor: f64,
}

fn default_collapse_factor() -> f64 {
    0.5
}

impl SimTrackConfig {
    /// Validate the track description.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("track name cannot be empty".to_string());
        }
        if !self.volume.is_finite() {
            return Err(format!("track '{}': volume must be finite", self.name));
        }
        if !(self.deform_rate.is_finite() && self.deform_rate > -1.0) {
            return Err(format!(
                "track '{}': deform_rate {} must be finite and > -1",
                self.name, self.deform_rate
            ));
        }
        if !(self.collapse_factor.is_finite() && self.collapse_factor >= 0.0) {
            return Err(format!(
                "track '{}': collapse_factor {} must be finite and >= 0",
                self.name, self.collapse_factor
            ));
        }
        Ok(())
    }
}

/// One simulated track: its meshes by frame plus its volume model.
#[derive(Debug, Clone, PartialEq)]
pub struct SimTrack {
    /// Display name.
    pub name: String,
    /// Fractional volume change per `deform` call.
    pub deform_rate: f64,
    /// Frame whose seeded mesh collapses.
    pub collapse_at: Option<FrameIndex>,
    /// Volume multiplier applied on collapse.
    pub collapse_factor: f64,
    /// Meshes keyed by frame; keys need not be contiguous.
    pub meshes: BTreeMap<FrameIndex, SimMesh>,
}

impl SimTrack {
    /// Build a track from its scenario description.
    pub fn from_config(config: &SimTrackConfig, start_frame: FrameIndex) -> Self {
        let frames: &[FrameIndex] = if config.frames.is_empty() {
            std::slice::from_ref(&start_frame)
        } else {
            &config.frames
        };
        Self {
            name: config.name.clone(),
            deform_rate: config.deform_rate,
            collapse_at: config.collapse_at,
            collapse_factor: config.collapse_factor,
            meshes: frames
                .iter()
                .map(|&f| (f, SimMesh::new(config.volume)))
                .collect(),
        }
    }

    /// Frames holding a mesh, ascending.
    pub fn frames(&self) -> impl Iterator<Item = FrameIndex> + '_ {
        self.meshes.keys().copied()
    }
}
