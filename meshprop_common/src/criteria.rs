//! Propagation criteria: remesh edge bounds, deform iterations and the
//! volume-drift stop threshold.
//!
//! Loaded from the `[criteria]` table of a run file. Every field is
//! optional and falls back to the workspace defaults in [`crate::consts`].
//! Immutable for the duration of a run.

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ITERATIONS_PER_DEFORM, DEFAULT_MAX_EDGE_LENGTH, DEFAULT_MAX_VOLUME_CHANGE,
    DEFAULT_MIN_EDGE_LENGTH, ITERATIONS_PER_DEFORM_MAX, ITERATIONS_PER_DEFORM_MIN,
};

/// Per-run propagation criteria.
///
/// # TOML Example
///
/// ```toml
/// [criteria]
/// min_edge_length = 0.004
/// max_edge_length = 0.008
/// iterations_per_deform = 500
/// max_volume_change = 0.3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Criteria {
    /// Remesh lower edge-length bound.
    #[serde(default = "default_min_edge_length")]
    pub min_edge_length: f64,

    /// Remesh upper edge-length bound.
    #[serde(default = "default_max_edge_length")]
    pub max_edge_length: f64,

    /// Iterations passed to every `deform` call.
    #[serde(default = "default_iterations_per_deform")]
    pub iterations_per_deform: u32,

    /// Largest tolerated `|v - v0| / v0` before the batch stops (strict `>`).
    #[serde(default = "default_max_volume_change")]
    pub max_volume_change: f64,
}

fn default_min_edge_length() -> f64 {
    DEFAULT_MIN_EDGE_LENGTH
}
fn default_max_edge_length() -> f64 {
    DEFAULT_MAX_EDGE_LENGTH
}
fn default_iterations_per_deform() -> u32 {
    DEFAULT_ITERATIONS_PER_DEFORM
}
fn default_max_volume_change() -> f64 {
    DEFAULT_MAX_VOLUME_CHANGE
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            min_edge_length: DEFAULT_MIN_EDGE_LENGTH,
            max_edge_length: DEFAULT_MAX_EDGE_LENGTH,
            iterations_per_deform: DEFAULT_ITERATIONS_PER_DEFORM,
            max_volume_change: DEFAULT_MAX_VOLUME_CHANGE,
        }
    }
}

impl Criteria {
    /// Validate parameter bounds.
    ///
    /// Edge lengths must be finite, positive and ordered `min < max`.
    /// The volume-change threshold must be finite and positive.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_edge_length.is_finite() && self.min_edge_length > 0.0) {
            return Err(format!(
                "min_edge_length {} must be finite and > 0",
                self.min_edge_length
            ));
        }
        if !(self.max_edge_length.is_finite() && self.max_edge_length > 0.0) {
            return Err(format!(
                "max_edge_length {} must be finite and > 0",
                self.max_edge_length
            ));
        }
        if self.min_edge_length >= self.max_edge_length {
            return Err(format!(
                "min_edge_length {} must be < max_edge_length {}",
                self.min_edge_length, self.max_edge_length
            ));
        }
        if self.iterations_per_deform < ITERATIONS_PER_DEFORM_MIN
            || self.iterations_per_deform > ITERATIONS_PER_DEFORM_MAX
        {
            return Err(format!(
                "iterations_per_deform {} out of range [{}, {}]",
                self.iterations_per_deform, ITERATIONS_PER_DEFORM_MIN, ITERATIONS_PER_DEFORM_MAX
            ));
        }
        if !(self.max_volume_change.is_finite() && self.max_volume_change > 0.0) {
            return Err(format!(
                "max_volume_change {} must be finite and > 0",
                self.max_volume_change
            ));
        }
        Ok(())
    }
}
