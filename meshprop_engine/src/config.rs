//! Run scenario loader with validation.
//!
//! A run file names the criteria, the run parameters and the simulated
//! tracks the `meshprop` binary propagates:
//!
//! ```toml
//! [shared]
//! service_name = "embryo-04-forward"
//!
//! [criteria]
//! max_volume_change = 0.3
//!
//! [run]
//! direction = "forward"
//! steps = 20
//! start_frame = 0
//! frame_count = 40
//!
//! [[tracks]]
//! name = "cell-a"
//! volume = 100.0
//! deform_rate = 0.002
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use meshprop_common::config::{ConfigError, ConfigLoader, SharedConfig, Validate};
use meshprop_common::criteria::Criteria;
use meshprop_common::track::{Direction, FrameIndex};

use crate::simulation::SimTrackConfig;

/// `[run]` table: where and how far to propagate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// Stepping direction.
    #[serde(default)]
    pub direction: Direction,
    /// Requested frame steps (clamped at run time).
    pub steps: u32,
    /// Frame every track starts from.
    #[serde(default)]
    pub start_frame: FrameIndex,
    /// Sequence length.
    pub frame_count: FrameIndex,
}

/// Complete run scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Logging and run identity.
    pub shared: SharedConfig,
    /// Propagation criteria; defaults when the table is absent.
    #[serde(default)]
    pub criteria: Criteria,
    /// Run parameters.
    pub run: RunSection,
    /// Simulated tracks, in batch order.
    #[serde(default)]
    pub tracks: Vec<SimTrackConfig>,
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.criteria
            .validate()
            .map_err(ConfigError::ValidationError)?;

        if self.run.frame_count == 0 {
            return Err(ConfigError::ValidationError(
                "run.frame_count must be > 0".to_string(),
            ));
        }
        if self.run.start_frame >= self.run.frame_count {
            return Err(ConfigError::ValidationError(format!(
                "run.start_frame {} out of range [0, {})",
                self.run.start_frame, self.run.frame_count
            )));
        }
        if self.tracks.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one [[tracks]] entry is required".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for track in &self.tracks {
            track.validate().map_err(ConfigError::ValidationError)?;
            if !names.insert(track.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate track name '{}'",
                    track.name
                )));
            }
            if let Some(&frame) = track.frames.iter().find(|&&f| f >= self.run.frame_count) {
                return Err(ConfigError::ValidationError(format!(
                    "track '{}': frame {frame} out of range [0, {})",
                    track.name, self.run.frame_count
                )));
            }
        }
        Ok(())
    }
}

/// Load and validate a run scenario.
pub fn load_run_config(path: &Path) -> Result<RunConfig, ConfigError> {
    RunConfig::load(path)
}
