//! Propagation error taxonomy.
//!
//! Only conditions that make a run meaningless are errors. A missing
//! neighbor mesh during seeding is recovered locally, a drift stop is a
//! normal outcome and an oversized step count is clamped; none of those
//! appear here.

use thiserror::Error;

use crate::engine::EngineError;
use crate::track::{FrameIndex, MeshSlot, TrackId};

/// Reasons a propagation run refuses to start or aborts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropagationError {
    /// Criteria failed bounds validation.
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),

    /// No tracks were supplied.
    #[error("propagation batch is empty")]
    EmptyBatch,

    /// The same track appears twice in the batch.
    #[error("{0} appears more than once in the batch")]
    DuplicateTrack(TrackId),

    /// Starting frame lies outside the sequence.
    #[error("start frame {frame} is outside the sequence of {frame_count} frames")]
    StartFrameOutOfRange {
        frame: FrameIndex,
        frame_count: FrameIndex,
    },

    /// A batch track has no mesh at the starting frame.
    #[error("{track} has no mesh at start frame {frame}")]
    MissingStartMesh { track: TrackId, frame: FrameIndex },

    /// Baseline volume is zero, negative or not finite; drift is undefined.
    #[error("{track} has unusable baseline volume {volume}")]
    ZeroBaselineVolume { track: TrackId, volume: f64 },

    /// The mesh engine failed during refinement or measurement.
    #[error("engine fault at {slot}: {source}")]
    Engine {
        slot: MeshSlot,
        #[source]
        source: EngineError,
    },
}

impl PropagationError {
    /// Wrap an engine fault with the slot it happened on.
    pub fn engine(slot: MeshSlot, source: EngineError) -> Self {
        Self::Engine { slot, source }
    }
}
