//! Mesh engine trait and error types.
//!
//! This module defines:
//! - `MeshEngine` trait - Interface to the external mesh-tracking library
//! - `EngineError` enum - Faults reported by engine operations
//! - `EngineDiagnostics` struct - Optional call counters
//!
//! The propagation controller owns no geometry. Seeding, deformation,
//! remeshing and volume measurement are all delegated to a `MeshEngine`.

use crate::track::{Direction, FrameIndex, MeshSlot, TrackId};
use static_assertions::assert_obj_safe;
use thiserror::Error;

/// Error types for mesh engine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Seeding found no mesh at the source frame.
    #[error("no mesh for {track} at source frame {frame}")]
    MissingNeighborMesh {
        /// Track being seeded.
        track: TrackId,
        /// Source frame that was empty.
        frame: FrameIndex,
    },

    /// The engine does not know this track.
    #[error("unknown track {0}")]
    UnknownTrack(TrackId),

    /// No mesh is bound to the slot an operation targeted.
    #[error("no mesh bound to {0}")]
    MissingMesh(MeshSlot),

    /// Seeding would leave the image sequence.
    #[error("frame {frame} is outside the sequence of {frame_count} frames")]
    FrameOutOfRange {
        /// Requested frame.
        frame: FrameIndex,
        /// Sequence length.
        frame_count: FrameIndex,
    },

    /// Backend-specific failure.
    #[error("mesh backend failure: {0}")]
    Backend(String),
}

/// Optional engine diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineDiagnostics {
    /// Successful `track_forward`/`track_backward` calls.
    pub seeds: u64,
    /// `deform` calls.
    pub deforms: u64,
    /// `remesh` calls.
    pub remeshes: u64,
    /// `compute_volume` calls.
    pub volume_queries: u64,
}

/// Trait defining the interface to a mesh-tracking backend.
///
/// # Lifecycle
///
/// The propagation controller holds `&mut` access for the whole run, so
/// no two runs can drive the same engine at once.
///
/// # Blocking Contract
///
/// | Operation | Mutates | Notes |
/// |-----------|---------|-------|
/// | `track_forward` / `track_backward` | yes | seeds the adjacent frame |
/// | `deform` | yes | replaces the slot's mesh |
/// | `remesh` | yes | replaces the slot's mesh |
/// | `compute_volume` | no | pure |
/// | `has_frame` | no | pure |
pub trait MeshEngine {
    /// Number of frames in the image sequence.
    fn frame_count(&self) -> FrameIndex;

    /// Whether `track` has a mesh bound to `frame`.
    fn has_frame(&self, track: TrackId, frame: FrameIndex) -> bool;

    /// Seed `track` at `from + 1` from its mesh at `from`.
    ///
    /// # Errors
    /// `EngineError::MissingNeighborMesh` if there is no mesh at `from`.
    fn track_forward(&mut self, track: TrackId, from: FrameIndex) -> Result<(), EngineError>;

    /// Seed `track` at `from - 1` from its mesh at `from`.
    ///
    /// # Errors
    /// `EngineError::MissingNeighborMesh` if there is no mesh at `from`.
    fn track_backward(&mut self, track: TrackId, from: FrameIndex) -> Result<(), EngineError>;

    /// Run `iterations` relaxation steps on the mesh in `slot`.
    fn deform(&mut self, slot: MeshSlot, iterations: u32) -> Result<(), EngineError>;

    /// Re-triangulate edges of the mesh in `slot` outside `[min_len, max_len]`.
    fn remesh(&mut self, slot: MeshSlot, min_len: f64, max_len: f64) -> Result<(), EngineError>;

    /// Enclosed volume of the mesh in `slot`.
    fn compute_volume(&self, slot: MeshSlot) -> Result<f64, EngineError>;

    /// Human-readable track name for reports.
    /// Default: None
    fn track_name(&self, _track: TrackId) -> Option<&str> {
        None
    }

    /// Get engine-specific diagnostics.
    /// Default: None
    fn diagnostics(&self) -> Option<EngineDiagnostics> {
        None
    }

    /// Seed `track` from `from` toward `direction`.
    fn seed(
        &mut self,
        direction: Direction,
        track: TrackId,
        from: FrameIndex,
    ) -> Result<(), EngineError> {
        match direction {
            Direction::Forward => self.track_forward(track, from),
            Direction::Backward => self.track_backward(track, from),
        }
    }
}

assert_obj_safe!(MeshEngine);
