//! Track and frame identifiers, propagation direction and step planning.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Time index in the volumetric image sequence (0-based).
pub type FrameIndex = u32;

/// Identity of one tracked object across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track-{}", self.0)
    }
}

/// One (track, frame) slot holding exactly one mesh.
///
/// Replaces an ambient "selected track / current frame": every mesh
/// operation names the slot it acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshSlot {
    /// Owning track.
    pub track: TrackId,
    /// Frame the mesh is bound to.
    pub frame: FrameIndex,
}

impl MeshSlot {
    #[inline]
    pub const fn new(track: TrackId, frame: FrameIndex) -> Self {
        Self { track, frame }
    }
}

impl fmt::Display for MeshSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.track, self.frame)
    }
}

/// Frame-stepping direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// Adjacent frame in this direction, or `None` past the sequence start.
    ///
    /// The upper sequence bound is not known here; see [`StepPlan`].
    #[inline]
    pub const fn neighbor(self, frame: FrameIndex) -> Option<FrameIndex> {
        match self {
            Self::Forward => frame.checked_add(1),
            Self::Backward => frame.checked_sub(1),
        }
    }

    /// Lowercase name used in logs and reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step count after clamping a request to the sequence bounds.
///
/// Forward runs stop at `frame_count - 1`, backward runs at frame 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPlan {
    pub direction: Direction,
    pub start_frame: FrameIndex,
    /// Steps asked for by the caller.
    pub requested: u32,
    /// Steps that fit inside the sequence.
    pub planned: u32,
}

impl StepPlan {
    /// Clamp `requested` steps from `start_frame` to `[0, frame_count - 1]`.
    ///
    /// `start_frame` must lie inside the sequence; callers check this first.
    pub fn clamp(
        direction: Direction,
        start_frame: FrameIndex,
        requested: u32,
        frame_count: FrameIndex,
    ) -> Self {
        let available = match direction {
            Direction::Forward => frame_count.saturating_sub(1).saturating_sub(start_frame),
            Direction::Backward => start_frame,
        };
        Self {
            direction,
            start_frame,
            requested,
            planned: requested.min(available),
        }
    }

    /// Frame the run reaches if every planned step completes.
    pub fn target_frame(&self) -> FrameIndex {
        match self.direction {
            Direction::Forward => self.start_frame + self.planned,
            Direction::Backward => self.start_frame - self.planned,
        }
    }

    /// Whether the request was cut short by the sequence boundary.
    #[inline]
    pub const fn is_clamped(&self) -> bool {
        self.planned < self.requested
    }

    /// The planned `(from, to)` frame pairs, in order.
    pub fn frame_steps(self) -> impl Iterator<Item = (FrameIndex, FrameIndex)> {
        let direction = self.direction;
        let frames = std::iter::successors(Some(self.start_frame), move |&f| direction.neighbor(f));
        frames
            .clone()
            .zip(frames.skip(1))
            .take(self.planned as usize)
    }
}
