//! Prelude module for common re-exports.
//!
//! ```rust
//! use meshprop_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig, Validate};
pub use crate::criteria::Criteria;

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::REFINE_CYCLES;

// ─── Tracks & Engine ────────────────────────────────────────────────
pub use crate::engine::{EngineDiagnostics, EngineError, MeshEngine};
pub use crate::error::PropagationError;
pub use crate::track::{Direction, FrameIndex, MeshSlot, StepPlan, TrackId};
