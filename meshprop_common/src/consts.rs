//! Workspace-wide constants for mesh propagation.
//!
//! Single source of truth for criteria defaults and bounds.
//! Imported by all crates; no duplication permitted.

use static_assertions::const_assert;

/// Deform/remesh cycles run per track on every frame step.
///
/// Not configurable through `Criteria`.
pub const REFINE_CYCLES: u32 = 3;

/// Default minimum remesh edge length.
pub const DEFAULT_MIN_EDGE_LENGTH: f64 = 0.004;

/// Default maximum remesh edge length.
pub const DEFAULT_MAX_EDGE_LENGTH: f64 = 0.008;

/// Default deformation iterations per `deform` call.
pub const DEFAULT_ITERATIONS_PER_DEFORM: u32 = 500;

/// Default maximum fractional volume change before the batch stops.
pub const DEFAULT_MAX_VOLUME_CHANGE: f64 = 0.3;

/// Lower bound for `iterations_per_deform`.
pub const ITERATIONS_PER_DEFORM_MIN: u32 = 1;

/// Upper bound for `iterations_per_deform`.
pub const ITERATIONS_PER_DEFORM_MAX: u32 = 1_000_000;

/// Default scenario file used by the `meshprop` binary.
pub const DEFAULT_CONFIG_PATH: &str = "config/meshprop.toml";

const_assert!(REFINE_CYCLES == 3);
const_assert!(ITERATIONS_PER_DEFORM_MIN > 0);
const_assert!(DEFAULT_ITERATIONS_PER_DEFORM >= ITERATIONS_PER_DEFORM_MIN);
const_assert!(DEFAULT_ITERATIONS_PER_DEFORM <= ITERATIONS_PER_DEFORM_MAX);
