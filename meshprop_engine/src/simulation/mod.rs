//! Simulation mesh engine.
//!
//! In-memory `MeshEngine` that models each mesh by its enclosed volume
//! only. Used by the `meshprop` binary, the benchmarks and the tests to
//! exercise the propagation controller without a real mesh-tracking
//! backend.
//!
//! # Model
//!
//! - Seeding copies the source mesh into the neighbor frame.
//! - Each `deform` call scales the volume by `1 + deform_rate`.
//! - `remesh` is volume-neutral.
//! - A track may *collapse* at one frame: the mesh seeded into that frame
//!   is scaled by `collapse_factor`, imitating a topology failure.

mod engine;
mod mesh;

pub use engine::SimulationEngine;
pub use mesh::{SimMesh, SimTrack, SimTrackConfig};
