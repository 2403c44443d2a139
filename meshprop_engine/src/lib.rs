//! # meshprop Engine Library
//!
//! Frame-propagation controller for tracked deformable surface meshes in a
//! time-lapse volumetric image sequence. For every frame step it seeds
//! not-yet-tracked frames from their neighbor, refines each mesh with a
//! fixed number of deform/remesh cycles, and stops the whole batch once any
//! track's enclosed volume drifts too far from its run-start baseline.
//!
//! ## Frame Step
//!
//! 1. **Seed**: every track without a mesh at the next frame is seeded.
//! 2. **Refine**: every track with a mesh at the next frame runs
//!    `REFINE_CYCLES` × {deform; remesh} and is measured.
//! 3. **Stop check**: if any track drifted, the run ends after this step.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      meshprop_engine                          │
//! │  ┌────────────┐   ┌───────────────┐   ┌────────────────────┐  │
//! │  │ selection  │──►│  propagation  │──►│  MeshEngine        │  │
//! │  │ (batch)    │   │  (step loop)  │   │  (trait object /   │  │
//! │  └────────────┘   └──────┬────────┘   │   simulation)      │  │
//! │                          │            └────────────────────┘  │
//! │              ┌───────────┼───────────┐                        │
//! │              ▼           ▼           ▼                        │
//! │          ┌───────┐   ┌────────┐  ┌────────┐                   │
//! │          │ drift │   │ report │  │  sink  │                   │
//! │          └───────┘   └────────┘  └────────┘                   │
//! └───────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod drift;
pub mod propagation;
pub mod report;
pub mod selection;
pub mod simulation;
pub mod sink;

// Re-export key types for convenience
pub use crate::propagation::{BatchState, FrameStep, PropagationRequest, propagate};
pub use crate::report::{PropagationReport, StopReason};
pub use crate::selection::TrackSelection;
pub use crate::simulation::SimulationEngine;
pub use crate::sink::{DiagnosticSink, RecordingSink, TracingSink};
