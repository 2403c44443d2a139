//! meshprop Common Library
//!
//! Shared types for the mesh frame-propagation workspace: track and frame
//! identifiers, propagation criteria, the external mesh engine contract,
//! and configuration loading utilities.
//!
//! # Module Structure
//!
//! - [`consts`] - Defaults, bounds and the fixed refinement cycle count
//! - [`config`] - Configuration loading traits and types
//! - [`criteria`] - Per-run propagation criteria
//! - [`track`] - Track/frame identifiers and propagation direction
//! - [`engine`] - `MeshEngine` trait implemented by mesh-tracking backends
//! - [`error`] - Propagation error taxonomy
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use meshprop_common::prelude::*;
//!
//! let criteria = Criteria::default();
//! assert!(criteria.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod prelude;
pub mod track;
