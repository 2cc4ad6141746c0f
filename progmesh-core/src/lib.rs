//! Core data structures for progmesh
//!
//! This crate provides the indexed triangle mesh exchanged between the
//! I/O layer and the codec, plus the error type shared by every crate.

pub mod mesh;
pub mod error;

pub use mesh::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
