//! Progressive valence-driven mesh compression
//!
//! This crate reduces a closed, oriented triangle mesh level by level:
//! - Decimating conquest: removes independent vertices of valence 3 to 6
//! - Cleaning conquest: removes the valence-3 ears left behind
//! - Sew pass: repairs bigons and reports unmatched gates
//! - Serializer: writes each level with dense 1-based ids
//!
//! All passes share one [`MeshState`], the directed-edge ("gate") map of the
//! current level with per-vertex valences and ordered one-rings.

pub mod gate;
pub mod state;
pub mod builder;
pub mod traversal;
pub mod retriangulation;
pub mod decimating;
pub mod cleaning;
pub mod sew;
pub mod serializer;
pub mod seeds;
pub mod params;
pub mod encoder;

#[cfg(test)]
pub(crate) mod test_meshes;

pub use gate::*;
pub use state::*;
pub use retriangulation::*;
pub use decimating::*;
pub use cleaning::*;
pub use sew::*;
pub use serializer::*;
pub use seeds::*;
pub use params::*;
pub use encoder::*;

use progmesh_core::{Result, TriangleMesh};

/// Simplify a mesh by removing detail level by level
pub trait MeshSimplifier {
    /// Simplify `mesh` over at most `iterations` levels and return the coarsest one
    fn simplify(&self, mesh: &TriangleMesh, iterations: usize) -> Result<TriangleMesh>;
}
