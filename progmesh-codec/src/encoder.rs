//! Level-by-level driver over the three conquests

use crate::cleaning::{CleaningConquest, CleaningReport};
use crate::decimating::{DecimatingConquest, DecimationReport};
use crate::gate::Gate;
use crate::params::EncoderParams;
use crate::seeds::SeedSelector;
use crate::serializer::{serialize, ReducedMesh};
use crate::sew::{SewPass, SewReport};
use crate::state::MeshState;
use crate::MeshSimplifier;
use progmesh_core::{Error, Result, TriangleMesh};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One reduced level and the record of what produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedLevel {
    pub iteration: usize,
    pub seed: Gate,
    pub decimation: DecimationReport,
    pub cleaning: CleaningReport,
    pub sew: SewReport,
    pub mesh: ReducedMesh,
}

impl EncodedLevel {
    /// Vertices removed by all three passes of this level.
    pub fn removed_count(&self) -> usize {
        self.decimation.removed.len() + self.cleaning.removed.len() + self.sew.bigons.len()
    }
}

/// Progressive valence-driven encoder.
///
/// Each level runs a decimating sweep from a seed gate, a cleaning sweep
/// and a sew pass over the same [`MeshState`], then serializes what is left.
#[derive(Debug, Clone, Default)]
pub struct ProgressiveEncoder {
    pub params: EncoderParams,
}

impl ProgressiveEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: EncoderParams) -> Self {
        Self { params }
    }

    /// Build the mesh state and encode it.
    pub fn encode(&self, mesh: &TriangleMesh) -> Result<Vec<EncodedLevel>> {
        let mut state = MeshState::from_triangle_mesh(mesh)?;
        self.encode_state(&mut state)
    }

    /// Encode `state` in place, leaving it at the coarsest level.
    pub fn encode_state(&self, state: &mut MeshState) -> Result<Vec<EncodedLevel>> {
        self.params.validate()?;

        let mut seeds = SeedSelector::new(self.params.seeds.clone());
        let decimator = DecimatingConquest::new().with_manifold_guard(self.params.preserve_manifold);
        let cleaner = CleaningConquest::new();
        let sewer = SewPass::new();
        let mut levels = Vec::with_capacity(self.params.iterations);

        for iteration in 0..self.params.iterations {
            if state.active_count() <= self.params.min_vertices {
                info!(
                    iteration,
                    vertices = state.active_count(),
                    "mesh at minimum size, stopping"
                );
                break;
            }

            let seed = seeds.pick(state, iteration)?;
            let decimation = decimator.run(state, seed)?;
            let cleaning = cleaner.run(state)?;
            let sew = sewer.run(state);

            if self.params.validate_levels {
                state.validate()?;
            }
            let mesh = serialize(state)?;
            info!(
                iteration,
                %seed,
                vertices = mesh.vertex_count(),
                faces = mesh.face_count(),
                "level encoded"
            );

            let level = EncodedLevel {
                iteration,
                seed,
                decimation,
                cleaning,
                sew,
                mesh,
            };
            let removed = level.removed_count();
            levels.push(level);
            if removed == 0 {
                info!(iteration, "level removed nothing, stopping");
                break;
            }
        }
        Ok(levels)
    }
}

impl MeshSimplifier for ProgressiveEncoder {
    fn simplify(&self, mesh: &TriangleMesh, iterations: usize) -> Result<TriangleMesh> {
        let encoder = Self::with_params(self.params.clone().with_iterations(iterations));
        let levels = encoder.encode(mesh)?;
        match levels.last() {
            Some(level) => Ok(level.mesh.to_triangle_mesh()),
            None if mesh.faces.is_empty() => Err(Error::InvalidData(
                "cannot simplify a mesh without faces".to_string(),
            )),
            None => Ok(mesh.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::SeedPolicy;
    use crate::test_meshes::{icosahedron, icosphere, octahedron};

    fn first_seed(iterations: usize) -> ProgressiveEncoder {
        ProgressiveEncoder::with_params(
            EncoderParams::new()
                .with_iterations(iterations)
                .with_seeds(SeedPolicy::first()),
        )
    }

    #[test]
    fn test_icosphere_levels() {
        let levels = first_seed(4).encode(&icosphere(1)).unwrap();
        let summary: Vec<_> = levels
            .iter()
            .map(|l| {
                (
                    l.decimation.removed.len(),
                    l.cleaning.removed.len(),
                    l.mesh.vertex_count(),
                    l.mesh.face_count(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![(11, 4, 27, 50), (7, 2, 18, 32), (4, 4, 10, 16), (2, 2, 6, 8)]
        );
        for level in &levels {
            let mesh = level.mesh.to_triangle_mesh();
            assert!(mesh.is_closed());
            assert_eq!(mesh.euler_characteristic(), 2);
        }
    }

    #[test]
    fn test_stops_at_min_vertices() {
        let levels = first_seed(10).encode(&icosphere(1)).unwrap();
        assert_eq!(levels.len(), 5);
        assert_eq!(levels[4].mesh.vertex_count(), 4);
        assert_eq!(levels[4].mesh.face_count(), 4);

        // octahedron to tetrahedron, then nothing left to remove
        let levels = first_seed(3).encode(&octahedron()).unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].decimation.removed.len(), 1);
        assert_eq!(levels[0].cleaning.removed.len(), 1);
        assert_eq!(levels[0].mesh.vertex_count(), 4);
    }

    #[test]
    fn test_legacy_seeds_fall_back_on_small_meshes() {
        let levels = ProgressiveEncoder::new().encode(&icosahedron()).unwrap();
        assert!(!levels.is_empty());
        for level in &levels {
            assert!(level.mesh.to_triangle_mesh().is_closed());
        }
    }

    #[test]
    fn test_rejects_invalid_params() {
        let encoder = ProgressiveEncoder::with_params(EncoderParams::new().with_iterations(0));
        assert!(matches!(
            encoder.encode(&icosahedron()),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_simplify_returns_coarsest_level() {
        let encoder = first_seed(1);
        let coarse = encoder.simplify(&icosphere(1), 2).unwrap();
        assert_eq!(coarse.vertex_count(), 18);
        assert_eq!(coarse.face_count(), 32);
    }
}
