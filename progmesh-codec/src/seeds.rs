//! Seed gate selection for successive levels

use crate::gate::Gate;
use crate::state::MeshState;
use progmesh_core::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a seed is picked when no preset gate applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedStrategy {
    /// The smallest gate in map order.
    First,
    /// A uniformly drawn gate from an RNG seeded once per run.
    Random { seed: u64 },
}

/// Preset gates per level, then a fallback strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    pub preset: Vec<Gate>,
    pub fallback: SeedStrategy,
}

impl SeedPolicy {
    /// The gates agreed for the reference icosphere asset, levels 0 to 2.
    pub fn legacy() -> Self {
        Self {
            preset: vec![Gate::new(158, 159), Gate::new(152, 149), Gate::new(34, 38)],
            fallback: SeedStrategy::Random { seed: 0 },
        }
    }

    /// No presets; always the smallest gate.
    pub fn first() -> Self {
        Self {
            preset: Vec::new(),
            fallback: SeedStrategy::First,
        }
    }

    pub fn random(seed: u64) -> Self {
        Self {
            preset: Vec::new(),
            fallback: SeedStrategy::Random { seed },
        }
    }
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self::legacy()
    }
}

/// Stateful picker for one encoding run.
#[derive(Debug)]
pub struct SeedSelector {
    policy: SeedPolicy,
    rng: Option<StdRng>,
}

impl SeedSelector {
    pub fn new(policy: SeedPolicy) -> Self {
        let rng = match policy.fallback {
            SeedStrategy::Random { seed } => Some(StdRng::seed_from_u64(seed)),
            SeedStrategy::First => None,
        };
        Self { policy, rng }
    }

    /// Seed gate for level `iteration` of `state`.
    pub fn pick(&mut self, state: &MeshState, iteration: usize) -> Result<Gate> {
        if let Some(&gate) = self.policy.preset.get(iteration) {
            if state.apex(gate).is_some() {
                return Ok(gate);
            }
            warn!(%gate, iteration, "preset seed not in mesh, using fallback");
        }

        let gates = state.gates().keys().copied();
        let picked = match self.rng.as_mut() {
            Some(rng) => gates.choose(rng),
            None => gates.min(),
        };
        picked.ok_or_else(|| Error::InvalidData("mesh has no gates to seed from".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_meshes::octahedron;

    #[test]
    fn test_preset_then_fallback() {
        let state = MeshState::from_triangle_mesh(&octahedron()).unwrap();
        let policy = SeedPolicy {
            preset: vec![Gate::new(4, 2), Gate::new(1, 2)],
            fallback: SeedStrategy::First,
        };
        let mut selector = SeedSelector::new(policy);
        assert_eq!(selector.pick(&state, 0).unwrap(), Gate::new(4, 2));
        // (1, 2) is not an edge of the octahedron
        assert_eq!(selector.pick(&state, 1).unwrap(), Gate::new(1, 3));
        assert_eq!(selector.pick(&state, 2).unwrap(), Gate::new(1, 3));
    }

    #[test]
    fn test_random_is_reproducible() {
        let state = MeshState::from_triangle_mesh(&octahedron()).unwrap();
        let draw = |seed| {
            let mut selector = SeedSelector::new(SeedPolicy::random(seed));
            (0..5)
                .map(|i| selector.pick(&state, i).unwrap())
                .collect::<Vec<_>>()
        };
        let first = draw(7);
        assert_eq!(first, draw(7));
        assert!(first.iter().all(|g| state.apex(*g).is_some()));
    }

    #[test]
    fn test_empty_mesh_has_no_seed() {
        let state = MeshState::from_triangle_mesh(&progmesh_core::TriangleMesh::new()).unwrap();
        let mut selector = SeedSelector::new(SeedPolicy::first());
        assert!(matches!(
            selector.pick(&state, 0),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_legacy_policy() {
        let policy = SeedPolicy::default();
        assert_eq!(policy.preset.len(), 3);
        assert_eq!(policy.preset[0], Gate::new(158, 159));
        assert_eq!(policy.fallback, SeedStrategy::Random { seed: 0 });
    }
}
