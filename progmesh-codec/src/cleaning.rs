//! Cleaning conquest
//!
//! A second sweep that removes the valence-3 vertices ("ears") left behind
//! by decimation, replacing each ear's three triangles by one.

use crate::gate::{Gate, VertexId};
use crate::state::{MeshState, MIN_CLOSED_VERTICES};
use crate::traversal::{require_apex, rotate_chain, FaceStatus, Traversal};
use progmesh_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Outcome of one cleaning sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub seed: Option<Gate>,
    pub removed: Vec<VertexId>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CleaningConquest;

impl CleaningConquest {
    pub fn new() -> Self {
        Self
    }

    /// Gate into the lowest-numbered active valence-3 vertex.
    pub fn seed(state: &MeshState) -> Option<Gate> {
        state
            .active()
            .find(|&v| state.valence(v) == 3)
            .map(|v| {
                let patch = state.patch(v);
                Gate::new(patch[0], patch[1])
            })
    }

    pub fn run(&self, state: &mut MeshState) -> Result<CleaningReport> {
        let Some(seed) = Self::seed(state) else {
            debug!("no valence-3 vertex, cleaning skipped");
            return Ok(CleaningReport::default());
        };

        let mut traversal = Traversal::seeded(seed);
        let mut done = BTreeSet::new();
        let mut report = CleaningReport {
            seed: Some(seed),
            removed: Vec::new(),
        };

        while let Some(gate) = traversal.pop() {
            if !done.insert(gate) {
                continue;
            }
            let front = require_apex(state, gate)?;
            if traversal.is_marked(gate) {
                continue;
            }

            let valence = state.valence(front);
            let unvisited = !traversal.is_visited(front);
            if valence == 3 && unvisited && state.active_count() > MIN_CLOSED_VERTICES {
                trace!(%gate, front, "remove ear");
                remove_ear(state, &mut traversal, gate, front)?;
                report.removed.push(front);
            } else if valence <= 6 && unvisited {
                let chain = rotate_chain(state, front, gate)?;
                traversal.enqueue_chain(&chain);
            } else {
                traversal.enqueue_flanks(gate, front);
            }
        }

        debug!(seed = %seed, removed = report.removed.len(), "cleaning conquest done");
        Ok(report)
    }
}

fn remove_ear(
    state: &mut MeshState,
    traversal: &mut Traversal,
    gate: Gate,
    front: VertexId,
) -> Result<()> {
    let ear: [VertexId; 3] = state.patch(front).try_into().map_err(|_| {
        Error::inconsistency(gate.as_pair(), Some(front), "ear patch is not a triangle")
    })?;
    let [c0, c1, c2] = ear;

    state.deactivate(front);
    traversal.purge(front);
    for p in ear {
        state.adjust_valence(p, -1, gate)?;
        for spoke in [Gate::new(front, p), Gate::new(p, front)] {
            state.remove_gate(spoke).ok_or_else(|| {
                Error::inconsistency(
                    gate.as_pair(),
                    Some(front),
                    format!("spoke {spoke} of the ear is missing"),
                )
            })?;
        }
    }

    state.set_triangle(c0, c1, c2);
    for p in ear {
        state.patch_drop(p, front);
        traversal.visit(p);
    }

    let outer = [Gate::new(c1, c0), Gate::new(c2, c1)];
    for g in outer {
        traversal.mark_face(g, FaceStatus::Conquered);
    }
    let f1 = require_apex(state, outer[0])?;
    let f2 = require_apex(state, outer[1])?;
    traversal.push(Gate::new(f1, c0));
    traversal.push(Gate::new(c1, f1));
    traversal.push(Gate::new(f2, c1));
    traversal.push(Gate::new(c2, f2));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimating::DecimatingConquest;
    use crate::test_meshes::{capped_octahedron, icosahedron, octahedron, tetrahedron};

    #[test]
    fn test_removes_single_ear() {
        let mut state = MeshState::from_triangle_mesh(&capped_octahedron()).unwrap();
        assert_eq!(state.patch(7), &[1, 3, 5]);
        for v in [1, 3, 5] {
            assert_eq!(state.valence(v), 5);
        }

        let report = CleaningConquest::new().run(&mut state).unwrap();
        assert_eq!(report.seed, Some(Gate::new(1, 3)));
        assert_eq!(report.removed, vec![7]);
        for v in [1, 3, 5] {
            assert_eq!(state.valence(v), 4);
        }
        assert_eq!(state.apex(Gate::new(1, 3)), Some(5));
        state.validate().unwrap();

        let octahedron = MeshState::from_triangle_mesh(&octahedron()).unwrap();
        assert_eq!(state.gates(), octahedron.gates());
    }

    #[test]
    fn test_without_ears_is_noop() {
        let mut state = MeshState::from_triangle_mesh(&octahedron()).unwrap();
        let before = state.clone();
        let report = CleaningConquest::new().run(&mut state).unwrap();
        assert_eq!(report, CleaningReport::default());
        assert_eq!(state, before);
    }

    #[test]
    fn test_tetrahedron_is_kept() {
        let mut state = MeshState::from_triangle_mesh(&tetrahedron()).unwrap();
        let report = CleaningConquest::new().run(&mut state).unwrap();
        assert_eq!(report.seed, Some(Gate::new(3, 2)));
        assert!(report.removed.is_empty());
        assert_eq!(state.active_count(), 4);
        state.validate().unwrap();
    }

    #[test]
    fn test_cleans_after_decimation() {
        let mut state = MeshState::from_triangle_mesh(&icosahedron()).unwrap();
        DecimatingConquest::new()
            .run(&mut state, Gate::new(1, 12))
            .unwrap();
        let report = CleaningConquest::new().run(&mut state).unwrap();
        assert_eq!(report.removed, vec![10]);
        assert_eq!(state.active_count(), 8);
        assert_eq!(state.face_count(), 12);
        assert_eq!(state.euler_characteristic(), 2);
        state.validate().unwrap();
    }
}
