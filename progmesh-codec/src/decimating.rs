//! Decimating conquest
//!
//! One breadth-first sweep from a seed gate that removes every reachable
//! vertex of valence at most 6 whose one-ring was not touched by an earlier
//! removal of the same sweep, filling each hole with a [`Retriangulation`].

use crate::gate::{Gate, VertexId};
use crate::retriangulation::Retriangulation;
use crate::state::{MeshState, MIN_CLOSED_VERTICES};
use crate::traversal::{require_apex, rotate_chain, Sign, SignMap, Traversal};
use progmesh_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Largest valence a removable vertex may have.
pub const MAX_REMOVABLE_VALENCE: usize = 6;

/// One vertex removed by a decimating sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    pub vertex: VertexId,
    /// Valence at removal time, which fixes the fan that replaced it.
    pub valence: usize,
    /// Gate through which the vertex was reached.
    pub gate: Gate,
}

/// Outcome of one decimating sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecimationReport {
    pub seed: Option<Gate>,
    pub removed: Vec<Removal>,
    /// Triangles whose apex was kept.
    pub kept: usize,
    /// Dequeued gates ignored as stale or already conquered.
    pub skipped: usize,
}

impl DecimationReport {
    pub fn removed_vertices(&self) -> Vec<VertexId> {
        self.removed.iter().map(|r| r.vertex).collect()
    }
}

/// Valence-driven vertex removal over one breadth-first sweep.
#[derive(Debug, Clone, Copy)]
pub struct DecimatingConquest {
    preserve_manifold: bool,
}

impl Default for DecimatingConquest {
    fn default() -> Self {
        Self::new()
    }
}

impl DecimatingConquest {
    pub fn new() -> Self {
        Self {
            preserve_manifold: true,
        }
    }

    /// Enable or disable the pre-removal manifold check.
    ///
    /// With the check on, a candidate is kept when its valence is below 3,
    /// its one-ring repeats a vertex, its fan would insert an edge that
    /// already exists, or the mesh is down to a tetrahedron.
    pub fn with_manifold_guard(mut self, preserve_manifold: bool) -> Self {
        self.preserve_manifold = preserve_manifold;
        self
    }

    /// Run one sweep from `seed`, mutating `state` in place.
    pub fn run(&self, state: &mut MeshState, seed: Gate) -> Result<DecimationReport> {
        require_apex(state, seed)?;

        let mut traversal = Traversal::seeded(seed);
        let mut signs = SignMap::new();
        signs.assign(seed.left, Sign::Minus);
        signs.assign(seed.right, Sign::Plus);

        let mut report = DecimationReport {
            seed: Some(seed),
            ..Default::default()
        };

        while let Some(gate) = traversal.pop() {
            if !state.is_active(gate.left) || !state.is_active(gate.right) {
                trace!(%gate, "stale gate");
                report.skipped += 1;
                continue;
            }
            traversal.visit(gate.left);
            traversal.visit(gate.right);

            let front = require_apex(state, gate)?;
            if traversal.is_marked(gate) {
                report.skipped += 1;
                continue;
            }

            match self.removal_plan(state, &traversal, &signs, gate, front)? {
                Some((case, chain)) => {
                    let valence = state.valence(front);
                    trace!(%gate, front, valence, ?case, "remove");
                    for &v in &chain {
                        traversal.visit(v);
                    }
                    traversal.enqueue_chain(&chain);
                    state.deactivate(front);
                    for &v in &chain {
                        for spoke in [Gate::new(front, v), Gate::new(v, front)] {
                            state.remove_gate(spoke).ok_or_else(|| {
                                Error::inconsistency(
                                    gate.as_pair(),
                                    Some(front),
                                    format!("spoke {spoke} of the removed vertex is missing"),
                                )
                            })?;
                        }
                    }
                    case.apply(state, &mut signs, &chain, front, gate)?;
                    report.removed.push(Removal {
                        vertex: front,
                        valence,
                        gate,
                    });
                }
                None => {
                    trace!(%gate, front, valence = state.valence(front), "keep");
                    traversal.enqueue_flanks(gate, front);
                    signs.assign(front, Sign::Plus);
                    report.kept += 1;
                }
            }
        }

        debug!(
            seed = %seed,
            removed = report.removed.len(),
            kept = report.kept,
            skipped = report.skipped,
            "decimating conquest done"
        );
        Ok(report)
    }

    /// Decide whether `front` is removed through `gate`, and how.
    fn removal_plan(
        &self,
        state: &MeshState,
        traversal: &Traversal,
        signs: &SignMap,
        gate: Gate,
        front: VertexId,
    ) -> Result<Option<(Retriangulation, Vec<VertexId>)>> {
        let valence = state.valence(front);
        if valence > MAX_REMOVABLE_VALENCE || traversal.is_visited(front) {
            return Ok(None);
        }
        if self.preserve_manifold
            && (valence < 3 || state.active_count() <= MIN_CLOSED_VERTICES)
        {
            return Ok(None);
        }

        let chain = rotate_chain(state, front, gate)?;
        let left = signs.require(gate.left, gate)?;
        let right = signs.require(gate.right, gate)?;
        let case = Retriangulation::select(valence, left, right)
            .ok_or(Error::UnsupportedValence {
                vertex: front,
                valence,
            })?;

        if self.preserve_manifold {
            let distinct: BTreeSet<_> = chain.iter().collect();
            if distinct.len() != chain.len() {
                trace!(%gate, front, "repeated neighbor, keeping");
                return Ok(None);
            }
            if case.diagonals(&chain).iter().any(|&(a, b)| state.has_edge(a, b)) {
                trace!(%gate, front, "fan would duplicate an edge, keeping");
                return Ok(None);
            }
        }
        Ok(Some((case, chain)))
    }
}
