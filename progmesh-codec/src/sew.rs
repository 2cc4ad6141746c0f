//! Sew pass: bigon removal and reconnection of unmatched gates

use crate::gate::{Gate, VertexId};
use crate::state::MeshState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Outcome of one sew pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SewReport {
    /// Gates found without a reverse gate.
    pub unmatched: Vec<Gate>,
    /// Valence-2 apexes removed.
    pub bigons: Vec<VertexId>,
    /// Triangles installed to close the holes the bigons left.
    pub resewn: Vec<[VertexId; 3]>,
}

impl SewReport {
    pub fn is_clean(&self) -> bool {
        self.unmatched.is_empty() && self.bigons.is_empty()
    }
}

/// A valence-2 apex shared by both triangles of an edge.
#[derive(Debug, Clone, Copy)]
struct Bigon {
    apex: VertexId,
    a: VertexId,
    b: VertexId,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SewPass;

impl SewPass {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, state: &mut MeshState) -> SewReport {
        let mut report = SewReport::default();
        let mut unsewn: BTreeMap<VertexId, VertexId> = BTreeMap::new();
        let mut bigons = Vec::new();
        let mut seen = BTreeSet::new();

        for (&gate, &apex) in state.gates() {
            match state.apex(gate.reversed()) {
                None => {
                    warn!(%gate, "gate has no reverse");
                    unsewn.insert(gate.right, gate.left);
                    report.unmatched.push(gate);
                }
                Some(other)
                    if other == apex
                        && state.valence(apex) == 2
                        && state.is_active(apex)
                        && seen.insert(apex) =>
                {
                    bigons.push(Bigon {
                        apex,
                        a: gate.left,
                        b: gate.right,
                    });
                }
                Some(_) => {}
            }
        }

        for bigon in bigons {
            if remove_bigon(state, bigon) {
                report.bigons.push(bigon.apex);
                for (l, r) in [(bigon.a, bigon.b), (bigon.b, bigon.a)] {
                    match unsewn.get(&r) {
                        Some(&x) if x != l => {
                            state.set_triangle(l, r, x);
                            report.resewn.push([l, r, x]);
                        }
                        _ => {}
                    }
                }
            }
        }

        if !report.is_clean() {
            debug!(
                unmatched = report.unmatched.len(),
                bigons = report.bigons.len(),
                resewn = report.resewn.len(),
                "sew pass done"
            );
        }
        report
    }
}

/// Remove a bigon's apex and collapse the doubled edge it stood on.
///
/// Returns false, leaving the mesh untouched, when the bigon is stale or is
/// a whole pillow component.
fn remove_bigon(state: &mut MeshState, Bigon { apex, a, b }: Bigon) -> bool {
    if !state.is_active(apex) || state.valence(apex) != 2 {
        return false;
    }
    if !state.is_active(a) || !state.is_active(b) {
        return false;
    }
    if state.valence(a) <= 2 || state.valence(b) <= 2 {
        warn!(apex, a, b, "pillow component left in place");
        return false;
    }

    state.deactivate(apex);
    for gate in [
        Gate::new(a, b),
        Gate::new(b, a),
        Gate::new(a, apex),
        Gate::new(apex, a),
        Gate::new(b, apex),
        Gate::new(apex, b),
    ] {
        state.remove_gate(gate);
    }

    for v in [a, b] {
        let Some(patch) = state.patch_mut(v) else {
            continue;
        };
        if let Some(i) = patch.iter().position(|&n| n == apex) {
            let n = patch.len();
            let prev = patch[(i + n - 1) % n];
            let next = patch[(i + 1) % n];
            patch.remove(i);
            if prev == next && patch.len() > 1 {
                let j = i % patch.len();
                patch.remove(j);
            }
        }
        let valence = patch.len();
        state.set_valence(v, valence);
    }
    true
}
