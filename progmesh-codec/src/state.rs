//! Shared mutable mesh state threaded through every pass
//!
//! The whole topology of the current level lives in one [`MeshState`]: the
//! gate map (directed edge to apex), per-vertex valences and ordered
//! one-ring patches, and the set of vertices still present. Passes borrow
//! it mutably for their duration; nothing else writes to it.

use crate::gate::{Gate, VertexId};
use progmesh_core::{Error, Point3f, Result, TriangleMesh};
use std::collections::{BTreeMap, BTreeSet};

/// Fewest vertices a closed triangle mesh can have.
pub const MIN_CLOSED_VERTICES: usize = 4;

/// Directed-edge representation of a closed triangle mesh.
///
/// Vertex ids are 1-based. The per-vertex arenas (`valences`, `patches`)
/// are indexed directly by id, slot 0 is unused.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshState {
    pub(crate) coords: Vec<Point3f>,
    pub(crate) gates: BTreeMap<Gate, VertexId>,
    pub(crate) valences: Vec<usize>,
    pub(crate) patches: Vec<Vec<VertexId>>,
    pub(crate) active: BTreeSet<VertexId>,
}

impl MeshState {
    /// Build the state from a 0-based triangle mesh.
    pub fn from_triangle_mesh(mesh: &TriangleMesh) -> Result<Self> {
        mesh.validate_indices()?;
        let faces: Vec<[VertexId; 3]> = mesh
            .faces
            .iter()
            .map(|f| [f[0] + 1, f[1] + 1, f[2] + 1])
            .collect();
        crate::builder::build(mesh.vertices.clone(), &faces)
    }

    pub(crate) fn from_parts(
        coords: Vec<Point3f>,
        gates: BTreeMap<Gate, VertexId>,
        valences: Vec<usize>,
        patches: Vec<Vec<VertexId>>,
    ) -> Self {
        let active = (1..=coords.len()).collect();
        Self {
            coords,
            gates,
            valences,
            patches,
            active,
        }
    }

    /// Number of vertex ids ever read, active or not.
    pub fn vertex_count(&self) -> usize {
        self.coords.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Active vertex ids in ascending order.
    pub fn active(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.active.iter().copied()
    }

    pub fn is_active(&self, v: VertexId) -> bool {
        self.active.contains(&v)
    }

    pub fn position(&self, v: VertexId) -> Option<&Point3f> {
        v.checked_sub(1).and_then(|i| self.coords.get(i))
    }

    pub fn gates(&self) -> &BTreeMap<Gate, VertexId> {
        &self.gates
    }

    /// The vertex completing the triangle on the left of `gate`.
    pub fn apex(&self, gate: Gate) -> Option<VertexId> {
        self.gates.get(&gate).copied()
    }

    pub fn valence(&self, v: VertexId) -> usize {
        self.valences.get(v).copied().unwrap_or(0)
    }

    /// Ordered one-ring of `v`; empty for removed or unknown vertices.
    pub fn patch(&self, v: VertexId) -> &[VertexId] {
        self.patches.get(v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when `a` and `b` are joined by an edge in either direction.
    pub fn has_edge(&self, a: VertexId, b: VertexId) -> bool {
        self.gates.contains_key(&Gate::new(a, b)) || self.gates.contains_key(&Gate::new(b, a))
    }

    pub fn face_count(&self) -> usize {
        self.gates.len() / 3
    }

    /// Number of undirected edges, counting unmatched gates once.
    pub fn edge_count(&self) -> usize {
        self.gates
            .keys()
            .filter(|g| g.left < g.right || !self.gates.contains_key(&g.reversed()))
            .count()
    }

    /// `V - E + F` over the active mesh.
    pub fn euler_characteristic(&self) -> i64 {
        self.active.len() as i64 - self.edge_count() as i64 + self.face_count() as i64
    }

    /// Gates whose reverse gate is absent, i.e. open boundary edges.
    pub fn unmatched_gates(&self) -> Vec<Gate> {
        self.gates
            .keys()
            .filter(|g| !self.gates.contains_key(&g.reversed()))
            .copied()
            .collect()
    }

    /// Check the hard invariants of a level.
    ///
    /// Every active vertex has a patch as long as its valence, oriented with
    /// the gate map; every gate joins active vertices and both cyclic
    /// companions of its triangle agree on it. Missing reverse gates are not
    /// checked here, see [`MeshState::unmatched_gates`].
    pub fn validate(&self) -> Result<()> {
        for v in self.active() {
            let patch = self.patch(v);
            if patch.len() != self.valence(v) {
                return Err(Error::NonManifoldVertex {
                    vertex: v,
                    reason: format!(
                        "valence {} but patch holds {} neighbors",
                        self.valence(v),
                        patch.len()
                    ),
                });
            }
            for (i, &n) in patch.iter().enumerate() {
                let gate = Gate::new(n, patch[(i + 1) % patch.len()]);
                if !self.is_active(n) {
                    return Err(Error::NonManifoldVertex {
                        vertex: v,
                        reason: format!("patch references removed vertex {n}"),
                    });
                }
                if self.apex(gate) != Some(v) {
                    return Err(Error::inconsistency(
                        gate.as_pair(),
                        self.apex(gate),
                        format!("patch of {v} is not closed by this gate"),
                    ));
                }
            }
        }

        for (&gate, &front) in &self.gates {
            let Gate { left, right } = gate;
            if !self.is_active(left) || !self.is_active(right) || !self.is_active(front) {
                return Err(Error::inconsistency(
                    gate.as_pair(),
                    Some(front),
                    "triangle references a removed vertex",
                ));
            }
            if left == right || right == front || front == left {
                return Err(Error::inconsistency(
                    gate.as_pair(),
                    Some(front),
                    "degenerate triangle",
                ));
            }
            if self.apex(Gate::new(right, front)) != Some(left)
                || self.apex(Gate::new(front, left)) != Some(right)
            {
                return Err(Error::inconsistency(
                    gate.as_pair(),
                    Some(front),
                    "triangle companions disagree",
                ));
            }
        }
        Ok(())
    }

    /// Install the three gates of the oriented triangle `(a, b, c)`.
    pub(crate) fn set_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        self.gates.insert(Gate::new(a, b), c);
        self.gates.insert(Gate::new(b, c), a);
        self.gates.insert(Gate::new(c, a), b);
    }

    pub(crate) fn remove_gate(&mut self, gate: Gate) -> Option<VertexId> {
        self.gates.remove(&gate)
    }

    /// Take `v` out of the level and release its arena slots.
    pub(crate) fn deactivate(&mut self, v: VertexId) -> bool {
        if !self.active.remove(&v) {
            return false;
        }
        if let Some(patch) = self.patches.get_mut(v) {
            patch.clear();
        }
        if let Some(valence) = self.valences.get_mut(v) {
            *valence = 0;
        }
        true
    }

    pub(crate) fn adjust_valence(&mut self, v: VertexId, delta: isize, gate: Gate) -> Result<()> {
        let slot = self
            .valences
            .get_mut(v)
            .ok_or_else(|| Error::inconsistency(gate.as_pair(), Some(v), "unknown vertex"))?;
        *slot = slot.checked_add_signed(delta).ok_or_else(|| {
            Error::inconsistency(gate.as_pair(), Some(v), "valence would become negative")
        })?;
        Ok(())
    }

    pub(crate) fn set_valence(&mut self, v: VertexId, valence: usize) {
        if let Some(slot) = self.valences.get_mut(v) {
            *slot = valence;
        }
    }

    /// Remove every occurrence of `x` from the patch of `v`.
    pub(crate) fn patch_drop(&mut self, v: VertexId, x: VertexId) -> bool {
        match self.patches.get_mut(v) {
            Some(patch) => {
                let before = patch.len();
                patch.retain(|&n| n != x);
                patch.len() != before
            }
            None => false,
        }
    }

    /// Replace every occurrence of `x` in the patch of `v` by `y`.
    pub(crate) fn patch_replace(&mut self, v: VertexId, x: VertexId, y: VertexId) -> bool {
        let mut found = false;
        if let Some(patch) = self.patches.get_mut(v) {
            for n in patch.iter_mut().filter(|n| **n == x) {
                *n = y;
                found = true;
            }
        }
        found
    }

    /// Replace `x` in the patch of `v` by the ordered pair `a, b`.
    pub(crate) fn patch_splice(&mut self, v: VertexId, x: VertexId, a: VertexId, b: VertexId) -> bool {
        let Some(patch) = self.patches.get_mut(v) else {
            return false;
        };
        let Some(i) = patch.iter().position(|&n| n == x) else {
            return false;
        };
        patch.retain(|&n| n != x);
        patch.splice(i..i, [a, b]);
        true
    }

    pub(crate) fn patch_mut(&mut self, v: VertexId) -> Option<&mut Vec<VertexId>> {
        self.patches.get_mut(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_meshes::{icosahedron, octahedron, tetrahedron};

    #[test]
    fn test_from_triangle_mesh_counts() {
        let state = MeshState::from_triangle_mesh(&icosahedron()).unwrap();
        assert_eq!(state.vertex_count(), 12);
        assert_eq!(state.active_count(), 12);
        assert_eq!(state.face_count(), 20);
        assert_eq!(state.edge_count(), 30);
        assert_eq!(state.euler_characteristic(), 2);
        assert!(state.unmatched_gates().is_empty());
        state.validate().unwrap();
    }

    #[test]
    fn test_accessors_use_one_based_ids() {
        let mesh = tetrahedron();
        let state = MeshState::from_triangle_mesh(&mesh).unwrap();
        assert_eq!(state.position(1), Some(&mesh.vertices[0]));
        assert_eq!(state.position(0), None);
        assert_eq!(state.position(5), None);
        assert_eq!(state.valence(0), 0);
        assert!(state.patch(99).is_empty());
        // face [0, 2, 1] becomes triangle (1, 3, 2)
        assert_eq!(state.apex(Gate::new(1, 3)), Some(2));
        assert!(state.has_edge(3, 1));
    }

    #[test]
    fn test_patch_edits() {
        let mut state = MeshState::from_triangle_mesh(&octahedron()).unwrap();
        let original = state.patch(1).to_vec();
        assert_eq!(original, vec![3, 5, 4, 6]);

        assert!(state.patch_replace(1, 5, 9));
        assert_eq!(state.patch(1), &[3, 9, 4, 6]);
        assert!(state.patch_splice(1, 9, 7, 8));
        assert_eq!(state.patch(1), &[3, 7, 8, 4, 6]);
        assert!(state.patch_drop(1, 8));
        assert_eq!(state.patch(1), &[3, 7, 4, 6]);
        assert!(!state.patch_drop(1, 42));
        assert!(!state.patch_splice(1, 42, 1, 2));
    }

    #[test]
    fn test_adjust_valence_rejects_underflow() {
        let mut state = MeshState::from_triangle_mesh(&tetrahedron()).unwrap();
        let gate = Gate::new(1, 2);
        state.adjust_valence(1, -3, gate).unwrap();
        assert_eq!(state.valence(1), 0);
        assert!(matches!(
            state.adjust_valence(1, -1, gate),
            Err(Error::Inconsistency { .. })
        ));
    }

    #[test]
    fn test_validate_detects_broken_companion() {
        let mut state = MeshState::from_triangle_mesh(&octahedron()).unwrap();
        state.gates.insert(Gate::new(1, 3), 6);
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_validate_detects_valence_mismatch() {
        let mut state = MeshState::from_triangle_mesh(&octahedron()).unwrap();
        state.set_valence(2, 5);
        assert!(matches!(
            state.validate(),
            Err(Error::NonManifoldVertex { vertex: 2, .. })
        ));
    }

    #[test]
    fn test_deactivate_releases_slots() {
        let mut state = MeshState::from_triangle_mesh(&octahedron()).unwrap();
        assert!(state.deactivate(6));
        assert!(!state.deactivate(6));
        assert!(!state.is_active(6));
        assert_eq!(state.valence(6), 0);
        assert!(state.patch(6).is_empty());
    }
}
