//! Breadth-first machinery shared by the conquests
//!
//! A conquest walks gates in FIFO order, deciding per triangle whether its
//! apex is removed, kept, or skipped. The bookkeeping here is scoped to one
//! conquest call and dropped afterwards.

use crate::gate::{Gate, VertexId};
use crate::state::MeshState;
use itertools::Itertools;
use progmesh_core::{Error, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;

/// Parity label steering the retriangulation case choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Plus => write!(f, "+"),
            Sign::Minus => write!(f, "-"),
        }
    }
}

/// Signs assigned during one decimating pass. A sign is never overwritten.
#[derive(Debug, Default, Clone)]
pub struct SignMap {
    signs: HashMap<VertexId, Sign>,
}

impl SignMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, v: VertexId) -> Option<Sign> {
        self.signs.get(&v).copied()
    }

    /// Assign `sign` unless `v` already carries one.
    pub fn assign(&mut self, v: VertexId, sign: Sign) {
        self.signs.entry(v).or_insert(sign);
    }

    /// Sign of an endpoint of `gate`, which must have been assigned.
    pub fn require(&self, v: VertexId, gate: Gate) -> Result<Sign> {
        self.get(v)
            .ok_or_else(|| Error::inconsistency(gate.as_pair(), Some(v), "vertex has no sign"))
    }
}

/// Marker for a triangle reached by the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceStatus {
    /// Part of a removed vertex's star, or produced by its fan.
    Conquered,
    /// Its apex was kept.
    Null,
}

/// Queue and markers of one conquest call.
#[derive(Debug, Default)]
pub struct Traversal {
    queue: VecDeque<Gate>,
    faces: BTreeMap<Gate, FaceStatus>,
    visited: BTreeSet<VertexId>,
}

impl Traversal {
    pub fn seeded(seed: Gate) -> Self {
        let mut traversal = Self::default();
        traversal.queue.push_back(seed);
        traversal
    }

    pub fn pop(&mut self) -> Option<Gate> {
        self.queue.pop_front()
    }

    pub fn push(&mut self, gate: Gate) {
        self.queue.push_back(gate);
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Drop every queued gate with `v` as an endpoint.
    pub fn purge(&mut self, v: VertexId) {
        self.queue.retain(|g| !g.touches(v));
    }

    pub fn face_status(&self, gate: Gate) -> Option<FaceStatus> {
        self.faces.get(&gate).copied()
    }

    pub fn is_marked(&self, gate: Gate) -> bool {
        self.faces.contains_key(&gate)
    }

    pub fn mark_face(&mut self, gate: Gate, status: FaceStatus) {
        self.faces.insert(gate, status);
    }

    pub fn visit(&mut self, v: VertexId) {
        self.visited.insert(v);
    }

    pub fn is_visited(&self, v: VertexId) -> bool {
        self.visited.contains(&v)
    }

    /// Enqueue the reversed consecutive pairs of `chain`, marking the inner
    /// triangles they leave behind as conquered.
    pub fn enqueue_chain(&mut self, chain: &[VertexId]) {
        for (&a, &b) in chain.iter().tuple_windows() {
            self.queue.push_back(Gate::new(b, a));
            self.faces.insert(Gate::new(a, b), FaceStatus::Conquered);
        }
    }

    /// Mark the triangle on `gate` null and continue across its two other edges.
    pub fn enqueue_flanks(&mut self, gate: Gate, front: VertexId) {
        self.faces.insert(gate, FaceStatus::Null);
        self.queue.push_back(Gate::new(front, gate.right));
        self.queue.push_back(Gate::new(gate.left, front));
    }
}

/// The patch of `front` rotated to start at `right`.
pub fn rotate_chain(state: &MeshState, front: VertexId, gate: Gate) -> Result<Vec<VertexId>> {
    let patch = state.patch(front);
    let start = patch
        .iter()
        .position(|&n| n == gate.right)
        .ok_or_else(|| {
            Error::inconsistency(
                gate.as_pair(),
                Some(front),
                format!("{} is missing from the patch of the front", gate.right),
            )
        })?;
    let mut chain = patch.to_vec();
    chain.rotate_left(start);
    Ok(chain)
}

/// Apex of `gate`, which must exist.
pub fn require_apex(state: &MeshState, gate: Gate) -> Result<VertexId> {
    state
        .apex(gate)
        .ok_or_else(|| Error::inconsistency(gate.as_pair(), None, "gate has no apex"))
}
