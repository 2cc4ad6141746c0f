//! Directed edges ("gates") and vertex ids

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable 1-based vertex id, numbered in input file order.
pub type VertexId = usize;

/// A directed edge `(left, right)` of the mesh.
///
/// Every gate of a closed mesh belongs to exactly one oriented triangle
/// `(left, right, apex)`; the gate map stores that apex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Gate {
    pub left: VertexId,
    pub right: VertexId,
}

impl Gate {
    pub fn new(left: VertexId, right: VertexId) -> Self {
        Self { left, right }
    }

    /// The same edge walked the other way, owned by the adjacent triangle.
    pub fn reversed(self) -> Self {
        Self {
            left: self.right,
            right: self.left,
        }
    }

    pub fn touches(self, v: VertexId) -> bool {
        self.left == v || self.right == v
    }

    pub fn as_pair(self) -> (VertexId, VertexId) {
        (self.left, self.right)
    }
}

impl From<(VertexId, VertexId)> for Gate {
    fn from((left, right): (VertexId, VertexId)) -> Self {
        Self { left, right }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.left, self.right)
    }
}
