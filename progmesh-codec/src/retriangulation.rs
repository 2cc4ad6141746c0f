//! Hole filling after a vertex removal
//!
//! A removed vertex of valence `k` leaves a `k`-gon bounded by its chain,
//! rotated so that index 0 is the gate's `right` and index `k - 1` its
//! `left`. Each case below is a fixed fan of `k - 2` triangles over that
//! chain, chosen from the signs of `left` and `right` so that successive
//! removals alternate their diagonals and keep valences near 6.

use crate::gate::{Gate, VertexId};
use crate::state::MeshState;
use crate::traversal::{Sign, SignMap};
use progmesh_core::{Error, Result};

/// How one chain member's patch changes when the removed vertex goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatchEdit {
    /// Remove the vertex.
    Remove,
    /// Replace the vertex by the chain member at this index.
    Replace(usize),
    /// Replace the vertex by these two chain members, in order.
    Splice(usize, usize),
}

use PatchEdit::{Remove, Replace, Splice};

/// Static description of one fan, in chain indices.
#[derive(Debug)]
struct FanRule {
    triangles: &'static [[usize; 3]],
    deltas: &'static [isize],
    edits: &'static [PatchEdit],
    /// Signs for chain members `1..k-1`, assigned only where absent.
    signs: &'static [Sign],
}

static TRIANGLE: FanRule = FanRule {
    triangles: &[[2, 0, 1]],
    deltas: &[-1, -1, -1],
    edits: &[Remove, Remove, Remove],
    signs: &[],
};

static QUAD_LEFT_TO_FIRST: FanRule = FanRule {
    triangles: &[[3, 0, 1], [1, 2, 3]],
    deltas: &[-1, 0, -1, 0],
    edits: &[Remove, Replace(3), Remove, Replace(1)],
    signs: &[Sign::Plus, Sign::Minus],
};

static QUAD_RIGHT_TO_SECOND: FanRule = FanRule {
    triangles: &[[3, 0, 2], [0, 1, 2]],
    deltas: &[0, -1, 0, -1],
    edits: &[Replace(2), Remove, Replace(0), Remove],
    signs: &[Sign::Minus, Sign::Plus],
};

static PENTAGON_HUB_FIRST: FanRule = FanRule {
    triangles: &[[4, 0, 1], [1, 2, 3], [3, 4, 1]],
    deltas: &[-1, 1, -1, 0, 0],
    edits: &[Remove, Splice(3, 4), Remove, Replace(1), Replace(1)],
    signs: &[Sign::Plus, Sign::Minus, Sign::Plus],
};

static PENTAGON_HUB_THIRD: FanRule = FanRule {
    triangles: &[[4, 0, 3], [0, 1, 3], [1, 2, 3]],
    deltas: &[0, 0, -1, 1, -1],
    edits: &[Replace(3), Replace(3), Remove, Splice(0, 1), Remove],
    signs: &[Sign::Plus, Sign::Minus, Sign::Plus],
};

static PENTAGON_HUB_SECOND: FanRule = FanRule {
    triangles: &[[4, 0, 2], [0, 1, 2], [2, 3, 4]],
    deltas: &[0, -1, 1, -1, 0],
    edits: &[Replace(2), Remove, Splice(4, 0), Remove, Replace(2)],
    signs: &[Sign::Minus, Sign::Plus, Sign::Minus],
};

static HEXAGON_ODD_TRIANGLE: FanRule = FanRule {
    triangles: &[[5, 0, 1], [1, 2, 3], [3, 4, 5], [5, 1, 3]],
    deltas: &[-1, 1, -1, 1, -1, 1],
    edits: &[Remove, Splice(3, 5), Remove, Splice(5, 1), Remove, Splice(1, 3)],
    signs: &[Sign::Plus, Sign::Minus, Sign::Plus, Sign::Minus],
};

static HEXAGON_EVEN_TRIANGLE: FanRule = FanRule {
    triangles: &[[5, 0, 4], [0, 1, 2], [2, 3, 4], [0, 2, 4]],
    deltas: &[1, -1, 1, -1, 1, -1],
    edits: &[Splice(2, 4), Remove, Splice(4, 0), Remove, Splice(0, 2), Remove],
    signs: &[Sign::Minus, Sign::Plus, Sign::Minus, Sign::Plus],
};

/// Cut of a valence-4 hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadCut {
    /// Diagonal from `left` to chain index 1; used when `right` is `-`.
    LeftToFirst,
    /// Diagonal from `right` to chain index 2.
    RightToSecond,
}

/// Hub of a valence-5 hole, the chain member gaining a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PentagonCut {
    /// `right` is `-`.
    HubFirst,
    /// `left` is `-`.
    HubThird,
    /// Both endpoints are `+`.
    HubSecond,
}

/// Inner triangle of a valence-6 hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexagonCut {
    /// Inner triangle on chain indices 1, 3, 5; used when `right` is `-`.
    OddTriangle,
    /// Inner triangle on chain indices 0, 2, 4.
    EvenTriangle,
}

/// The retriangulation applied to one removed vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retriangulation {
    Triangle,
    Quad(QuadCut),
    Pentagon(PentagonCut),
    Hexagon(HexagonCut),
}

impl Retriangulation {
    /// Pick the case for a hole of `valence` given the gate endpoint signs.
    ///
    /// Returns `None` for valences outside `3..=6`.
    pub fn select(valence: usize, left: Sign, right: Sign) -> Option<Self> {
        let case = match valence {
            3 => Self::Triangle,
            4 if right == Sign::Minus => Self::Quad(QuadCut::LeftToFirst),
            4 => Self::Quad(QuadCut::RightToSecond),
            5 if right == Sign::Minus => Self::Pentagon(PentagonCut::HubFirst),
            5 if left == Sign::Minus => Self::Pentagon(PentagonCut::HubThird),
            5 => Self::Pentagon(PentagonCut::HubSecond),
            6 if right == Sign::Minus => Self::Hexagon(HexagonCut::OddTriangle),
            6 => Self::Hexagon(HexagonCut::EvenTriangle),
            _ => return None,
        };
        Some(case)
    }

    pub fn valence(self) -> usize {
        self.rule().deltas.len()
    }

    fn rule(self) -> &'static FanRule {
        match self {
            Self::Triangle => &TRIANGLE,
            Self::Quad(QuadCut::LeftToFirst) => &QUAD_LEFT_TO_FIRST,
            Self::Quad(QuadCut::RightToSecond) => &QUAD_RIGHT_TO_SECOND,
            Self::Pentagon(PentagonCut::HubFirst) => &PENTAGON_HUB_FIRST,
            Self::Pentagon(PentagonCut::HubThird) => &PENTAGON_HUB_THIRD,
            Self::Pentagon(PentagonCut::HubSecond) => &PENTAGON_HUB_SECOND,
            Self::Hexagon(HexagonCut::OddTriangle) => &HEXAGON_ODD_TRIANGLE,
            Self::Hexagon(HexagonCut::EvenTriangle) => &HEXAGON_EVEN_TRIANGLE,
        }
    }

    /// Chain index pairs of the edges the fan adds inside the hole.
    fn diagonal_indices(self) -> Vec<(usize, usize)> {
        let k = self.valence();
        let mut out = Vec::new();
        for tri in self.rule().triangles {
            for j in 0..3 {
                let (a, b) = (tri[j], tri[(j + 1) % 3]);
                let (lo, hi) = (a.min(b), a.max(b));
                let boundary = hi - lo == 1 || (lo == 0 && hi == k - 1);
                if !boundary && !out.contains(&(lo, hi)) {
                    out.push((lo, hi));
                }
            }
        }
        out
    }

    /// Vertex pairs the fan would join with a new edge.
    pub fn diagonals(self, chain: &[VertexId]) -> Vec<(VertexId, VertexId)> {
        self.diagonal_indices()
            .into_iter()
            .filter_map(|(a, b)| Some((*chain.get(a)?, *chain.get(b)?)))
            .collect()
    }

    /// Fill the hole left by `front`.
    ///
    /// `chain` is the rotated patch of `front`, whose gates must already be
    /// gone from the map. Installs the fan, adjusts the chain's valences and
    /// patches, and assigns signs to unsigned chain members.
    pub fn apply(
        self,
        state: &mut MeshState,
        signs: &mut SignMap,
        chain: &[VertexId],
        front: VertexId,
        gate: Gate,
    ) -> Result<()> {
        let rule = self.rule();
        if chain.len() != rule.deltas.len() {
            return Err(Error::inconsistency(
                gate.as_pair(),
                Some(front),
                format!(
                    "chain of {} vertices for a valence-{} fan",
                    chain.len(),
                    rule.deltas.len()
                ),
            ));
        }

        for &[a, b, c] in rule.triangles {
            state.set_triangle(chain[a], chain[b], chain[c]);
        }

        for (i, (&delta, &edit)) in rule.deltas.iter().zip(rule.edits).enumerate() {
            let v = chain[i];
            if delta != 0 {
                state.adjust_valence(v, delta, gate)?;
            }
            let edited = match edit {
                Remove => state.patch_drop(v, front),
                Replace(j) => state.patch_replace(v, front, chain[j]),
                Splice(x, y) => state.patch_splice(v, front, chain[x], chain[y]),
            };
            if !edited {
                return Err(Error::inconsistency(
                    gate.as_pair(),
                    Some(front),
                    format!("removed vertex missing from the patch of {v}"),
                ));
            }
        }

        if self == Self::Triangle {
            let left = signs.require(gate.left, gate)?;
            let right = signs.require(gate.right, gate)?;
            let sign = if left == Sign::Plus && right == Sign::Plus {
                Sign::Minus
            } else {
                Sign::Plus
            };
            signs.assign(chain[1], sign);
        } else {
            for (offset, &sign) in rule.signs.iter().enumerate() {
                signs.assign(chain[offset + 1], sign);
            }
        }
        Ok(())
    }
}
