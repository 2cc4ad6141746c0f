//! Mesh ingestion into the directed-edge representation
//!
//! Faces are read once into the gate map, then each vertex's unordered
//! opposite-edge pairs are chained into its cyclic one-ring.

use crate::gate::{Gate, VertexId};
use crate::state::MeshState;
use progmesh_core::{Error, Point3f, Result};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Build a [`MeshState`] from coordinates and 1-based triangle records.
pub fn build(coords: Vec<Point3f>, faces: &[[VertexId; 3]]) -> Result<MeshState> {
    let n = coords.len();
    let mut gates = BTreeMap::new();
    let mut valences = vec![0usize; n + 1];
    let mut pairs: Vec<Vec<(VertexId, VertexId)>> = vec![Vec::new(); n + 1];

    for (fi, &[a, b, c]) in faces.iter().enumerate() {
        if let Some(&bad) = [a, b, c].iter().find(|&&v| v == 0 || v > n) {
            return Err(Error::InvalidData(format!(
                "face {} references vertex {bad}, mesh has {n} vertices",
                fi + 1
            )));
        }
        if a == b || b == c || c == a {
            return Err(Error::InvalidData(format!(
                "face {} repeats a vertex: ({a}, {b}, {c})",
                fi + 1
            )));
        }

        for (x, y, z) in [(a, b, c), (b, c, a), (c, a, b)] {
            match gates.entry(Gate::new(x, y)) {
                Entry::Occupied(_) => {
                    return Err(Error::NonManifoldVertex {
                        vertex: x,
                        reason: format!("directed edge ({x}, {y}) is claimed by two faces"),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(z);
                }
            }
            valences[x] += 1;
            pairs[x].push((y, z));
        }
    }

    let mut patches = Vec::with_capacity(n + 1);
    for (v, ring) in pairs.into_iter().enumerate() {
        patches.push(order_ring(v, ring)?);
    }

    Ok(MeshState::from_parts(coords, gates, valences, patches))
}

/// Chain the opposite-edge pairs of `v` into one closed cycle.
fn order_ring(v: VertexId, mut pairs: Vec<(VertexId, VertexId)>) -> Result<Vec<VertexId>> {
    if pairs.is_empty() {
        return Ok(Vec::new());
    }

    let (start, mut end) = pairs.remove(0);
    let mut chain = Vec::with_capacity(pairs.len() + 1);
    chain.push(start);
    chain.push(end);

    while pairs.len() > 1 {
        let next = pairs
            .iter()
            .position(|&(from, _)| from == end)
            .ok_or_else(|| Error::NonManifoldVertex {
                vertex: v,
                reason: format!("one-ring breaks after neighbor {end}"),
            })?;
        end = pairs.remove(next).1;
        chain.push(end);
    }

    match pairs.first() {
        Some(&closing) if closing == (end, start) => Ok(chain),
        Some(&(from, to)) => Err(Error::NonManifoldVertex {
            vertex: v,
            reason: format!("one-ring does not close: ({from}, {to}) after ({end}, {start})"),
        }),
        // a vertex on a single triangle has an open ring
        None => Err(Error::NonManifoldVertex {
            vertex: v,
            reason: "vertex belongs to a single triangle".to_string(),
        }),
    }
}
