//! Canonical output of a reduced level

use crate::gate::{Gate, VertexId};
use crate::state::MeshState;
use progmesh_core::{Error, Point3f, Result, TriangleMesh};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A level renumbered densely from 1, each triangle listed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedMesh {
    pub vertices: Vec<Point3f>,
    /// 1-based triangles, winding preserved.
    pub faces: Vec<[usize; 3]>,
    /// Original vertex id to dense output id.
    pub ids: BTreeMap<VertexId, usize>,
}

impl ReducedMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// 0-based copy for the mesh writers.
    pub fn to_triangle_mesh(&self) -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            self.vertices.clone(),
            self.faces
                .iter()
                .map(|f| [f[0] - 1, f[1] - 1, f[2] - 1])
                .collect(),
        )
    }
}

/// Emit the active part of `state` in ascending original id order.
pub fn serialize(state: &MeshState) -> Result<ReducedMesh> {
    let mut ids = BTreeMap::new();
    let mut vertices = Vec::with_capacity(state.active_count());
    for v in state.active() {
        let position = state.position(v).ok_or_else(|| {
            Error::InvalidData(format!("active vertex {v} has no coordinates"))
        })?;
        vertices.push(*position);
        ids.insert(v, vertices.len());
    }

    let mut remaining = state.gates().clone();
    let mut faces = Vec::with_capacity(remaining.len() / 3);
    for &gate in state.gates().keys() {
        let Some(front) = remaining.remove(&gate) else {
            continue;
        };
        let Gate { left, right } = gate;
        for companion in [Gate::new(right, front), Gate::new(front, left)] {
            if remaining.remove(&companion).is_none() {
                return Err(Error::inconsistency(
                    gate.as_pair(),
                    Some(front),
                    format!("companion gate {companion} is missing"),
                ));
            }
        }
        let dense = |v: VertexId| {
            ids.get(&v).copied().ok_or_else(|| {
                Error::inconsistency(gate.as_pair(), Some(front), format!("{v} is not active"))
            })
        };
        faces.push([dense(left)?, dense(right)?, dense(front)?]);
    }

    Ok(ReducedMesh {
        vertices,
        faces,
        ids,
    })
}
