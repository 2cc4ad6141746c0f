//! Mesh data structures and functionality

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// An indexed triangle mesh with 0-based face indices.
///
/// This is the exchange format between the file readers/writers and the
/// codec. The codec itself works on 1-based vertex ids, the way OBJ records
/// number them, and converts at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: [usize; 3]) {
        self.faces.push(face);
    }

    /// Number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        let mut edges = HashSet::with_capacity(self.faces.len() * 3 / 2);
        for face in &self.faces {
            for j in 0..3 {
                let (a, b) = (face[j], face[(j + 1) % 3]);
                edges.insert((a.min(b), a.max(b)));
            }
        }
        edges.len()
    }

    /// Euler characteristic `V - E + F`; 2 for a closed genus-0 surface.
    pub fn euler_characteristic(&self) -> i64 {
        self.vertices.len() as i64 - self.edge_count() as i64 + self.faces.len() as i64
    }

    /// True when every directed edge has its reverse in another face.
    pub fn is_closed(&self) -> bool {
        let mut directed = HashSet::with_capacity(self.faces.len() * 3);
        for face in &self.faces {
            for j in 0..3 {
                directed.insert((face[j], face[(j + 1) % 3]));
            }
        }
        directed.iter().all(|&(a, b)| directed.contains(&(b, a)))
    }

    /// Check that every face references existing, distinct vertices.
    pub fn validate_indices(&self) -> Result<()> {
        let n = self.vertices.len();
        for (fi, face) in self.faces.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&v| v >= n) {
                return Err(Error::InvalidData(format!(
                    "face {fi} references vertex {bad}, mesh has {n} vertices"
                )));
            }
            if face[0] == face[1] || face[1] == face[2] || face[2] == face[0] {
                return Err(Error::InvalidData(format!(
                    "face {fi} is degenerate: {face:?}"
                )));
            }
        }
        Ok(())
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tetrahedron() -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.5, 1.0, 0.0),
                Point3f::new(0.5, 0.5, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
    }

    #[test]
    fn test_counts() {
        let mesh = make_tetrahedron();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.edge_count(), 6);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_euler_and_closed() {
        let mesh = make_tetrahedron();
        assert_eq!(mesh.euler_characteristic(), 2);
        assert!(mesh.is_closed());

        let mut open = mesh.clone();
        open.faces.pop();
        assert!(!open.is_closed());
    }

    #[test]
    fn test_validate_indices() {
        let mut mesh = make_tetrahedron();
        assert!(mesh.validate_indices().is_ok());

        mesh.add_face([0, 1, 7]);
        assert!(matches!(mesh.validate_indices(), Err(Error::InvalidData(_))));

        mesh.faces.pop();
        mesh.add_face([2, 2, 3]);
        assert!(mesh.validate_indices().is_err());
    }

    #[test]
    fn test_add_and_clear() {
        let mut mesh = TriangleMesh::default();
        assert!(mesh.is_empty());
        let a = mesh.add_vertex(Point3f::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3f::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3f::new(0.0, 1.0, 0.0));
        mesh.add_face([a, b, c]);
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(mesh.face_count(), 1);
        mesh.clear();
        assert!(mesh.is_empty());
    }
}
