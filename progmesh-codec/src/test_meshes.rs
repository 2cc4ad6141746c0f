//! Small closed meshes shared by the unit tests

use crate::gate::Gate;
use crate::state::MeshState;
use progmesh_core::{Point3f, TriangleMesh};
use std::collections::HashMap;

pub fn tetrahedron() -> TriangleMesh {
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

pub fn octahedron() -> TriangleMesh {
    TriangleMesh::from_vertices_and_faces(
        vec![
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(-1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(0.0, -1.0, 0.0),
            Point3f::new(0.0, 0.0, 1.0),
            Point3f::new(0.0, 0.0, -1.0),
        ],
        vec![
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ],
    )
}

/// Octahedron with face (1, 3, 5) split by a seventh, valence-3 vertex.
pub fn capped_octahedron() -> TriangleMesh {
    let mut mesh = octahedron();
    mesh.faces.remove(0);
    let cap = mesh.add_vertex(Point3f::new(0.4, 0.4, 0.4));
    mesh.add_face([0, 2, cap]);
    mesh.add_face([2, 4, cap]);
    mesh.add_face([4, 0, cap]);
    mesh
}

pub fn icosahedron() -> TriangleMesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    TriangleMesh::from_vertices_and_faces(
        vec![
            Point3f::new(-1.0, t, 0.0),
            Point3f::new(1.0, t, 0.0),
            Point3f::new(-1.0, -t, 0.0),
            Point3f::new(1.0, -t, 0.0),
            Point3f::new(0.0, -1.0, t),
            Point3f::new(0.0, 1.0, t),
            Point3f::new(0.0, -1.0, -t),
            Point3f::new(0.0, 1.0, -t),
            Point3f::new(t, 0.0, -1.0),
            Point3f::new(t, 0.0, 1.0),
            Point3f::new(-t, 0.0, -1.0),
            Point3f::new(-t, 0.0, 1.0),
        ],
        vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ],
    )
}

/// Icosahedron subdivided `levels` times, every face split in four.
pub fn icosphere(levels: usize) -> TriangleMesh {
    let mut mesh = icosahedron();
    for v in &mut mesh.vertices {
        *v = Point3f::from(v.coords.normalize());
    }
    for _ in 0..levels {
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut faces = Vec::with_capacity(mesh.faces.len() * 4);
        let old_faces = std::mem::take(&mut mesh.faces);
        for [a, b, c] in old_faces {
            let mut midpoint = |x: usize, y: usize| {
                *midpoints.entry((x.min(y), x.max(y))).or_insert_with(|| {
                    let m = (mesh.vertices[x].coords + mesh.vertices[y].coords) / 2.0;
                    mesh.add_vertex(Point3f::from(m.normalize()))
                })
            };
            let ab = midpoint(a, b);
            let bc = midpoint(b, c);
            let ca = midpoint(c, a);
            faces.extend([[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        mesh.faces = faces;
    }
    mesh
}

/// Octahedron whose edge (1, 3) is doubled by a valence-2 vertex 7.
///
/// Triangles (1, 3, 5) and (3, 1, 6) are replaced by the bigon (1, 3, 7),
/// (3, 1, 7), leaving four gates unmatched.
pub fn with_bigon() -> MeshState {
    let mut state = MeshState::from_triangle_mesh(&octahedron()).unwrap();
    for gate in [(1, 3), (3, 5), (5, 1), (3, 1), (1, 6), (6, 3)] {
        state.remove_gate(Gate::from(gate)).unwrap();
    }
    state.coords.push(Point3f::new(0.5, 0.5, 0.0));
    state.valences.push(2);
    state.patches.push(vec![1, 3]);
    state.active.insert(7);
    state.set_triangle(1, 3, 7);
    state.set_triangle(3, 1, 7);

    state.patches[1] = vec![3, 7, 3, 5, 4, 6];
    state.patches[3] = vec![5, 1, 7, 1, 6, 2];
    state.valences[1] = 6;
    state.valences[3] = 6;
    state
}
