//! OBJ format support
//!
//! Only the records the codec consumes are honoured: `v` positions and
//! triangular `f` faces. Texture and normal indices on face corners are
//! accepted and dropped.

use crate::{MeshReader, MeshWriter};
use progmesh_core::{Error, Point3f, Result, TriangleMesh};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct ObjReader;
pub struct ObjWriter;

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }
        let obj = ::obj::Obj::load(path)
            .map_err(|e| Error::InvalidData(format!("{}: {:?}", path.display(), e)))?;
        obj_data_to_mesh(&obj.data)
    }
}

impl MeshWriter for ObjWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        mesh.validate_indices()?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_obj(mesh, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Convert parsed OBJ data into a triangle mesh, rejecting non-triangular faces.
pub fn obj_data_to_mesh(data: &::obj::ObjData) -> Result<TriangleMesh> {
    let vertices: Vec<Point3f> = data
        .position
        .iter()
        .map(|p| Point3f::new(p[0], p[1], p[2]))
        .collect();

    let mut faces = Vec::new();
    for object in &data.objects {
        for group in &object.groups {
            for poly in &group.polys {
                let corners = &poly.0;
                if corners.len() != 3 {
                    return Err(Error::UnsupportedFormat(format!(
                        "face with {} corners in object '{}', only triangles are supported",
                        corners.len(),
                        object.name
                    )));
                }
                faces.push([corners[0].0, corners[1].0, corners[2].0]);
            }
        }
    }

    let mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
    mesh.validate_indices()?;
    Ok(mesh)
}

/// Write `v` records then 1-based `f` records.
pub fn write_obj<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> Result<()> {
    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for face in &mesh.faces {
        writeln!(writer, "f {} {} {}", face[0] + 1, face[1] + 1, face[2] + 1)?;
    }
    Ok(())
}
