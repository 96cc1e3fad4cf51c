use crate::error::{ConversionError, ConversionResult};
use crate::mesh::{face_normal, IndexedMesh};
use meshlink_core::MeshFormat;
use std::io::Cursor;
use stl_io::{Normal, Triangle, Vertex};

/// Read binary or ASCII STL.
pub fn read(bytes: &[u8]) -> ConversionResult<IndexedMesh> {
    let mut cursor = Cursor::new(bytes);
    let stl = stl_io::read_stl(&mut cursor)
        .map_err(|e| ConversionError::parse(MeshFormat::Stl, e.to_string()))?;

    let faces = stl
        .faces
        .iter()
        .map(|face| {
            let [a, b, c] = face.vertices;
            let convert = |i: usize| {
                u32::try_from(i)
                    .map_err(|_| ConversionError::parse(MeshFormat::Stl, "too many vertices"))
            };
            Ok([convert(a)?, convert(b)?, convert(c)?])
        })
        .collect::<ConversionResult<Vec<_>>>()?;

    Ok(IndexedMesh {
        vertices: stl.vertices.iter().map(|v| v.0).collect(),
        faces,
    })
}

/// Write binary STL with per-face normals recomputed from the geometry.
pub fn write(mesh: &IndexedMesh) -> ConversionResult<Vec<u8>> {
    let triangles: Vec<Triangle> = (0..mesh.faces.len())
        .map(|i| {
            let tri = mesh.triangle(i);
            Triangle {
                normal: Normal::new(face_normal(&tri)),
                vertices: [
                    Vertex::new(tri[0]),
                    Vertex::new(tri[1]),
                    Vertex::new(tri[2]),
                ],
            }
        })
        .collect();

    let mut out = Cursor::new(Vec::with_capacity(84 + triangles.len() * 50));
    stl_io::write_stl(&mut out, triangles.iter())
        .map_err(|e| ConversionError::encode(MeshFormat::Stl, e))?;
    Ok(out.into_inner())
}
