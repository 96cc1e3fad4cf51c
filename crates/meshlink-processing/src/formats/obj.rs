//! Wavefront OBJ geometry: `v` and `f` statements only.

use crate::error::{ConversionError, ConversionResult};
use crate::mesh::IndexedMesh;
use meshlink_core::MeshFormat;
use std::fmt::Write;

fn parse_error(line_no: usize, message: impl std::fmt::Display) -> ConversionError {
    ConversionError::parse(MeshFormat::Obj, format!("line {}: {}", line_no, message))
}

/// Resolve an OBJ vertex reference (`7`, `7/1`, `7//3`, `-1/2/3`) to a zero-based index.
fn resolve_index(token: &str, vertex_count: usize, line_no: usize) -> ConversionResult<u32> {
    let raw = token.split('/').next().unwrap_or_default();
    let value: i64 = raw
        .parse()
        .map_err(|_| parse_error(line_no, format!("invalid vertex reference '{}'", token)))?;

    let index = match value {
        0 => return Err(parse_error(line_no, "vertex index 0 is not valid")),
        v if v > 0 => v - 1,
        v => vertex_count as i64 + v,
    };

    if index < 0 || index >= vertex_count as i64 {
        return Err(parse_error(
            line_no,
            format!("vertex index {} out of range", value),
        ));
    }
    u32::try_from(index).map_err(|_| parse_error(line_no, "vertex index too large"))
}

/// Parse OBJ text. Polygons are fan-triangulated; other statements are ignored.
pub fn read(bytes: &[u8]) -> ConversionResult<IndexedMesh> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| ConversionError::parse(MeshFormat::Obj, "file is not valid UTF-8"))?;

    let mut mesh = IndexedMesh::new();

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let mut coords = [0.0f32; 3];
                for c in &mut coords {
                    let token = parts
                        .next()
                        .ok_or_else(|| parse_error(line_no, "vertex needs 3 coordinates"))?;
                    *c = token
                        .parse()
                        .map_err(|_| parse_error(line_no, format!("invalid coordinate '{}'", token)))?;
                    if !c.is_finite() {
                        return Err(parse_error(line_no, "non-finite coordinate"));
                    }
                }
                mesh.vertices.push(coords);
            }
            Some("f") => {
                let indices = parts
                    .map(|t| resolve_index(t, mesh.vertices.len(), line_no))
                    .collect::<ConversionResult<Vec<u32>>>()?;
                if indices.len() < 3 {
                    return Err(parse_error(line_no, "face needs at least 3 vertices"));
                }
                for k in 1..indices.len() - 1 {
                    mesh.faces.push([indices[0], indices[k], indices[k + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Serialize a mesh as OBJ text.
pub fn write(mesh: &IndexedMesh) -> String {
    let mut out = String::with_capacity(mesh.vertices.len() * 32 + mesh.faces.len() * 24);
    out.push_str("# meshlink\n");
    // Writing into a String cannot fail.
    for [x, y, z] in &mesh.vertices {
        let _ = writeln!(out, "v {} {} {}", x, y, z);
    }
    for [a, b, c] in &mesh.faces {
        let _ = writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1);
    }
    out
}
