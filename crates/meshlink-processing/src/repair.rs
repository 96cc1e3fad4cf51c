//! Mesh clean-up passes and the repairer used by the upload pipeline.

use crate::error::{ConversionError, ConversionResult};
use crate::formats;
use crate::mesh::{length, sub, triangle_area, IndexedMesh};
use meshlink_core::MeshFormat;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Thresholds for the repair passes, in model units.
#[derive(Debug, Clone)]
pub struct RepairParams {
    /// Vertices closer than this are merged.
    pub weld_epsilon: f32,
    /// Faces with a smaller area are dropped.
    pub degenerate_area_threshold: f32,
    pub remove_unreferenced: bool,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self {
            weld_epsilon: 1e-5,
            degenerate_area_threshold: 1e-10,
            remove_unreferenced: true,
        }
    }
}

/// Per-request repair switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairOptions {
    /// Rotate the model from Y-up to Z-up before repairing.
    pub reorient: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self { reorient: true }
    }
}

/// What the passes changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairSummary {
    pub vertices_welded: usize,
    pub degenerate_faces_removed: usize,
    pub duplicate_faces_removed: usize,
    pub unreferenced_vertices_removed: usize,
    pub final_vertices: usize,
    pub final_faces: usize,
}

fn cell_of(v: [f32; 3], cell_size: f32) -> (i64, i64, i64) {
    (
        (v[0] / cell_size).floor() as i64,
        (v[1] / cell_size).floor() as i64,
        (v[2] / cell_size).floor() as i64,
    )
}

/// Merge vertices closer than `epsilon`. Returns how many were merged.
pub fn weld_vertices(mesh: &mut IndexedMesh, epsilon: f32) -> usize {
    if mesh.vertices.is_empty() || epsilon <= 0.0 {
        return 0;
    }

    let mut grid: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (idx, v) in mesh.vertices.iter().enumerate() {
        grid.entry(cell_of(*v, epsilon)).or_default().push(idx as u32);
    }

    // Each vertex maps to the lowest-indexed vertex within reach that is itself canonical.
    let mut remap: Vec<u32> = (0..mesh.vertices.len() as u32).collect();
    let mut merged = 0;

    for idx in 0..mesh.vertices.len() {
        if remap[idx] != idx as u32 {
            continue;
        }
        let pos = mesh.vertices[idx];
        let (cx, cy, cz) = cell_of(pos, epsilon);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &other in candidates {
                        let o = other as usize;
                        if o <= idx || remap[o] != other {
                            continue;
                        }
                        if length(sub(pos, mesh.vertices[o])) < epsilon {
                            remap[o] = idx as u32;
                            merged += 1;
                        }
                    }
                }
            }
        }
    }

    if merged > 0 {
        for face in &mut mesh.faces {
            for i in face.iter_mut() {
                *i = remap[*i as usize];
            }
        }
    }
    merged
}

/// Drop faces that repeat a vertex or whose area is below `area_threshold`.
pub fn remove_degenerate_faces(mesh: &mut IndexedMesh, area_threshold: f32) -> usize {
    let before = mesh.faces.len();
    let vertices = &mesh.vertices;
    mesh.faces.retain(|&[a, b, c]| {
        if a == b || b == c || a == c {
            return false;
        }
        let tri = [
            vertices[a as usize],
            vertices[b as usize],
            vertices[c as usize],
        ];
        triangle_area(&tri) >= area_threshold
    });
    before - mesh.faces.len()
}

/// Rotate a face so its smallest index comes first, keeping the winding.
fn canonical_face([a, b, c]: [u32; 3]) -> [u32; 3] {
    if a <= b && a <= c {
        [a, b, c]
    } else if b <= a && b <= c {
        [b, c, a]
    } else {
        [c, a, b]
    }
}

/// Drop faces identical to an earlier one (same vertices, same winding).
pub fn remove_duplicate_faces(mesh: &mut IndexedMesh) -> usize {
    let before = mesh.faces.len();
    let mut seen = HashSet::with_capacity(before);
    mesh.faces.retain(|&face| seen.insert(canonical_face(face)));
    before - mesh.faces.len()
}

/// Drop vertices no face refers to and compact the index space.
pub fn remove_unreferenced_vertices(mesh: &mut IndexedMesh) -> usize {
    let mut used = vec![false; mesh.vertices.len()];
    for face in &mesh.faces {
        for &i in face {
            used[i as usize] = true;
        }
    }

    let mut new_index = vec![u32::MAX; mesh.vertices.len()];
    let mut kept = Vec::with_capacity(mesh.vertices.len());
    for (i, v) in mesh.vertices.iter().enumerate() {
        if used[i] {
            new_index[i] = kept.len() as u32;
            kept.push(*v);
        }
    }

    let removed = mesh.vertices.len() - kept.len();
    if removed > 0 {
        for face in &mut mesh.faces {
            for i in face.iter_mut() {
                *i = new_index[*i as usize];
            }
        }
        mesh.vertices = kept;
    }
    removed
}

/// Run every pass in order. A mesh left without faces is an error.
pub fn repair_mesh(mesh: &mut IndexedMesh, params: &RepairParams) -> ConversionResult<RepairSummary> {
    let mut summary = RepairSummary {
        vertices_welded: weld_vertices(mesh, params.weld_epsilon),
        degenerate_faces_removed: remove_degenerate_faces(mesh, params.degenerate_area_threshold),
        duplicate_faces_removed: remove_duplicate_faces(mesh),
        ..Default::default()
    };
    if params.remove_unreferenced {
        summary.unreferenced_vertices_removed = remove_unreferenced_vertices(mesh);
    }

    if mesh.is_empty() {
        return Err(ConversionError::EmptyMesh);
    }

    summary.final_vertices = mesh.vertices.len();
    summary.final_faces = mesh.faces.len();
    Ok(summary)
}

/// Repairs a mesh file on disk, writing a canonical OBJ.
///
/// Implementations are synchronous; callers run them on a blocking thread.
pub trait MeshRepairer: Send + Sync {
    /// Read the mesh at `input` (format taken from its extension) and write the
    /// repaired mesh as OBJ to `output`.
    fn repair(
        &self,
        input: &Path,
        output: &Path,
        options: &RepairOptions,
    ) -> ConversionResult<RepairSummary>;
}

/// Default repairer built on the passes in this module.
#[derive(Debug, Clone, Default)]
pub struct BasicRepairer {
    params: RepairParams,
}

impl BasicRepairer {
    pub fn new(params: RepairParams) -> Self {
        Self { params }
    }
}

impl MeshRepairer for BasicRepairer {
    fn repair(
        &self,
        input: &Path,
        output: &Path,
        options: &RepairOptions,
    ) -> ConversionResult<RepairSummary> {
        let format = input
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse::<MeshFormat>().ok())
            .unwrap_or(MeshFormat::Obj);

        let bytes = std::fs::read(input)?;
        let mut mesh = formats::decode(&bytes, format)?;
        if options.reorient {
            mesh.reorient_z_up();
        }

        let summary = repair_mesh(&mut mesh, &self.params)?;
        std::fs::write(output, formats::obj::write(&mesh))?;

        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            vertices_welded = summary.vertices_welded,
            degenerate_faces_removed = summary.degenerate_faces_removed,
            duplicate_faces_removed = summary.duplicate_faces_removed,
            final_faces = summary.final_faces,
            "Mesh repaired"
        );

        Ok(summary)
    }
}
