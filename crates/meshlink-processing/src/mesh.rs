//! Indexed triangle mesh shared by every codec and repair pass.

/// Triangle mesh with shared vertices. Face indices are zero-based.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Corner positions of face `index`.
    pub fn triangle(&self, index: usize) -> [[f32; 3]; 3] {
        let [a, b, c] = self.faces[index];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Rotate +90 degrees about X, turning a Y-up model into a Z-up one.
    pub fn reorient_z_up(&mut self) {
        for v in &mut self.vertices {
            let [x, y, z] = *v;
            *v = [x, -z, y];
        }
    }
}

pub(crate) fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub(crate) fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn length(a: [f32; 3]) -> f32 {
    (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt()
}

/// Unit normal of a triangle, zero for degenerate input.
pub(crate) fn face_normal(tri: &[[f32; 3]; 3]) -> [f32; 3] {
    let n = cross(sub(tri[1], tri[0]), sub(tri[2], tri[0]));
    let len = length(n);
    if len > 0.0 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0; 3]
    }
}

/// Area of a triangle.
pub(crate) fn triangle_area(tri: &[[f32; 3]; 3]) -> f32 {
    length(cross(sub(tri[1], tri[0]), sub(tri[2], tri[0]))) * 0.5
}
