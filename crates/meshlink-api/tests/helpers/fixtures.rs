//! Mesh fixtures.

/// A unit square as two triangles, with the shared edge's vertices duplicated
/// and one face repeated, so repair has something to do.
pub const TRIANGLE_PAIR_OBJ: &str = "\
# square
v 0 0 0
v 1 0 0
v 1 1 0
v 0 0 0
v 1 1 0
v 0 1 0
f 1 2 3
f 4 5 6
f 1 2 3
";

/// Only a zero-area face; nothing survives repair.
pub const DEGENERATE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 2 0 0\nf 1 2 3\n";

/// Face referring to a vertex that does not exist.
pub const BROKEN_OBJ: &str = "v 0 0 0\nv 1 0 0\nf 1 2 7\n";
