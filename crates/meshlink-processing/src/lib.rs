//! Mesh decoding, repair and format conversion.

pub mod converter;
pub mod error;
pub mod formats;
pub mod mesh;
pub mod repair;

pub use converter::{MeshCodec, MeshConverter};
pub use error::{ConversionError, ConversionResult};
pub use mesh::IndexedMesh;
pub use repair::{BasicRepairer, MeshRepairer, RepairOptions, RepairParams, RepairSummary};
