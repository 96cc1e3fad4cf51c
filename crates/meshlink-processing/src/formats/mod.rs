pub mod obj;
pub mod stl;
pub mod threemf;

use crate::error::{ConversionError, ConversionResult};
use crate::mesh::IndexedMesh;
use meshlink_core::MeshFormat;

/// Decode `bytes` in `format`. 3MF is output-only.
pub fn decode(bytes: &[u8], format: MeshFormat) -> ConversionResult<IndexedMesh> {
    match format {
        MeshFormat::Obj => obj::read(bytes),
        MeshFormat::Stl => stl::read(bytes),
        MeshFormat::ThreeMf => Err(ConversionError::Unsupported {
            from: MeshFormat::ThreeMf,
            to: MeshFormat::CANONICAL,
        }),
    }
}

pub fn encode(mesh: &IndexedMesh, format: MeshFormat) -> ConversionResult<Vec<u8>> {
    match format {
        MeshFormat::Obj => Ok(obj::write(mesh).into_bytes()),
        MeshFormat::Stl => stl::write(mesh),
        MeshFormat::ThreeMf => threemf::write(mesh),
    }
}
