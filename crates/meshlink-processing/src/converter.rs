use crate::error::{ConversionError, ConversionResult};
use crate::formats;
use meshlink_core::MeshFormat;

/// Converts mesh bytes between formats.
///
/// Implementations are synchronous; callers run them on a blocking thread.
pub trait MeshConverter: Send + Sync {
    fn convert(&self, bytes: &[u8], source: MeshFormat, target: MeshFormat)
        -> ConversionResult<Vec<u8>>;
}

/// Converter backed by the built-in OBJ/STL/3MF codecs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshCodec;

impl MeshConverter for MeshCodec {
    fn convert(
        &self,
        bytes: &[u8],
        source: MeshFormat,
        target: MeshFormat,
    ) -> ConversionResult<Vec<u8>> {
        if source == target {
            return Ok(bytes.to_vec());
        }
        if source == MeshFormat::ThreeMf {
            return Err(ConversionError::Unsupported {
                from: source,
                to: target,
            });
        }

        let mesh = formats::decode(bytes, source)?;
        let out = formats::encode(&mesh, target)?;

        tracing::debug!(
            %source,
            %target,
            input_bytes = bytes.len(),
            output_bytes = out.len(),
            faces = mesh.faces.len(),
            "Mesh converted"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &[u8] = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn same_format_is_passthrough() {
        let out = MeshCodec.convert(TRIANGLE, MeshFormat::Obj, MeshFormat::Obj).unwrap();
        assert_eq!(out, TRIANGLE);
    }

    #[test]
    fn obj_to_stl_and_3mf() {
        let stl = MeshCodec.convert(TRIANGLE, MeshFormat::Obj, MeshFormat::Stl).unwrap();
        assert_eq!(stl.len(), 84 + 50);

        let three_mf = MeshCodec
            .convert(TRIANGLE, MeshFormat::Obj, MeshFormat::ThreeMf)
            .unwrap();
        assert_eq!(&three_mf[0..2], b"PK");
    }

    #[test]
    fn three_mf_source_is_unsupported() {
        let err = MeshCodec
            .convert(b"PK", MeshFormat::ThreeMf, MeshFormat::Stl)
            .unwrap_err();
        assert!(matches!(err, ConversionError::Unsupported { .. }));
    }
}
