use meshlink_core::MeshFormat;
use thiserror::Error;

/// Errors produced while decoding, repairing or encoding meshes.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Invalid {format} data: {message}")]
    Parse { format: MeshFormat, message: String },

    #[error("Mesh contains no usable faces")]
    EmptyMesh,

    #[error("Conversion from {from} to {to} is not supported")]
    Unsupported { from: MeshFormat, to: MeshFormat },

    #[error("Failed to encode {format}: {message}")]
    Encode { format: MeshFormat, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConversionError {
    pub(crate) fn parse(format: MeshFormat, message: impl Into<String>) -> Self {
        ConversionError::Parse {
            format,
            message: message.into(),
        }
    }

    pub(crate) fn encode(format: MeshFormat, message: impl std::fmt::Display) -> Self {
        ConversionError::Encode {
            format,
            message: message.to_string(),
        }
    }

    /// Whether the error stems from the input mesh rather than from the service.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ConversionError::Parse { .. } | ConversionError::EmptyMesh
        )
    }
}

pub type ConversionResult<T> = Result<T, ConversionError>;
