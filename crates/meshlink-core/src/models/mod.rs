//! Domain models shared by the registry and the HTTP layer.

pub mod download;
pub mod format;

pub use download::{DownloadEntry, DownloadInfoResponse, GenerateLinkResponse};
pub use format::{MeshFormat, UnsupportedFormat};
