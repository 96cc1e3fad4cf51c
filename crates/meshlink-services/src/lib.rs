pub mod cleanup;
pub mod registry;

pub use cleanup::CleanupService;
pub use registry::{DownloadRegistry, RegistryError};
