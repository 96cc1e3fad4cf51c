//! meshlink core library
//!
//! This crate provides configuration, error types, the clock abstraction and the
//! domain models shared across all meshlink crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{DownloadEntry, MeshFormat};
