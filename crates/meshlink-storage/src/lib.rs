//! Scratch-directory storage for uploaded and generated mesh files.

pub mod error;
pub mod guard;
pub mod scratch;

pub use error::{StorageError, StorageResult};
pub use guard::{FileStream, GuardedStream, ScratchFile};
pub use scratch::{delete_file, delete_in_background, ScratchStorage};
