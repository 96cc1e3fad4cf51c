use crate::error::{StorageError, StorageResult};
use crate::guard::{FileStream, GuardedStream, ScratchFile};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local scratch directory holding uploads, canonical artifacts and derived files.
///
/// Every file lives directly under `base_path` with a uuid-prefixed name, so two
/// requests never collide on a path.
#[derive(Clone, Debug)]
pub struct ScratchStorage {
    base_path: PathBuf,
}

impl ScratchStorage {
    /// Create a new ScratchStorage, creating the directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create scratch directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let base_path = fs::canonicalize(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize scratch path: {}", e))
        })?;

        Ok(ScratchStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Fresh path for an artifact with the given extension.
    pub fn allocate(&self, extension: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", Uuid::new_v4().simple(), extension))
    }

    /// Fresh path that keeps a (pre-sanitized) original filename visible, for uploads.
    pub fn allocate_named(&self, safe_filename: &str) -> PathBuf {
        self.base_path
            .join(format!("{}-{}", Uuid::new_v4().simple(), safe_filename))
    }

    /// Whether `path` points directly into the scratch directory.
    pub fn contains(&self, path: &Path) -> bool {
        path.parent() == Some(self.base_path.as_path())
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !n.starts_with('.') && !n.contains(".."))
    }

    fn check(&self, path: &Path) -> StorageResult<()> {
        if self.contains(path) {
            Ok(())
        } else {
            Err(StorageError::InvalidPath(path.display().to_string()))
        }
    }

    /// Write `data` to `path` and return a guard owning the new file.
    pub async fn write(&self, path: PathBuf, data: &[u8]) -> StorageResult<ScratchFile> {
        self.check(&path)?;
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        // Owned from here on, so a failed write below still cleans up.
        let guard = ScratchFile::new(path);

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to write file {}: {}",
                guard.path().display(),
                e
            ))
        })?;
        file.flush().await?;

        tracing::debug!(
            path = %guard.path().display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Scratch write successful"
        );

        Ok(guard)
    }

    pub async fn read(&self, path: &Path) -> StorageResult<Vec<u8>> {
        self.check(path)?;
        match fs::read(path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(StorageError::ReadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    pub async fn exists(&self, path: &Path) -> bool {
        self.contains(path) && fs::try_exists(path).await.unwrap_or(false)
    }

    /// Open `path` as a byte stream. If `guard` is given it travels with the stream and
    /// the file is deleted once the stream is dropped, however streaming ended.
    pub async fn open_stream(
        &self,
        path: &Path,
        guard: Option<ScratchFile>,
    ) -> StorageResult<(FileStream, u64)> {
        self.check(path)?;
        let file = match fs::File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path.display().to_string()))
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let length = file.metadata().await?.len();
        let stream = GuardedStream::new(tokio_util::io::ReaderStream::new(file), guard);
        Ok((stream, length))
    }

    /// Delete every regular file in the scratch directory. Used at startup, since
    /// nothing registered in a previous process can still be reached.
    pub async fn purge(&self) -> StorageResult<usize> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if delete_file(&entry.path()).await? {
                removed += 1;
            }
        }
        tracing::info!(
            scratch_dir = %self.base_path.display(),
            removed,
            "Purged leftover scratch files"
        );
        Ok(removed)
    }
}

/// Delete a file. Returns `Ok(false)` if it was already gone, so repeated
/// deletes are a no-op rather than an error.
pub async fn delete_file(path: &Path) -> StorageResult<bool> {
    match fs::remove_file(path).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Deleted scratch file");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StorageError::DeleteFailed(format!(
            "Failed to delete file {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Best-effort delete that never blocks the caller and never fails.
///
/// Runs on the tokio runtime when one is available; errors are logged and dropped.
pub fn delete_in_background(path: PathBuf) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(e) = delete_file(&path).await {
                    tracing::warn!(error = %e, path = %path.display(), "Failed to delete scratch file");
                }
            });
        }
        Err(_) => match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Failed to delete scratch file");
            }
        },
    }
}
