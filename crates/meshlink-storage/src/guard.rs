use crate::scratch::delete_in_background;
use bytes::Bytes;
use futures::Stream;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::io::ReaderStream;

/// Owns a scratch file until ownership is handed off with [`ScratchFile::keep`].
///
/// Dropping an armed guard deletes the file in the background, so every exit path of a
/// request (early return, error, panic, cancelled future) cleans up after itself.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    armed: bool,
}

impl ScratchFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Disarm the guard and return the path. The caller now owns the file.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.armed {
            delete_in_background(std::mem::take(&mut self.path));
        }
    }
}

/// A byte stream that carries an optional [`ScratchFile`]; the file outlives the
/// stream exactly.
pub struct GuardedStream<S> {
    inner: S,
    _guard: Option<ScratchFile>,
}

impl<S> GuardedStream<S> {
    pub fn new(inner: S, guard: Option<ScratchFile>) -> Self {
        Self {
            inner,
            _guard: guard,
        }
    }
}

impl<S> Stream for GuardedStream<S>
where
    S: Stream<Item = std::io::Result<Bytes>> + Unpin,
{
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Stream over a scratch file on disk.
pub type FileStream = GuardedStream<ReaderStream<tokio::fs::File>>;
