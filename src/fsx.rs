//! Filesystem abstraction used by the pipeline.
//!
//! The orchestrator only ever needs a handful of operations, so they are
//! behind a trait: tests inject failing implementations to exercise cleanup
//! paths, and production code uses [`LocalFs`] over `tokio::fs`.

use std::io;
use std::path::Path;

/// Async filesystem operations the pipeline depends on.
#[allow(async_fn_in_trait)]
pub trait FileStore {
    /// Read a file to a string.
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write a string to a file, truncating any existing content.
    async fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Delete a file. Deleting a missing file is not an error.
    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Rename a file.
    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create a directory and all of its parents.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// [`FileStore`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileStore for LocalFs {
    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        tokio::fs::write(path, contents).await
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        match tokio::fs::remove_file(path).await {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        tokio::fs::rename(from, to).await
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }
}
