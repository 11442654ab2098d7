//! Local filesystem storage backend.
//!
//! Probes artifacts in a directory on the local filesystem via `tokio::fs`.

use crate::error::ErrorKind;
use crate::{FileMeta, StorageBackend, error::Result, path::validate as validate_path};
use async_trait::async_trait;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage backend.
///
/// All paths are relative to the configured root directory. Absolute paths
/// handed to the probes (e.g. `/srv/packages/...`) are re-rooted under it,
/// so a backend rooted at `/` resolves them as-is.
///
/// # Examples
///
/// ```no_run
/// use cheeseshop_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("/srv/cheeseshop")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct LocalBackend {
    /// Root directory of the artifact store
    root: PathBuf,
}
impl LocalBackend {
    /// Create a new local filesystem backend.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPath`](ErrorKind::InvalidPath) if the root is not
    /// absolute or is not a directory, and [`NotFound`](ErrorKind::NotFound)
    /// if it does not exist. The store is never created by the index.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if !root.exists() {
            exn::bail!(ErrorKind::NotFound(root));
        }
        if !root.is_dir() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { root })
    }

    /// Validates the path and joins it with the root directory.
    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    fn metadata(path: &Path, metadata: Metadata) -> Result<FileMeta> {
        if !metadata.is_file() {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        Ok(FileMeta::new(path, metadata.len()))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    async fn exists(&self, path: &Path) -> Result<bool> {
        let abs_path = self.absolute_path(path)?;
        let exists = fs::try_exists(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?;
        tracing::trace!(root = %self.root.display(), path = %path.display(), exists, "Probed artifact");
        Ok(exists)
    }

    async fn stat(&self, path: &Path) -> Result<FileMeta> {
        let abs_path = self.absolute_path(path)?;
        let metadata = fs::metadata(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?;
        Self::metadata(path, metadata)
    }
}
