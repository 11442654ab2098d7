//! Storage backend trait and implementations.
//!
//! The index only ever *probes* the artifact store: does a file exist, and how
//! big is it. Publishing and serving artifacts is somebody else's job.

mod local;
#[cfg(feature = "mock")]
mod mock;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
use crate::error::Result;
use crate::models::FileMeta;
use async_trait::async_trait;
use std::path::Path;

/// Read-only interface over an artifact store.
///
/// # Path Handling
/// All paths are relative to the storage root and must be validated using
/// [`validate_path`](crate::validate_path) before use. Implementations should
/// enforce this validation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use cheeseshop_storage::{backend::StorageBackend, error::Result};
///
/// async fn signature_size(backend: &dyn StorageBackend) -> Result<Option<u64>> {
///     let path = Path::new("packages/source/f/foo/foo-1.0.tar.gz.asc");
///     if backend.exists(path).await? {
///         Ok(Some(backend.size(path).await?))
///     } else {
///         Ok(None)
///     }
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Check if an artifact exists.
    ///
    /// A missing artifact is `Ok(false)`, never an error.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Get artifact metadata without reading contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the artifact
    /// does not exist.
    async fn stat(&self, path: &Path) -> Result<FileMeta>;

    /// Size of an artifact in bytes.
    ///
    /// Default implementation delegates to [`stat()`](Self::stat).
    async fn size(&self, path: &Path) -> Result<u64> {
        Ok(self.stat(path).await?.size)
    }
}
