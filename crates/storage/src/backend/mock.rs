//! In-memory storage backend for testing.

use crate::error::{ErrorKind, Result};
use crate::models::FileMeta;
use crate::path::validate as validate_path;
use crate::StorageBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// In-memory storage backend for testing.
///
/// Artifacts are held in a `HashMap` behind a [`RwLock`]. Every
/// [`exists()`](StorageBackend::exists) call is recorded so tests can assert
/// exactly which paths were checked.
///
/// # Examples
///
/// ```
/// use cheeseshop_storage::backend::{MockBackend, StorageBackend};
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::with_files([
///     ("packages/source/f/foo/foo-1.0.tar.gz", b"0123456789"),
/// ]);
/// assert!(backend.exists(Path::new("packages/source/f/foo/foo-1.0.tar.gz")).await?);
/// assert_eq!(backend.size(Path::new("packages/source/f/foo/foo-1.0.tar.gz")).await?, 10);
/// assert_eq!(backend.existence_checks().await.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    storage: RwLock<HashMap<PathBuf, Vec<u8>>>,
    existence_checks: RwLock<Vec<PathBuf>>,
}

impl MockBackend {
    /// Create a mock backend pre-populated with artifacts.
    ///
    /// Panics if any path fails validation. If test setup is wrong, then test
    /// should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = HashMap::new();
        for (path, data) in files {
            let path = path.into();
            let Ok(validated) = validate_path(&path) else {
                panic!("MockBackend::with_files: invalid path {}", path.display());
            };
            map.insert(validated, data.into());
        }
        Self {
            storage: RwLock::new(map),
            existence_checks: RwLock::new(Vec::new()),
        }
    }

    /// Paths passed to [`exists()`](StorageBackend::exists), in call order
    /// and as given (before validation).
    pub async fn existence_checks(&self) -> Vec<PathBuf> {
        self.existence_checks.read().await.clone()
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let files: [(&str, &str); 0] = [];
        Self::with_files(files)
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    async fn exists(&self, path: &Path) -> Result<bool> {
        self.existence_checks.write().await.push(path.to_path_buf());
        let path = validate_path(path)?;
        Ok(self.storage.read().await.contains_key(&path))
    }

    async fn stat(&self, path: &Path) -> Result<FileMeta> {
        let path = validate_path(path)?;
        let guard = self.storage.read().await;
        let data = guard.get(&path).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path.clone())))?;
        Ok(FileMeta::new(path.clone(), data.len() as u64))
    }
}
