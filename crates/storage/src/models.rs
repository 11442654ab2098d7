//! Storage models.

use std::path::PathBuf;

/// Artifact metadata returned by storage backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// Relative path from storage root
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}
impl FileMeta {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self { path: path.into(), size }
    }
}
