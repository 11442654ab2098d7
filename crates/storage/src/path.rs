//! Storage path validation.
//!
//! Artifact paths are computed from database columns (project names, python
//! version tags, filenames), none of which can be trusted to stay inside the
//! store root.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a storage path and resolves it relative to the store root.
///
/// Leading `/` and `.` components are dropped, `..` is resolved as long as it
/// never climbs above the root.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use cheeseshop_storage::validate_path;
/// assert!(validate_path("packages/source/f/foo/foo-1.0.tar.gz").is_ok());
/// assert!(validate_path("/srv/packagedocs/foo/index.html").is_ok());
/// assert!(validate_path("../etc/passwd").is_err());
/// assert!(validate_path("foo\0bar").is_err());
/// assert_eq!(
///     validate_path("packages/./source//f/../f/foo-1.0.zip").unwrap(),
///     Path::new("packages/source/f/foo-1.0.zip")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let mut components = Vec::new();
    for component in original.components() {
        match component {
            Component::Normal(s) => {
                // Null bytes survive Path::components() on Unix but truncate
                // the path in the underlying syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(original.to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(original.to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(original.to_path_buf()));
                }
            },
        }
    }
    if components.is_empty() {
        exn::bail!(ErrorKind::InvalidPath(original.to_path_buf()));
    }
    Ok(components.into_iter().collect())
}
