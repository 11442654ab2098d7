//! Index Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Catalog entities that do not exist are never errors;
//! queries return `None` or an empty collection for them.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// There is no catalog database at the configured path.
    #[display("catalog not found: {}", _0.display())]
    MissingCatalog(#[error(not(source))] PathBuf),
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// The artifact store failed a probe.
    #[display("artifact storage error")]
    Storage,
    /// The download counter store failed a request.
    #[display("download counter error")]
    Counters,
    /// A stored value could not be decoded.
    #[display("invalid index data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}
