//! Counter Error Types

use derive_more::{Display, Error};

/// A counter error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for counter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The counter store could not be reached or failed the request.
    #[display("counter store error: {_0}")]
    Store(#[error(not(source))] String),
    /// A bucket key could not be built for the requested time.
    #[display("invalid counter key")]
    InvalidKey,
}
