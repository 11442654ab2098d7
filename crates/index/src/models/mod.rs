mod dependency;
mod file;
mod project;
mod release;
mod role;

pub use self::dependency::{Dependency, DependencyKind};
pub(crate) use self::dependency::DependencyRow;
pub use self::file::{Download, FileUrl, ReleaseFile};
pub(crate) use self::file::{FileUrlRow, ReleaseFileRow};
pub use self::project::{HostingMode, Project};
pub(crate) use self::project::ProjectRow;
pub use self::release::{ReleaseDetail, ReleaseUrls};
pub(crate) use self::release::{ReleaseRow, ReleaseUrlRow};
pub use self::role::Role;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use time::OffsetDateTime;

/// Decode a nullable unix timestamp column.
fn timestamp(value: Option<i64>, field: &'static str) -> Result<Option<OffsetDateTime>> {
    value
        .map(|seconds| OffsetDateTime::from_unix_timestamp(seconds).or_raise(|| ErrorKind::InvalidData(field)))
        .transpose()
}
