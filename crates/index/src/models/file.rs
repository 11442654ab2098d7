use super::timestamp;
use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use std::path::PathBuf;
use time::OffsetDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct FileUrlRow {
    pub(crate) name: String,
    pub(crate) filename: String,
    pub(crate) python_version: String,
    pub(crate) md5_digest: Option<String>,
}

/// A distribution file and the link installers use to fetch it, relative to
/// a project's simple index page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileUrl {
    pub filename: String,
    pub url: String,
}
impl FileUrl {
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self { filename: filename.into(), url: url.into() }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ReleaseFileRow {
    name: String,
    version: String,
    filename: String,
    python_version: String,
    packagetype: String,
    comment_text: Option<String>,
    md5_digest: Option<String>,
    downloads: i64,
    upload_time: Option<i64>,
}

/// One distributable artifact of a release.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReleaseFile {
    pub name: String,
    pub version: String,
    pub filename: String,
    /// Python version tag, `source` for sdists.
    pub python_version: String,
    pub packagetype: String,
    pub comment_text: Option<String>,
    pub md5_digest: Option<String>,
    /// Legacy per-file download counter.
    pub downloads: u64,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::timestamp::option"))]
    pub upload_time: Option<OffsetDateTime>,
}
impl TryFrom<ReleaseFileRow> for ReleaseFile {
    type Error = Error;
    fn try_from(row: ReleaseFileRow) -> Result<Self> {
        Ok(Self {
            downloads: u64::try_from(row.downloads).or_raise(|| ErrorKind::InvalidData("file downloads"))?,
            upload_time: timestamp(row.upload_time, "file upload time")?,
            name: row.name,
            version: row.version,
            filename: row.filename,
            python_version: row.python_version,
            packagetype: row.packagetype,
            comment_text: row.comment_text,
            md5_digest: row.md5_digest,
        })
    }
}

/// A release file as offered for download, with its storage location and
/// the public URLs of the file and its detached signature.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Download {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub file: ReleaseFile,
    /// Location of the artifact in the store.
    pub filepath: PathBuf,
    pub url: String,
    /// Set only when a `.asc` signature sits next to the artifact.
    pub pgp_url: Option<String>,
    /// Artifact size in bytes.
    pub size: u64,
}
