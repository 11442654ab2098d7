//! Download links, artifact locations and documentation URLs.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{Download, FileUrl, FileUrlRow, ReleaseFile, ReleaseFileRow};
use cheeseshop_storage::BackendHandle;
use exn::ResultExt;
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Where artifacts live in the store, and where documentation is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locations {
    /// Root of the distribution files, laid out as
    /// `{python_version}/{first letter}/{project}/{filename}`.
    pub packages: PathBuf,
    /// Root of the unpacked documentation bundles, one directory per project.
    pub documentation: PathBuf,
    /// Host serving the documentation bundles.
    pub docs_host: String,
}
impl Default for Locations {
    fn default() -> Self {
        Self {
            packages: PathBuf::from("data/packages"),
            documentation: PathBuf::from("data/packagedocs"),
            docs_host: "pythonhosted.org".to_string(),
        }
    }
}

/// Resolves release files to their URLs and artifact store locations.
///
/// Every probe of the artifact store goes through the injected backend; the
/// resolver never touches the filesystem itself.
#[derive(Clone)]
pub struct Resolver {
    pool: SqlitePool,
    backend: BackendHandle,
    locations: Locations,
}
impl Resolver {
    pub fn new(db: &Database, backend: BackendHandle, locations: Locations) -> Self {
        Self { pool: db.pool().clone(), backend, locations }
    }

    /// Links to every file of a project, relative to its simple index page.
    ///
    /// Sorted by filename, descending.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_file_urls(&self, name: &str) -> Result<Vec<FileUrl>> {
        let rows: Vec<FileUrlRow> = sqlx::query_as(include_str!("../queries/get_file_urls.sql"))
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let urls: BTreeSet<FileUrl> = rows
            .into_iter()
            .map(|row| {
                let mut url = format!(
                    "../../packages/{}",
                    artifact_path(&row.python_version, &row.name, &row.filename)
                );
                match row.md5_digest {
                    Some(digest) => {
                        url.push_str("#md5=");
                        url.push_str(&digest);
                    },
                    None => tracing::debug!(filename = %row.filename, "File has no digest"),
                }
                FileUrl::new(row.filename, url)
            })
            .collect();
        Ok(urls.into_iter().rev().collect())
    }

    /// Public URL of a project's documentation, if any has been uploaded.
    ///
    /// A name that is not a single path segment has no documentation.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_documentation_url(&self, name: &str) -> Result<Option<String>> {
        if !is_path_segment(name) {
            tracing::debug!("Not a project directory name");
            return Ok(None);
        }
        let index = self.locations.documentation.join(name).join("index.html");
        let exists = self.backend.exists(&index).await.or_raise(|| ErrorKind::Storage)?;
        Ok(exists.then(|| format!("https://{}/{}/", self.locations.docs_host, name)))
    }

    /// Files of a release with their store location, size and public URLs,
    /// in filename order.
    ///
    /// # Errors
    ///
    /// A file whose artifact is missing from the store fails the whole call
    /// with [`Storage`](ErrorKind::Storage).
    #[instrument(level = "debug", skip(self))]
    pub async fn get_downloads(&self, name: &str, version: &str) -> Result<Vec<Download>> {
        let rows: Vec<ReleaseFileRow> = sqlx::query_as(include_str!("../queries/get_downloads.sql"))
            .bind(name)
            .bind(version)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let mut downloads = Vec::with_capacity(rows.len());
        for row in rows {
            let file = ReleaseFile::try_from(row)?;
            downloads.push(self.download(file).await?);
        }
        Ok(downloads)
    }

    async fn download(&self, file: ReleaseFile) -> Result<Download> {
        let relative = artifact_path(&file.python_version, &file.name, &file.filename);
        let filepath = self.locations.packages.join(&relative);
        let url = format!("/packages/{relative}");
        let size = self.backend.size(&filepath).await.or_raise(|| ErrorKind::Storage)?;
        let signed = self.backend.exists(&signature(&filepath)).await.or_raise(|| ErrorKind::Storage)?;
        tracing::trace!(filepath = %filepath.display(), size, signed, "Resolved download");
        Ok(Download {
            pgp_url: signed.then(|| format!("{url}.asc")),
            file,
            filepath,
            url,
            size,
        })
    }
}

fn is_path_segment(name: &str) -> bool {
    !matches!(name, "" | "." | "..") && !name.contains(['/', '\\', '\0'])
}

/// `{python_version}/{first letter}/{name}/{filename}`
fn artifact_path(python_version: &str, name: &str, filename: &str) -> String {
    format!("{python_version}/{}/{name}/{filename}", first_letter(name))
}

/// First character of a project name, as stored (not normalized).
fn first_letter(name: &str) -> &str {
    name.char_indices().nth(1).map_or(name, |(end, _)| &name[..end])
}

/// Detached signature sitting next to an artifact.
fn signature(path: &Path) -> PathBuf {
    let mut signature = path.as_os_str().to_owned();
    signature.push(".asc");
    PathBuf::from(signature)
}
