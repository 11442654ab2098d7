//! Project and release queries.
//!
//! Every query here is read-only. A project, release or file that does not
//! exist is reported as `None` or an empty collection; errors are reserved for
//! the database itself failing or handing back undecodable data.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{
    Dependency, DependencyRow, HostingMode, Project, ProjectRow, ReleaseDetail, ReleaseRow, ReleaseUrlRow, ReleaseUrls,
    Role,
};
use crate::normalize;
use exn::ResultExt;
use sqlx::SqlitePool;
use tracing::instrument;

/// Query engine over the package catalog.
///
/// # Ordering
///
/// "Newest" always means highest ordering key (`_pypi_ordering`), assigned
/// when a release is created. Version strings are never compared: they are
/// not guaranteed to follow any comparable scheme.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Every project in the index, sorted case-insensitively by name.
    #[instrument(level = "debug", skip(self))]
    pub async fn all_projects(&self) -> Result<Vec<Project>> {
        let rows: Vec<ProjectRow> = sqlx::query_as(include_str!("../queries/all_projects.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let mut projects: Vec<Project> = rows.into_iter().map(Project::from).collect();
        // SQLite's lower() only folds ASCII.
        projects.sort_by_cached_key(|p| (p.name.to_lowercase(), p.name.clone()));
        Ok(projects)
    }

    /// Look a project up by any spelling of its name.
    ///
    /// The name is [normalized](crate::normalize) before the lookup; the
    /// returned project carries the name as registered.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_project(&self, name: &str) -> Result<Option<Project>> {
        let row: Option<ProjectRow> = sqlx::query_as(include_str!("../queries/get_project.sql"))
            .bind(normalize(name))
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(Project::from))
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_hosting_mode(&self, name: &str) -> Result<Option<HostingMode>> {
        let mode: Option<String> = sqlx::query_scalar(include_str!("../queries/get_hosting_mode.sql"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        mode.map(|m| m.parse::<HostingMode>()).transpose()
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_bugtrack_url(&self, name: &str) -> Result<Option<String>> {
        let url: Option<Option<String>> = sqlx::query_scalar(include_str!("../queries/get_bugtrack_url.sql"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(url.flatten())
    }

    /// Home page and download URL of every release of a project.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_release_urls(&self, name: &str) -> Result<ReleaseUrls> {
        let rows: Vec<ReleaseUrlRow> = sqlx::query_as(include_str!("../queries/get_release_urls.sql"))
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(|r| (r.version, (r.home_page, r.download_url))).collect())
    }

    /// Distinct URLs mentioned in a project's descriptions, sorted.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_external_urls(&self, name: &str) -> Result<Vec<String>> {
        let urls: Vec<String> = sqlx::query_scalar(include_str!("../queries/get_external_urls.sql"))
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(urls)
    }

    /// The project owning a distribution file.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_project_for_filename(&self, filename: &str) -> Result<Option<Project>> {
        let row: Option<ProjectRow> = sqlx::query_as(include_str!("../queries/get_project_for_filename.sql"))
            .bind(filename)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(Project::from))
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_filename_md5(&self, filename: &str) -> Result<Option<String>> {
        let digest: Option<Option<String>> = sqlx::query_scalar(include_str!("../queries/get_filename_md5.sql"))
            .bind(filename)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(digest.flatten())
    }

    /// Serial of the latest journal entry for a project, or across the whole
    /// index when `name` is `None`.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_last_serial(&self, name: Option<&str>) -> Result<Option<i64>> {
        let serial: Option<i64> = match name {
            Some(name) => {
                sqlx::query_scalar(include_str!("../queries/get_last_serial.sql"))
                    .bind(name)
                    .fetch_one(&self.pool)
                    .await
            },
            None => {
                sqlx::query_scalar(include_str!("../queries/get_last_serial_global.sql"))
                    .fetch_one(&self.pool)
                    .await
            },
        }
        .or_raise(|| ErrorKind::Database)?;
        Ok(serial)
    }

    /// Users holding a role on a project: owners first, then maintainers,
    /// each group sorted case-insensitively by user name.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_package_roles(&self, name: &str) -> Result<Vec<Role>> {
        let roles: Vec<Role> = sqlx::query_as(include_str!("../queries/get_package_roles.sql"))
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(roles)
    }

    // =========================================================================
    // Releases
    // =========================================================================

    /// Versions of a project, newest first.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_project_versions(&self, name: &str) -> Result<Vec<String>> {
        let versions: Vec<String> = sqlx::query_scalar(include_str!("../queries/get_project_versions.sql"))
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(versions)
    }

    /// Versions of a project, oldest first (legacy listing order).
    #[instrument(level = "debug", skip(self))]
    pub async fn get_package_releases(&self, name: &str) -> Result<Vec<String>> {
        let versions: Vec<String> = sqlx::query_scalar(include_str!("../queries/get_package_releases.sql"))
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(versions)
    }

    /// Detail record of one release.
    pub async fn get_release(&self, name: &str, version: &str) -> Result<Option<ReleaseDetail>> {
        Ok(self.assemble_releases(name, Some(version)).await?.into_iter().next())
    }

    /// Detail records of every release of a project, newest first.
    pub async fn get_releases(&self, name: &str) -> Result<Vec<ReleaseDetail>> {
        self.assemble_releases(name, None).await
    }

    /// Trove classifiers of a release, sorted.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_classifiers(&self, name: &str, version: &str) -> Result<Vec<String>> {
        let classifiers: Vec<String> = sqlx::query_scalar(include_str!("../queries/get_classifiers.sql"))
            .bind(name)
            .bind(version)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(classifiers)
    }

    /// Build detail records for a project's releases, newest first,
    /// optionally restricted to a single version.
    #[instrument(level = "debug", skip(self))]
    async fn assemble_releases(&self, name: &str, version: Option<&str>) -> Result<Vec<ReleaseDetail>> {
        let rows: Vec<ReleaseRow> = match version {
            Some(version) => {
                sqlx::query_as(include_str!("../queries/get_release.sql"))
                    .bind(name)
                    .bind(version)
                    .fetch_all(&self.pool)
                    .await
            },
            None => {
                sqlx::query_as(include_str!("../queries/get_releases.sql"))
                    .bind(name)
                    .fetch_all(&self.pool)
                    .await
            },
        }
        .or_raise(|| ErrorKind::Database)?;
        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let dependencies = self.get_dependencies(&row.name, &row.version).await?;
            details.push(ReleaseDetail::assemble(row, dependencies)?);
        }
        Ok(details)
    }

    /// Dependency rows of a release, in declaration order.
    async fn get_dependencies(&self, name: &str, version: &str) -> Result<Vec<Dependency>> {
        let rows: Vec<DependencyRow> = sqlx::query_as(include_str!("../queries/get_release_dependencies.sql"))
            .bind(name)
            .bind(version)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Dependency::from).collect())
    }
}
