//! Subcommands, one per index query.

use crate::error::{ErrorKind, Result};
use cheeseshop_index::Index;
use clap::Subcommand;
use exn::ResultExt;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List every project
    ListPackages,
    /// Look a project up by any spelling of its name
    Project { name: String },
    /// Where installers may look for a project's files
    HostingMode { name: String },
    /// Bug tracker of a project
    BugtrackUrl { name: String },
    /// Home page and download URL of every release
    ReleaseUrls { name: String },
    /// URLs mentioned in a project's descriptions
    ExternalUrls { name: String },
    /// Project owning a distribution file
    ProjectForFile { filename: String },
    /// MD5 digest of a distribution file
    FileMd5 { filename: String },
    /// Latest journal serial, for one project or the whole index
    LastSerial { name: Option<String> },
    /// Versions of a project, newest first
    Versions { name: String },
    /// Versions of a project, oldest first
    PackageReleases { name: String },
    /// Owners and maintainers of a project
    PackageRoles { name: String },
    /// Detail record of one release
    Release { name: String, version: String },
    /// Detail records of every release, newest first
    Releases { name: String },
    /// Trove classifiers of a release
    Classifiers { name: String, version: String },
    /// Links to every file of a project
    FileUrls { name: String },
    /// Public URL of a project's documentation
    DocumentationUrl { name: String },
    /// Files of a release with their sizes and URLs
    Downloads { name: String, version: String },
    /// Downloads over the last day, week and month
    DownloadCounts { name: String },
}

impl Command {
    /// Run the query against the index and return its result as JSON.
    pub async fn execute(self, index: &Index) -> Result<Value> {
        let repo = index.repository();
        let resolver = index.resolver();
        match self {
            Self::ListPackages => json(repo.all_projects().await),
            Self::Project { name } => json(repo.get_project(&name).await),
            Self::HostingMode { name } => json(repo.get_hosting_mode(&name).await),
            Self::BugtrackUrl { name } => json(repo.get_bugtrack_url(&name).await),
            Self::ReleaseUrls { name } => json(repo.get_release_urls(&name).await),
            Self::ExternalUrls { name } => json(repo.get_external_urls(&name).await),
            Self::ProjectForFile { filename } => json(repo.get_project_for_filename(&filename).await),
            Self::FileMd5 { filename } => json(repo.get_filename_md5(&filename).await),
            Self::LastSerial { name } => json(repo.get_last_serial(name.as_deref()).await),
            Self::Versions { name } => json(repo.get_project_versions(&name).await),
            Self::PackageReleases { name } => json(repo.get_package_releases(&name).await),
            Self::PackageRoles { name } => json(repo.get_package_roles(&name).await),
            Self::Release { name, version } => json(repo.get_release(&name, &version).await),
            Self::Releases { name } => json(repo.get_releases(&name).await),
            Self::Classifiers { name, version } => json(repo.get_classifiers(&name, &version).await),
            Self::FileUrls { name } => json(resolver.get_file_urls(&name).await),
            Self::DocumentationUrl { name } => json(resolver.get_documentation_url(&name).await),
            Self::Downloads { name, version } => json(resolver.get_downloads(&name, &version).await),
            Self::DownloadCounts { name } => json(index.get_download_counts(&name).await),
        }
    }
}

fn json<T: Serialize>(result: cheeseshop_index::error::Result<T>) -> Result<Value> {
    let value = result.or_raise(|| ErrorKind::Index)?;
    serde_json::to_value(value).or_raise(|| ErrorKind::Output)
}
