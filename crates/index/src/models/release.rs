use super::{Dependency, DependencyKind, timestamp};
use crate::error::Result;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Home page and download URL of every release of a project, by version.
pub type ReleaseUrls = BTreeMap<String, (Option<String>, Option<String>)>;

#[derive(sqlx::FromRow)]
pub(crate) struct ReleaseUrlRow {
    pub(crate) version: String,
    pub(crate) home_page: Option<String>,
    pub(crate) download_url: Option<String>,
}

#[derive(sqlx::FromRow)]
pub(crate) struct ReleaseRow {
    pub(crate) name: String,
    pub(crate) version: String,
    author: Option<String>,
    author_email: Option<String>,
    maintainer: Option<String>,
    maintainer_email: Option<String>,
    home_page: Option<String>,
    license: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    keywords: Option<String>,
    platform: Option<String>,
    download_url: Option<String>,
    created: Option<i64>,
}

/// Everything the index knows about one release, with its dependency rows
/// classified into the fields installers and index pages consume.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReleaseDetail {
    pub name: String,
    pub version: String,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub maintainer: Option<String>,
    pub maintainer_email: Option<String>,
    pub home_page: Option<String>,
    pub license: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub platform: Option<String>,
    pub download_url: Option<String>,
    /// `Requires-Dist` specifiers, in declaration order.
    pub requires_dist: Vec<String>,
    /// `Provides-Dist` specifiers, in declaration order.
    pub provides_dist: Vec<String>,
    /// `Project-URL` links by label; a repeated label keeps its last URL.
    pub project_url: BTreeMap<String, String>,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::timestamp::option"))]
    pub created: Option<OffsetDateTime>,
}
impl ReleaseDetail {
    /// Merge a release row with its dependency rows.
    ///
    /// Dependency kinds other than requires-dist, provides-dist and
    /// project-URL are not part of the detail record and are skipped.
    pub(crate) fn assemble(row: ReleaseRow, dependencies: impl IntoIterator<Item = Dependency>) -> Result<Self> {
        let mut requires_dist = Vec::new();
        let mut provides_dist = Vec::new();
        let mut project_url = BTreeMap::new();
        for dependency in dependencies {
            match dependency.kind {
                DependencyKind::RequiresDist => requires_dist.push(dependency.specifier),
                DependencyKind::ProvidesDist => provides_dist.push(dependency.specifier),
                DependencyKind::ProjectUrl => {
                    let (label, url) = dependency.project_url();
                    if url.is_empty() {
                        tracing::debug!(release = %row.version, specifier = %dependency.specifier, "Project URL has no link");
                    }
                    project_url.insert(label.to_string(), url.to_string());
                },
                kind => {
                    tracing::trace!(release = %row.version, kind = kind.code(), "Skipping dependency kind");
                },
            }
        }
        Ok(Self {
            created: timestamp(row.created, "release creation date")?,
            name: row.name,
            version: row.version,
            author: row.author,
            author_email: row.author_email,
            maintainer: row.maintainer,
            maintainer_email: row.maintainer_email,
            home_page: row.home_page,
            license: row.license,
            summary: row.summary,
            description: row.description,
            keywords: row.keywords,
            platform: row.platform,
            download_url: row.download_url,
            requires_dist,
            provides_dist,
            project_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn row(version: &str, created: Option<i64>) -> ReleaseRow {
        ReleaseRow {
            name: "test-project".to_string(),
            version: version.to_string(),
            author: Some("John Doe".to_string()),
            author_email: None,
            maintainer: None,
            maintainer_email: None,
            home_page: Some("https://example.com/".to_string()),
            license: None,
            summary: Some("A Test Project".to_string()),
            description: None,
            keywords: None,
            platform: None,
            download_url: None,
            created,
        }
    }

    #[test]
    fn test_assemble_partitions_dependencies() {
        let dependencies = [
            Dependency::new(DependencyKind::RequiresDist, "requests (>=2.0)"),
            Dependency::new(DependencyKind::ProvidesDist, "test-project-old"),
            Dependency::new(DependencyKind::RequiresDist, "six"),
            Dependency::new(DependencyKind::ProjectUrl, "Repository,git://git.example.com/"),
            Dependency::new(DependencyKind::Obsoletes, "ancient"),
            Dependency::new(DependencyKind::Other(99), "whatever"),
        ];
        let detail = ReleaseDetail::assemble(row("1.0", None), dependencies).unwrap();
        assert_eq!(detail.requires_dist, vec!["requests (>=2.0)", "six"]);
        assert_eq!(detail.provides_dist, vec!["test-project-old"]);
        assert_eq!(
            detail.project_url,
            BTreeMap::from([("Repository".to_string(), "git://git.example.com/".to_string())])
        );
        assert_eq!(detail.created, None);
        assert_eq!(detail.summary.as_deref(), Some("A Test Project"));
    }

    #[test]
    fn test_assemble_project_url_last_wins() {
        let dependencies = [
            Dependency::new(DependencyKind::ProjectUrl, "Docs,https://old.example.com/"),
            Dependency::new(DependencyKind::ProjectUrl, "Homepage"),
            Dependency::new(DependencyKind::ProjectUrl, "Docs,https://new.example.com/"),
        ];
        let detail = ReleaseDetail::assemble(row("1.0", None), dependencies).unwrap();
        assert_eq!(
            detail.project_url,
            BTreeMap::from([
                ("Docs".to_string(), "https://new.example.com/".to_string()),
                ("Homepage".to_string(), String::new()),
            ])
        );
    }

    #[test]
    fn test_assemble_without_dependencies() {
        let detail = ReleaseDetail::assemble(row("2.0", Some(1_359_504_000)), []).unwrap();
        assert!(detail.requires_dist.is_empty());
        assert!(detail.provides_dist.is_empty());
        assert!(detail.project_url.is_empty());
        assert_eq!(detail.created.unwrap().unix_timestamp(), 1_359_504_000);
    }

    #[test]
    fn test_assemble_rejects_out_of_range_timestamp() {
        let err = ReleaseDetail::assemble(row("1.0", Some(i64::MAX)), []).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData(_)));
    }
}
