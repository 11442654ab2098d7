/// Category of a release dependency row.
///
/// Stored as an integer discriminator. Codes the index does not know about
/// are preserved as [`Other`](Self::Other) rather than rejected, so new
/// categories can be added to the store before the index learns about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Requires,
    Provides,
    Obsoletes,
    RequiresDist,
    ProvidesDist,
    ObsoletesDist,
    RequiresExternal,
    /// A `label,url` pair from the `Project-URL` metadata field.
    ProjectUrl,
    Other(i64),
}
impl DependencyKind {
    pub fn code(&self) -> i64 {
        match self {
            Self::Requires => 1,
            Self::Provides => 2,
            Self::Obsoletes => 3,
            Self::RequiresDist => 4,
            Self::ProvidesDist => 5,
            Self::ObsoletesDist => 6,
            Self::RequiresExternal => 7,
            Self::ProjectUrl => 8,
            Self::Other(code) => *code,
        }
    }
}
impl From<i64> for DependencyKind {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::Requires,
            2 => Self::Provides,
            3 => Self::Obsoletes,
            4 => Self::RequiresDist,
            5 => Self::ProvidesDist,
            6 => Self::ObsoletesDist,
            7 => Self::RequiresExternal,
            8 => Self::ProjectUrl,
            other => Self::Other(other),
        }
    }
}

/// One dependency row of a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub kind: DependencyKind,
    pub specifier: String,
}
impl Dependency {
    pub fn new(kind: DependencyKind, specifier: impl Into<String>) -> Self {
        Self { kind, specifier: specifier.into() }
    }

    /// Split a [`ProjectUrl`](DependencyKind::ProjectUrl) specifier into its
    /// label and URL at the first comma. Both halves are trimmed.
    ///
    /// A specifier without a comma is all label, with an empty URL.
    ///
    /// ```
    /// use cheeseshop_index::models::{Dependency, DependencyKind};
    /// let dep = Dependency::new(DependencyKind::ProjectUrl, "Repository, git://git.example.com/");
    /// assert_eq!(dep.project_url(), ("Repository", "git://git.example.com/"));
    /// ```
    pub fn project_url(&self) -> (&str, &str) {
        match self.specifier.split_once(',') {
            Some((label, url)) => (label.trim(), url.trim()),
            None => (self.specifier.trim(), ""),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct DependencyRow {
    kind: i64,
    specifier: String,
}
impl From<DependencyRow> for Dependency {
    fn from(row: DependencyRow) -> Self {
        Self {
            kind: DependencyKind::from(row.kind),
            specifier: row.specifier,
        }
    }
}
