use crate::error::{Error, ErrorKind};
use crate::normalize;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A named package in the index.
///
/// Identity is the normalized name: two projects are equal when their
/// normalized names match, whatever their display names.
///
/// ```
/// use cheeseshop_index::models::Project;
/// assert_eq!(Project::new("Foo_Bar"), Project::new("foo.bar"));
/// assert_eq!(Project::new("Foo_Bar").name, "Foo_Bar");
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Project {
    /// Display name, as registered.
    pub name: String,
    pub normalized_name: String,
}
impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let normalized_name = normalize(&name);
        Self { name, normalized_name }
    }
}
impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_name == other.normalized_name
    }
}
impl Eq for Project {}
impl Hash for Project {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized_name.hash(state);
    }
}
impl Display for Project {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.name)
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ProjectRow {
    name: String,
    normalized_name: String,
}
impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            name: row.name,
            normalized_name: row.normalized_name,
        }
    }
}

/// Where installers may look for a project's files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum HostingMode {
    /// Only files uploaded to the index.
    #[cfg_attr(feature = "serde", serde(rename = "pypi-explicit"))]
    Explicit,
    /// Uploaded files plus links scraped from the project's description.
    #[cfg_attr(feature = "serde", serde(rename = "pypi-scrape"))]
    Scrape,
    /// As [`Scrape`](Self::Scrape), and installers may also crawl the home
    /// and download pages.
    #[cfg_attr(feature = "serde", serde(rename = "pypi-scrape-crawl"))]
    ScrapeCrawl,
}
impl HostingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explicit => "pypi-explicit",
            Self::Scrape => "pypi-scrape",
            Self::ScrapeCrawl => "pypi-scrape-crawl",
        }
    }
}
impl Display for HostingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
impl FromStr for HostingMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pypi-explicit" => Self::Explicit,
            "pypi-scrape" => Self::Scrape,
            "pypi-scrape-crawl" => Self::ScrapeCrawl,
            _ => exn::bail!(ErrorKind::InvalidData("hosting mode")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn test_equality_follows_normalized_name() {
        assert_eq!(Project::new("Foo_Bar"), Project::new("foo-bar"));
        assert_ne!(Project::new("foo"), Project::new("foo2"));
        let set: HashSet<_> = [Project::new("Foo"), Project::new("foo"), Project::new("FOO")].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[rstest]
    #[case("pypi-explicit", HostingMode::Explicit)]
    #[case("pypi-scrape", HostingMode::Scrape)]
    #[case("pypi-scrape-crawl", HostingMode::ScrapeCrawl)]
    fn test_hosting_mode_round_trip(#[case] stored: &str, #[case] expected: HostingMode) {
        let mode = stored.parse::<HostingMode>().unwrap();
        assert_eq!(mode, expected);
        assert_eq!(mode.to_string(), stored);
    }

    #[test]
    fn test_unknown_hosting_mode() {
        let err = "pypi-magic".parse::<HostingMode>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData("hosting mode")));
    }
}
