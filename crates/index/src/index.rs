use crate::error::{ErrorKind, Result};
use crate::{Database, Locations, Repository, Resolver};
use cheeseshop_counters::{CounterHandle, DownloadCounter, DownloadCounts};
use cheeseshop_storage::BackendHandle;
use exn::ResultExt;
use time::OffsetDateTime;

/// One handle over the whole read model: catalog queries, file resolution
/// and download counts.
///
/// Cheap to clone; every component shares the same pool and stores.
#[derive(Clone)]
pub struct Index {
    repository: Repository,
    resolver: Resolver,
    counter: DownloadCounter,
}
impl Index {
    pub fn new(db: &Database, backend: BackendHandle, counters: CounterHandle, locations: Locations) -> Self {
        Self {
            repository: Repository::from(db),
            resolver: Resolver::new(db, backend, locations),
            counter: DownloadCounter::new(counters),
        }
    }

    /// Project and release queries.
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// File URLs, downloads and documentation links.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Rolling download totals of a project as of now.
    pub async fn get_download_counts(&self, name: &str) -> Result<DownloadCounts> {
        self.get_download_counts_at(name, OffsetDateTime::now_utc()).await
    }

    pub async fn get_download_counts_at(&self, name: &str, now: OffsetDateTime) -> Result<DownloadCounts> {
        self.counter.counts_at(name, now).await.or_raise(|| ErrorKind::Counters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use cheeseshop_counters::MemoryCounters;
    use cheeseshop_storage::backend::MockBackend;
    use std::sync::Arc;
    use time::macros::datetime;

    #[tokio::test]
    async fn test_components_share_the_catalog() {
        let db = Database::connect_in_memory().await.unwrap();
        fixtures::project(&db, "test-project").await;
        fixtures::release(&db, "test-project", "1.0", Some(1)).await;
        let file = fixtures::File { filename: "test-project-1.0.tar.gz", ..Default::default() };
        fixtures::file(&db, "test-project", "1.0", file).await;
        let backend = Arc::new(MockBackend::with_files([(
            "data/packages/source/t/test-project/test-project-1.0.tar.gz",
            b"0123456789",
        )]));
        let index = Index::new(&db, backend, Arc::new(MemoryCounters::default()), Locations::default());

        let project = index.repository().get_project("Test_Project").await.unwrap().unwrap();
        assert_eq!(project.name, "test-project");
        let versions = index.repository().get_project_versions(&project.name).await.unwrap();
        assert_eq!(versions, vec!["1.0"]);
        let downloads = index.resolver().get_downloads(&project.name, "1.0").await.unwrap();
        assert_eq!(downloads[0].size, 10);
        assert_eq!(downloads[0].pgp_url, None);
    }

    #[tokio::test]
    async fn test_get_download_counts() {
        let db = Database::connect_in_memory().await.unwrap();
        let counters = MemoryCounters::with_values([
            ("downloads:hour:13-01-30-02:foo", "10"),
            ("downloads:daily:13-01-29:foo", "20"),
        ]);
        let index = Index::new(&db, Arc::new(MockBackend::default()), Arc::new(counters), Locations::default());
        let counts = index.get_download_counts_at("foo", datetime!(2013-01-30 12:00 UTC)).await.unwrap();
        assert_eq!(counts, DownloadCounts { last_day: 10, last_week: 20, last_month: 20 });
    }
}
