//! Catalog database access.
//!
//! The catalog is owned by whatever publishes releases. Production code only
//! ever [opens](Database::open) an existing catalog read-only; the embedded
//! schema exists so tests (here and in downstream crates) can build a
//! throwaway catalog in memory.

use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Schema of the catalog, applied to in-memory databases only.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
const MAX_READERS: u32 = 8;
// The publisher may hold a write lock while a release is being registered.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection pool over the package catalog.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open an existing catalog for reading.
    ///
    /// The file is never created and its schema is never touched. Connections
    /// are opened read-only with `query_only` set, so any write is refused by
    /// SQLite itself.
    ///
    /// # Errors
    ///
    /// [`MissingCatalog`](ErrorKind::MissingCatalog) if there is no file at
    /// `path`, [`Database`](ErrorKind::Database) if it cannot be opened.
    #[instrument(level = "debug")]
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            exn::bail!(ErrorKind::MissingCatalog(path.to_path_buf()));
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false)
            .read_only(true)
            .busy_timeout(BUSY_TIMEOUT)
            .pragma("query_only", "ON");
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_READERS)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(Self { pool })
    }

    /// Create an empty in-memory catalog with the full schema.
    ///
    /// Not `#[cfg(test)]`: other crates seed it in their own tests.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(":memory:").foreign_keys(true);
        // The database lives exactly as long as its single connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Database)?;
        MIGRATOR.run(&pool).await.or_raise(|| ErrorKind::Migration)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for in-flight queries and close every connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Repository;

    /// A catalog file as the publishing side would leave it: no migration
    /// bookkeeping, only the tables it manages.
    async fn external_catalog(path: &Path) {
        let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.unwrap();
        for statement in [
            "CREATE TABLE packages (name TEXT NOT NULL PRIMARY KEY, normalized_name TEXT NOT NULL UNIQUE)",
            "INSERT INTO packages (name, normalized_name) VALUES ('Foo_Bar', 'foo-bar')",
        ] {
            sqlx::query(statement).execute(&pool).await.unwrap();
        }
        pool.close().await;
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let db = Database::connect_in_memory().await.unwrap();
        assert!(!db.pool().is_closed());
        db.close().await;
        assert!(db.pool().is_closed());
    }

    #[tokio::test]
    async fn test_catalog_tables_exist() {
        let db = Database::connect_in_memory().await.unwrap();
        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' ORDER BY name")
                .fetch_all(db.pool())
                .await
                .unwrap();
        assert_eq!(
            tables,
            vec![
                "description_urls",
                "download_counters",
                "journals",
                "packages",
                "release_classifiers",
                "release_dependencies",
                "release_files",
                "releases",
                "roles",
                "trove_classifiers",
            ]
        );
        db.close().await;
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = Database::connect_in_memory().await.unwrap();
        let orphan = sqlx::query("INSERT INTO releases (name, version) VALUES ('nobody', '1.0')")
            .execute(db.pool())
            .await;
        assert!(orphan.is_err());
        db.close().await;
    }

    #[tokio::test]
    async fn test_open_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.db");
        let err = Database::open(&path).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingCatalog(_)));
        assert!(!path.exists(), "opening must not create the catalog");
    }

    #[tokio::test]
    async fn test_open_existing_catalog_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        external_catalog(&path).await;

        let db = Database::open(&path).await.unwrap();
        let projects = Repository::from(&db).all_projects().await.unwrap();
        assert_eq!(projects.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), vec!["Foo_Bar"]);
        // No schema of our own was applied.
        let tables: Vec<String> = sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(db.pool())
            .await
            .unwrap();
        assert_eq!(tables, vec!["packages"]);
        db.close().await;
    }

    #[tokio::test]
    async fn test_open_refuses_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        external_catalog(&path).await;

        let db = Database::open(&path).await.unwrap();
        let write = sqlx::query("INSERT INTO packages (name, normalized_name) VALUES ('bar', 'bar')")
            .execute(db.pool())
            .await;
        assert!(write.is_err());
        db.close().await;
    }
}
