//! Download counters kept in the index database.

use crate::Database;
use async_trait::async_trait;
use cheeseshop_counters::CounterStore;
use cheeseshop_counters::error::{ErrorKind, Result};
use exn::ResultExt;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;

/// [`CounterStore`] backed by the `download_counters` table.
///
/// For deployments without a separate key-value store. Keys and values follow
/// the same format as any other counter store.
#[derive(Debug, Clone)]
pub struct SqliteCounters {
    pool: SqlitePool,
}
impl From<&Database> for SqliteCounters {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}

#[async_trait]
impl CounterStore for SqliteCounters {
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT key, value FROM download_counters WHERE key IN (");
        let mut separated = builder.separated(", ");
        for key in keys {
            separated.push_bind(key.as_str());
        }
        separated.push_unseparated(")");
        let rows: Vec<(String, String)> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Store("sqlite".to_string()))?;
        let values: HashMap<String, String> = rows.into_iter().collect();
        Ok(keys.iter().map(|key| values.get(key).cloned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cheeseshop_counters::DownloadCounter;
    use std::sync::Arc;
    use time::macros::datetime;

    async fn seed(db: &Database, values: &[(&str, &str)]) {
        for (key, value) in values {
            sqlx::query("INSERT INTO download_counters (key, value) VALUES (?, ?)")
                .bind(key)
                .bind(value)
                .execute(db.pool())
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_mget_in_key_order() {
        let db = Database::connect_in_memory().await.unwrap();
        seed(&db, &[("a", "1"), ("c", "3")]).await;
        let store = SqliteCounters::from(&db);
        let keys = ["c", "b", "a", "c"].map(String::from);
        assert_eq!(
            store.mget(&keys).await.unwrap(),
            vec![Some("3".to_string()), None, Some("1".to_string()), Some("3".to_string())]
        );
    }

    #[tokio::test]
    async fn test_mget_no_keys() {
        let db = Database::connect_in_memory().await.unwrap();
        let store = SqliteCounters::from(&db);
        assert!(store.mget(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_counts_from_database() {
        let db = Database::connect_in_memory().await.unwrap();
        seed(
            &db,
            &[
                ("downloads:hour:13-01-29-12:foo", "5"),
                ("downloads:hour:13-01-30-11:foo", "7"),
                ("downloads:daily:13-01-25:foo", "100"),
                ("downloads:daily:13-01-05:foo", "1000"),
                ("downloads:daily:12-12-01:foo", "99999"),
                ("downloads:daily:13-01-25:bar", "not-a-number"),
            ],
        )
        .await;
        let counter = DownloadCounter::new(Arc::new(SqliteCounters::from(&db)));
        let counts = counter.counts_at("foo", datetime!(2013-01-30 12:00 UTC)).await.unwrap();
        assert_eq!(counts.last_day, 12);
        assert_eq!(counts.last_week, 100);
        assert_eq!(counts.last_month, 1100);
    }
}
