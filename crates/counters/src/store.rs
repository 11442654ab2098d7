//! Counter store interface and an in-memory implementation.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Batch read access to a key-value counter store.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Fetch the raw values of many keys in a single round-trip.
    ///
    /// Implementations must return exactly one entry per requested key, in
    /// the same order, with `None` for keys that hold no value.
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>>;
}

/// In-memory counter store.
///
/// Values are kept as strings, the same way a networked key-value store hands
/// them back, so parsing behaviour can be exercised. Every batch request is
/// recorded and can be inspected with [`calls()`](Self::calls).
///
/// # Examples
///
/// ```
/// use cheeseshop_counters::{CounterStore, MemoryCounters};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryCounters::with_values([("downloads:daily:13-01-30:foo", "12")]);
/// let keys = vec!["downloads:daily:13-01-30:foo".to_string(), "missing".to_string()];
/// assert_eq!(store.mget(&keys).await?, vec![Some("12".to_string()), None]);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MemoryCounters {
    values: RwLock<HashMap<String, String>>,
    calls: RwLock<Vec<Vec<String>>>,
}
impl MemoryCounters {
    pub fn with_values(values: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        let values = values.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self {
            values: RwLock::new(values),
            calls: RwLock::new(Vec::new()),
        }
    }

    /// Set (or overwrite) the raw value of a counter key.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().await.insert(key.into(), value.into());
    }

    /// Keys requested by each [`mget()`](CounterStore::mget) call, in call order.
    pub async fn calls(&self) -> Vec<Vec<String>> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl CounterStore for MemoryCounters {
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        self.calls.write().await.push(keys.to_vec());
        let guard = self.values.read().await;
        Ok(keys.iter().map(|key| guard.get(key).cloned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mget_preserves_key_order() {
        let store = MemoryCounters::with_values([("a", "1"), ("c", "3")]);
        let keys = ["c", "b", "a"].map(String::from);
        let values = store.mget(&keys).await.unwrap();
        assert_eq!(values, vec![Some("3".to_string()), None, Some("1".to_string())]);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryCounters::default();
        store.set("key", "1").await;
        store.set("key", "2").await;
        let values = store.mget(&["key".to_string()]).await.unwrap();
        assert_eq!(values, vec![Some("2".to_string())]);
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let store = MemoryCounters::default();
        store.mget(&["a".to_string()]).await.unwrap();
        store.mget(&["b".to_string(), "c".to_string()]).await.unwrap();
        assert_eq!(store.calls().await, vec![vec!["a".to_string()], vec!["b".to_string(), "c".to_string()]]);
    }
}
