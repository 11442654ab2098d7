//! Download counters.
//!
//! Download events are aggregated outside the index into a key-value counter
//! store, sharded by time bucket: one key per project per hour, and one per
//! project per day. This crate turns those buckets back into the three
//! rolling totals an index page shows (last day, week and month).

mod counter;
pub mod error;
mod store;

pub use crate::counter::{DownloadCounter, DownloadCounts, Precision};
pub use crate::store::{CounterStore, MemoryCounters};
use std::sync::Arc;

pub type CounterHandle = Arc<dyn CounterStore + Send + Sync>;
