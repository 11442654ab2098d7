//! Read model of the package index.
//!
//! This crate answers the catalog questions an index must answer: which
//! projects exist, what releases and files they have, what their metadata and
//! dependencies look like, who maintains them and how often they are
//! downloaded. The catalog itself is owned and populated elsewhere; nothing
//! here writes to it.
//!
//! # Architecture
//! - [`Repository`]: project and release queries, including assembly of
//!   [`ReleaseDetail`](models::ReleaseDetail) records from release and
//!   dependency rows.
//! - [`Resolver`]: download links, artifact store locations and
//!   documentation URLs. Probes the artifact store through a
//!   [`BackendHandle`](cheeseshop_storage::BackendHandle).
//! - [`SqliteCounters`]: download counter buckets kept in the catalog
//!   database, for use with [`cheeseshop_counters::DownloadCounter`].
//! - [`Index`]: all of the above behind one handle.
//!
//! Project names are compared by their [normalized](normalize()) form.

mod counters;
mod db;
pub mod error;
#[cfg(test)]
mod fixtures;
mod index;
pub mod models;
mod normalize;
mod repo;
mod resolve;

pub use crate::counters::SqliteCounters;
pub use crate::db::Database;
pub use crate::index::Index;
pub use crate::normalize::normalize;
pub use crate::repo::Repository;
pub use crate::resolve::{Locations, Resolver};
