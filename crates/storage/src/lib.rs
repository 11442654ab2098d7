//! Artifact store probes.
//!
//! The package index never reads or writes distribution files itself. It only
//! needs to know whether an artifact (a distribution file, its detached
//! signature, a documentation bundle) exists and how large it is. This crate
//! provides that narrow interface and its implementations.

pub mod backend;
pub mod error;
mod models;
mod path;

pub use crate::backend::StorageBackend;
pub use crate::models::FileMeta;
pub use crate::path::validate as validate_path;
use std::sync::Arc;

pub type BackendHandle = Arc<dyn StorageBackend + Send + Sync>;
