//! Document-store layout backing the portal.
//!
//! Relational tables stay the source of truth; each hybrid collection
//! extends one SQL table with a document keyed by that table's id.

pub mod collections;
pub mod script;

pub use collections::{
    CollectionKind, CollectionSpec, IndexSpec, METRICS_RETENTION_SECS, TTL_FIELD,
    TimeSeriesOptions, collection, collections,
};
pub use script::{emit_json, emit_mongosh};
