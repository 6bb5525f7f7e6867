//! Flat-list-to-tree grouping for record collections.
//!
//! [`build_forest`] converts an array of JSON records carrying their own
//! identifier and their parent's identifier into a rooted forest: two
//! passes, one indexing records by identifier and one linking each record
//! into its parent's children array. Records whose parent cannot be found
//! become roots; records without a usable identifier are skipped and
//! reported through [`Forest::skipped`] (and a `tracing` warning), never
//! silently dropped or raised as errors.
//!
//! This crate is independent of `trellis-store`: it works on parent
//! pointers, not on encoded paths.

pub mod error;
pub mod forest;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{ForestError, ForestResult};
pub use forest::{
    build_forest, Forest, ForestOptions, SkipReason, SkippedRecord, DEFAULT_CHILDREN_FIELD,
};
