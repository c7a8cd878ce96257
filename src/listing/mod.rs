//! Folder listing
//!
//! Aggregates prefix scans into immediate children.

mod operations;

pub use operations::aggregate_children;
