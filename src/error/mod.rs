//! Error handling
//!
//! Defines error types and translation helpers for the namespace layer.

pub mod handlers;
pub mod types;

pub use types::*;
