//! Existence and access resolution
//!
//! Maps store responses to visible, not found or forbidden while leaking as
//! little as possible to callers without access.

mod operations;
mod results;

pub use operations::{probe_container, resolve};
pub use results::{Target, Visibility};
