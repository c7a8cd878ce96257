//! Key codec
//!
//! Transcodes between raw store keys and the opaque ids exposed to clients,
//! and tells folders from files.

pub mod key;
pub mod opaque;

pub use key::{Key, MAX_KEY_LENGTH, is_folder, validate_display_name};
pub use opaque::{FolderId, OpaqueId, decode, encode};
