//! Container name validation
//!
//! Container names become directory names in the local store, so they are
//! checked before they touch the filesystem.

/// Maximum container name length, as for S3 bucket names
pub const MAX_BUCKET_NAME_LENGTH: usize = 63;

/// Validate that a container name is safe to use as a single path component
pub fn is_valid_bucket_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_BUCKET_NAME_LENGTH {
        return false;
    }
    if name.starts_with('.') || name.contains("..") {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.' || c == '_')
}
