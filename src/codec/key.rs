//! Namespace keys
//!
//! A key is a `/`-delimited path in the flat keyspace of a container. A trailing
//! slash marks a folder; the empty key is the container root.

use std::fmt;

use crate::error::{KeyDecodeError, NamespaceError};

/// Maximum key length in bytes, matching common object store limits
pub const MAX_KEY_LENGTH: usize = 1024;

pub const SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// The container root. Never produced by [`Key::parse`].
    pub fn root() -> Self {
        Key(String::new())
    }

    /// Parses and validates a raw key.
    pub fn parse(raw: impl Into<String>) -> Result<Self, KeyDecodeError> {
        let raw = raw.into();
        validate_key(&raw)?;
        Ok(Key(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_folder(&self) -> bool {
        is_folder(&self.0)
    }

    /// Last path segment, without the trailing slash of a folder key.
    pub fn display_name(&self) -> &str {
        let body = self.0.strip_suffix(SEPARATOR).unwrap_or(&self.0);
        body.rsplit(SEPARATOR).next().unwrap_or(body)
    }

    /// Key of a file named `name` directly under this folder.
    pub fn child_file(&self, name: &str) -> Key {
        Key(format!("{}{}", self.0, name))
    }

    /// Key of a folder named `name` directly under this folder.
    pub fn child_folder(&self, name: &str) -> Key {
        Key(format!("{}{}{}", self.0, name, SEPARATOR))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A key names a folder iff it ends with the separator.
pub fn is_folder(key: &str) -> bool {
    key.ends_with(SEPARATOR)
}

fn validate_key(raw: &str) -> Result<(), KeyDecodeError> {
    if raw.is_empty() {
        return Err(KeyDecodeError::InvalidKey("empty key".into()));
    }
    if raw.len() > MAX_KEY_LENGTH {
        return Err(KeyDecodeError::InvalidKey(format!(
            "key longer than {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    if raw.starts_with(SEPARATOR) {
        return Err(KeyDecodeError::InvalidKey("leading separator".into()));
    }
    if raw.contains('\0') {
        return Err(KeyDecodeError::InvalidKey("NUL byte".into()));
    }

    let body = raw.strip_suffix(SEPARATOR).unwrap_or(raw);
    for segment in body.split(SEPARATOR) {
        if segment.is_empty() {
            return Err(KeyDecodeError::InvalidKey("empty path segment".into()));
        }
        if segment == "." || segment == ".." {
            return Err(KeyDecodeError::InvalidKey("relative path segment".into()));
        }
    }
    Ok(())
}

/// Checks a display name supplied for a new file or folder.
pub fn validate_display_name(name: &str, max_length: usize) -> Result<(), NamespaceError> {
    if name.is_empty() {
        return Err(NamespaceError::BadRequest("Empty name".into()));
    }
    if name.contains(SEPARATOR) {
        return Err(NamespaceError::BadRequest(format!(
            "Name must not contain '{}': {}",
            SEPARATOR, name
        )));
    }
    if name == "." || name == ".." {
        return Err(NamespaceError::BadRequest(format!("Reserved name: {}", name)));
    }
    if name.contains(['\0', '\r', '\n']) {
        return Err(NamespaceError::BadRequest("Name contains control characters".into()));
    }
    if name.len() > max_length {
        return Err(NamespaceError::BadRequest(format!(
            "Name longer than {} bytes",
            max_length
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_discrimination() {
        for raw in ["a", "a/", "a/b", "a/b/", "docs/readme.md", "x.y/"] {
            let key = Key::parse(raw).unwrap();
            assert_eq!(key.is_folder(), raw.ends_with('/'), "{}", raw);
            assert_eq!(is_folder(raw), raw.ends_with('/'));
        }
    }

    #[test]
    fn test_rejects_malformed_keys() {
        for raw in ["", "/a", "a//b", "a/../b", "./a", "a/.", "a\0b", "a//"] {
            assert!(Key::parse(raw).is_err(), "{:?} should be rejected", raw);
        }
        assert!(Key::parse("a".repeat(MAX_KEY_LENGTH + 1)).is_err());
        assert!(Key::parse("a".repeat(MAX_KEY_LENGTH)).is_ok());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Key::parse("a/b/c.txt").unwrap().display_name(), "c.txt");
        assert_eq!(Key::parse("a/b/").unwrap().display_name(), "b");
        assert_eq!(Key::parse("top/").unwrap().display_name(), "top");
        assert_eq!(Key::parse("file").unwrap().display_name(), "file");
        assert_eq!(Key::root().display_name(), "");
    }

    #[test]
    fn test_children() {
        let docs = Key::parse("docs/").unwrap();
        assert_eq!(docs.child_file("a.txt").as_str(), "docs/a.txt");
        assert_eq!(docs.child_folder("img").as_str(), "docs/img/");
        assert_eq!(Key::root().child_folder("docs"), docs);
    }

    #[test]
    fn test_display_name_validation() {
        assert!(validate_display_name("README.md", 255).is_ok());
        assert!(validate_display_name("a/b", 255).is_err());
        assert!(validate_display_name("", 255).is_err());
        assert!(validate_display_name("..", 255).is_err());
        assert!(validate_display_name("bad\nname", 255).is_err());
        assert!(validate_display_name("long", 3).is_err());
    }
}
