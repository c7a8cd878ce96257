//! Opaque identifiers
//!
//! Keys are handed to clients as unpadded base64url strings. The transform has
//! no salt so ids stay valid across restarts.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use super::key::Key;
use crate::error::KeyDecodeError;

/// Externally visible identifier of a key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpaqueId(String);

impl OpaqueId {
    /// Wraps an id received from a client. No validation happens until decode.
    pub fn new(raw: impl Into<String>) -> Self {
        OpaqueId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OpaqueId {
    fn from(raw: &str) -> Self {
        OpaqueId::new(raw)
    }
}

impl From<String> for OpaqueId {
    fn from(raw: String) -> Self {
        OpaqueId::new(raw)
    }
}

/// Identifier of a folder: the container root or an encoded folder key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FolderId {
    Root,
    Id(OpaqueId),
}

impl FolderId {
    pub fn decode(&self) -> Result<Key, KeyDecodeError> {
        match self {
            FolderId::Root => Ok(Key::root()),
            FolderId::Id(id) => decode(id),
        }
    }
}

impl From<OpaqueId> for FolderId {
    fn from(id: OpaqueId) -> Self {
        FolderId::Id(id)
    }
}

pub fn encode(key: &Key) -> OpaqueId {
    OpaqueId(URL_SAFE_NO_PAD.encode(key.as_str().as_bytes()))
}

/// Decodes a client-supplied id. Only ids that `encode` could have produced are
/// accepted.
pub fn decode(id: &OpaqueId) -> Result<Key, KeyDecodeError> {
    let raw = id.as_str();
    if raw.is_empty() {
        return Err(KeyDecodeError::Empty);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(raw)
        .map_err(|e| KeyDecodeError::InvalidEncoding(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|_| KeyDecodeError::NotUtf8)?;

    if URL_SAFE_NO_PAD.encode(text.as_bytes()) != raw {
        return Err(KeyDecodeError::NonCanonical);
    }

    Key::parse(text)
}
