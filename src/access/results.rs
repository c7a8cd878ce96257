//! Resolver inputs and outcomes

use crate::codec::Key;
use crate::error::{KeyDecodeError, NamespaceError};
use crate::store::ObjectInfo;

/// What the resolver checks after the container probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// The container itself, or its root folder
    Container,
    Folder(&'a Key),
    File(&'a Key),
    /// An id that failed to decode; never found
    Invalid,
}

impl<'a> Target<'a> {
    pub fn from_decoded(decoded: &'a Result<Key, KeyDecodeError>) -> Self {
        match decoded {
            Ok(key) if key.is_root() => Target::Container,
            Ok(key) if key.is_folder() => Target::Folder(key),
            Ok(key) => Target::File(key),
            Err(_) => Target::Invalid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Carries the object found by the item probe, if one was made
    Visible(Option<ObjectInfo>),
    NotFound,
    Forbidden,
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible(_))
    }

    /// Turns the quiet outcomes into errors naming `what`.
    pub fn into_result(self, what: &str) -> Result<Option<ObjectInfo>, NamespaceError> {
        match self {
            Visibility::Visible(found) => Ok(found),
            Visibility::NotFound => Err(NamespaceError::NotFound(what.to_string())),
            Visibility::Forbidden => Err(NamespaceError::Forbidden(what.to_string())),
        }
    }
}
