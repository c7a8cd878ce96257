//! Error types
//!
//! Defines the error types raised by the object store collaborator, the key codec
//! and the namespace operations built on top of them.

use std::fmt;
use std::io;

use uuid::Uuid;

use crate::namespace::DeleteReport;
use crate::store::AttributeKind;

/// Object store errors
#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    Forbidden(String),
    AttributeNotConfigured(AttributeKind),
    /// The backend cannot address a key this long
    KeyTooLong(String),
    Unavailable(String),
    IoError(io::Error),
}

impl StoreError {
    /// Errors worth retrying: the request may succeed once the backend recovers.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::IoError(_))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(what) => write!(f, "Not found: {}", what),
            StoreError::Forbidden(what) => write!(f, "Access denied: {}", what),
            StoreError::AttributeNotConfigured(kind) => {
                write!(f, "Attribute not configured: {}", kind)
            }
            StoreError::KeyTooLong(key) => write!(f, "Key too long for this store: {}", key),
            StoreError::Unavailable(msg) => write!(f, "Backend unavailable: {}", msg),
            StoreError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(error.to_string()),
            io::ErrorKind::PermissionDenied => StoreError::Forbidden(error.to_string()),
            _ => StoreError::IoError(error),
        }
    }
}

/// Key codec errors
///
/// A decode failure is the "invalid identifier" case of the taxonomy. It never
/// leaves the crate: the resolver turns it into a not-found answer once the
/// container probe has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDecodeError {
    Empty,
    InvalidEncoding(String),
    NotUtf8,
    NonCanonical,
    InvalidKey(String),
}

impl fmt::Display for KeyDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDecodeError::Empty => write!(f, "Empty identifier"),
            KeyDecodeError::InvalidEncoding(e) => write!(f, "Invalid identifier encoding: {}", e),
            KeyDecodeError::NotUtf8 => write!(f, "Identifier does not decode to UTF-8"),
            KeyDecodeError::NonCanonical => write!(f, "Identifier is not in canonical form"),
            KeyDecodeError::InvalidKey(reason) => write!(f, "Invalid key: {}", reason),
        }
    }
}

impl std::error::Error for KeyDecodeError {}

/// Namespace operation errors, as seen by the API layer
#[derive(Debug)]
pub enum NamespaceError {
    NotFound(String),
    Forbidden(String),
    Conflict(String),
    BadRequest(String),
    PartialDelete(DeleteReport),
    Internal { diagnostic_id: Uuid, message: String },
}

impl NamespaceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NamespaceError::NotFound(_))
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, NamespaceError::Forbidden(_))
    }
}

impl fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceError::NotFound(what) => write!(f, "Not found: {}", what),
            NamespaceError::Forbidden(what) => write!(f, "Forbidden: {}", what),
            NamespaceError::Conflict(what) => write!(f, "Already exists: {}", what),
            NamespaceError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            NamespaceError::PartialDelete(report) => write!(
                f,
                "Partial delete: {} keys deleted, {} keys failed",
                report.deleted.len(),
                report.failed.len()
            ),
            NamespaceError::Internal {
                diagnostic_id,
                message,
            } => write!(f, "Internal error [{}]: {}", diagnostic_id, message),
        }
    }
}

impl std::error::Error for NamespaceError {}
