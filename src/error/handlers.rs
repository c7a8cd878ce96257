//! Error handlers
//!
//! Translates store failures into the namespace taxonomy and maps namespace
//! errors to status codes and caller-facing messages.

use std::fmt::Display;

use log::{debug, error, warn};
use uuid::Uuid;

use crate::error::types::{NamespaceError, StoreError};

/// Log a namespace error at a level matching its severity
pub fn handle_error(err: &NamespaceError) {
    match err {
        NamespaceError::NotFound(_) | NamespaceError::Forbidden(_) => debug!("{}", err),
        NamespaceError::Conflict(_) | NamespaceError::BadRequest(_) => debug!("{}", err),
        NamespaceError::PartialDelete(_) => warn!("{}", err),
        NamespaceError::Internal { .. } => error!("{}", err),
    }
}

/// Builds an internal error with a fresh diagnostic id and logs the full context.
pub fn internal(context: &str, cause: impl Display) -> NamespaceError {
    let diagnostic_id = Uuid::new_v4();
    error!("[{}] {}: {}", diagnostic_id, context, cause);
    NamespaceError::Internal {
        diagnostic_id,
        message: context.to_string(),
    }
}

/// Translates a store error raised while acting on `what`.
///
/// Only not-found, permission and key length failures are recognised;
/// everything else is internal and never guessed into a success path.
pub fn translate_store_error(err: StoreError, what: &str) -> NamespaceError {
    match err {
        StoreError::NotFound(_) => NamespaceError::NotFound(what.to_string()),
        StoreError::Forbidden(_) => NamespaceError::Forbidden(what.to_string()),
        StoreError::KeyTooLong(_) => {
            NamespaceError::BadRequest(format!("Path too long for this store: {}", what))
        }
        other => internal(&format!("store request failed for {}", what), other),
    }
}

/// Convert error to a transport status code
pub fn error_to_status_code(err: &NamespaceError) -> u16 {
    match err {
        NamespaceError::BadRequest(_) => 400,
        NamespaceError::Forbidden(_) => 403,
        NamespaceError::NotFound(_) => 404,
        NamespaceError::Conflict(_) => 409,
        NamespaceError::PartialDelete(_) => 207,
        NamespaceError::Internal { .. } => 500,
    }
}

/// Message safe to show the caller.
///
/// Not-found and forbidden answers stay quiet, and internal errors only expose
/// their diagnostic id.
pub fn public_message(err: &NamespaceError) -> String {
    match err {
        NamespaceError::NotFound(_) => "Not found".to_string(),
        NamespaceError::Forbidden(_) => "Forbidden".to_string(),
        NamespaceError::Conflict(_) | NamespaceError::BadRequest(_) => err.to_string(),
        NamespaceError::PartialDelete(report) => format!(
            "Some keys could not be deleted: {}",
            report
                .failed
                .iter()
                .map(|(key, _)| key.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        NamespaceError::Internal { diagnostic_id, .. } => {
            format!("Internal error (diagnostic id {})", diagnostic_id)
        }
    }
}
