//! Resolver operations
//!
//! The container is always probed before the item. A caller who cannot see a
//! container gets `Forbidden` for everything inside it, whether or not the
//! item exists or its id even decodes.

use log::debug;

use super::results::{Target, Visibility};
use crate::error::handlers::internal;
use crate::error::{NamespaceError, StoreError};
use crate::store::{ObjectInfo, ObjectStore};

/// Probes only the container.
pub async fn probe_container<S: ObjectStore + ?Sized>(
    store: &S,
    container: &str,
) -> Result<Visibility, NamespaceError> {
    match store.bucket_exists(container).await {
        Ok(true) => Ok(Visibility::Visible(None)),
        Ok(false) => Ok(Visibility::NotFound),
        Err(e) => classify(e, container),
    }
}

/// Decides whether `target` inside `container` is visible to the caller.
pub async fn resolve<S: ObjectStore + ?Sized>(
    store: &S,
    container: &str,
    target: Target<'_>,
) -> Result<Visibility, NamespaceError> {
    let container_visibility = probe_container(store, container).await?;
    if !container_visibility.is_visible() {
        debug!("Container '{}' is {:?}", container, container_visibility);
        return Ok(container_visibility);
    }

    match target {
        Target::Container => Ok(Visibility::Visible(None)),
        Target::Invalid => {
            debug!("Undecodable id in container '{}'", container);
            Ok(Visibility::NotFound)
        }
        Target::Folder(key) => match store.list_by_prefix(container, key.as_str(), 1).await {
            Ok(found) => Ok(found
                .into_iter()
                .next()
                .map_or(Visibility::NotFound, |o| Visibility::Visible(Some(o)))),
            Err(e) => classify(e, key.as_str()),
        },
        Target::File(key) => match store.head(container, key.as_str()).await {
            Ok(metadata) => Ok(Visibility::Visible(Some(ObjectInfo {
                key: key.to_string(),
                metadata,
            }))),
            Err(e) => classify(e, key.as_str()),
        },
    }
}

fn classify(err: StoreError, what: &str) -> Result<Visibility, NamespaceError> {
    match err {
        // a key the store cannot hold cannot exist
        StoreError::NotFound(_) | StoreError::KeyTooLong(_) => Ok(Visibility::NotFound),
        StoreError::Forbidden(_) => Ok(Visibility::Forbidden),
        other => Err(internal(&format!("existence check failed for {}", what), other)),
    }
}
