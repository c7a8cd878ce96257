//! Container attribute fan-out
//!
//! One store call per attribute, all in flight at once. Each call fills its own
//! field of the composite, so nothing is shared between them.

use std::future::Future;

use log::{debug, info};

use super::results::ContainerAttributes;
use crate::access::{Target, resolve};
use crate::error::handlers::translate_store_error;
use crate::error::{NamespaceError, StoreError};
use crate::store::ObjectStore;

/// Gathers every container-level attribute of `container`.
///
/// Attributes the store reports as not configured take their default. Any
/// other failure of a single lookup fails the whole fetch.
pub async fn fetch_container_attributes<S: ObjectStore + ?Sized>(
    store: &S,
    container: &str,
) -> Result<ContainerAttributes, NamespaceError> {
    resolve(store, container, Target::Container)
        .await?
        .into_result(container)?;

    let (versioning, encryption, object_lock, policy, tags) = tokio::try_join!(
        optional(store.versioning_enabled(container)),
        optional(store.encryption_algorithm(container)),
        optional(store.object_lock_enabled(container)),
        optional(store.access_policy(container)),
        optional(store.tags(container)),
    )
    .map_err(|e| translate_store_error(e, container))?;

    let attributes = ContainerAttributes {
        versioning_enabled: versioning.unwrap_or(false),
        encryption,
        object_lock_enabled: object_lock.unwrap_or(false),
        policy,
        tags: tags.unwrap_or_default(),
    };
    info!(
        "Fetched attributes of '{}' (versioning: {}, object lock: {}, {} tags)",
        container,
        attributes.versioning_enabled,
        attributes.object_lock_enabled,
        attributes.tags.len()
    );
    Ok(attributes)
}

async fn optional<T>(
    lookup: impl Future<Output = Result<T, StoreError>>,
) -> Result<Option<T>, StoreError> {
    match lookup.await {
        Ok(value) => Ok(Some(value)),
        Err(StoreError::AttributeNotConfigured(kind)) => {
            debug!("Attribute {} not configured", kind);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
