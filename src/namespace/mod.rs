//! Namespace operations
//!
//! The API surface over one object store: folder and file lookups, listings,
//! creation, deletion and content transfer. Every operation resolves the
//! container before the item it names.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::access::{Target, probe_container, resolve};
use crate::codec::Key;
use crate::config::{LimitsConfig, NamespaceConfig};
use crate::error::handlers::translate_store_error;
use crate::error::{KeyDecodeError, NamespaceError};
use crate::store::{LocalObjectStore, ObjectInfo, ObjectStore};

mod mutations;
mod queries;
mod results;

pub use results::DeleteReport;

/// Kind of node an operation requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Folder,
    File,
    Any,
}

impl fmt::Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expect::Folder => write!(f, "folder"),
            Expect::File => write!(f, "file"),
            Expect::Any => write!(f, "item"),
        }
    }
}

pub struct Namespace<S: ObjectStore + ?Sized> {
    store: Arc<S>,
    limits: LimitsConfig,
}

impl<S: ObjectStore + ?Sized> Clone for Namespace<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            limits: self.limits.clone(),
        }
    }
}

impl Namespace<LocalObjectStore> {
    /// Namespace over the local store configured by `config`.
    pub fn open(config: &NamespaceConfig) -> Self {
        let store = LocalObjectStore::new(config.store.store_root_path());
        Self::new(Arc::new(store), config.limits.clone())
    }
}

impl<S: ObjectStore + ?Sized> Namespace<S> {
    pub fn new(store: Arc<S>, limits: LimitsConfig) -> Self {
        Self { store, limits }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Resolves a decoded id and hands back its key once it is visible.
    ///
    /// A kind mismatch is only reported after the container probe passed, so
    /// it never reveals anything about containers the caller cannot see.
    async fn resolve_key(
        &self,
        container: &str,
        decoded: Result<Key, KeyDecodeError>,
        expect: Expect,
    ) -> Result<(Key, Option<ObjectInfo>), NamespaceError> {
        let what = match &decoded {
            Ok(key) if key.is_root() => format!("{}:/", container),
            Ok(key) => format!("{}:{}", container, key),
            Err(e) => {
                debug!("Rejected id in container '{}': {}", container, e);
                format!("{}:<invalid id>", container)
            }
        };

        let target = Target::from_decoded(&decoded);
        let mismatch = matches!(
            (expect, target),
            (Expect::Folder, Target::File(_))
                | (Expect::File, Target::Folder(_))
                | (Expect::File, Target::Container)
        );

        if mismatch {
            probe_container(&*self.store, container)
                .await?
                .into_result(container)?;
            return Err(NamespaceError::BadRequest(format!(
                "{} is not a {}",
                what, expect
            )));
        }

        let found = resolve(&*self.store, container, target)
            .await?
            .into_result(&what)?;
        match decoded {
            Ok(key) => Ok((key, found)),
            Err(_) => Err(NamespaceError::NotFound(what)),
        }
    }

    /// One page of the keys under `folder`.
    async fn scan(
        &self,
        container: &str,
        folder: &Key,
    ) -> Result<Vec<ObjectInfo>, NamespaceError> {
        self.store
            .list_by_prefix(container, folder.as_str(), self.limits.max_list_keys)
            .await
            .map_err(|e| translate_store_error(e, &format!("{}:{}", container, folder)))
    }
}
