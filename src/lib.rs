//! flatns - a hierarchical file and folder namespace over a flat object store
//!
//! Keys are `/`-delimited; a trailing slash marks a folder, and folders exist
//! only through the keys that start with them. Clients address items by opaque
//! ids (see [`codec`]), and every operation resolves the container before the
//! item so callers without access learn nothing about its contents.

pub mod access;
pub mod attributes;
pub mod codec;
pub mod config;
pub mod entry;
pub mod error;
pub mod listing;
pub mod namespace;
pub mod store;
pub mod utils;

pub use attributes::ContainerAttributes;
pub use codec::{FolderId, Key, OpaqueId};
pub use config::{LimitsConfig, NamespaceConfig, StoreConfig};
pub use entry::{Entry, FileEntry, FolderEntry, Item};
pub use error::{KeyDecodeError, NamespaceError, StoreError};
pub use namespace::{DeleteReport, Namespace};
pub use store::{LocalObjectStore, MemoryObjectStore, ObjectStore};
