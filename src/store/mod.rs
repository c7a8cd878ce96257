//! Object store collaborator
//!
//! The namespace layer talks to the backend only through [`ObjectStore`]: flat
//! keys, opaque bodies, prefix listing, plus one getter per container
//! attribute. A store handle acts on behalf of one caller, so permission
//! failures surface as [`StoreError::Forbidden`].

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;

use crate::error::StoreError;

pub mod filesystem;
pub mod memory;
pub mod validation;

pub use filesystem::LocalObjectStore;
pub use memory::MemoryObjectStore;

pub const STANDARD_STORAGE_CLASS: &str = "STANDARD";

/// Metadata the store keeps for one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub size: u64,
    pub created_at: OffsetDateTime,
    pub last_modified: OffsetDateTime,
    pub storage_class: Option<String>,
    pub owner: Option<String>,
}

/// One entry of a prefix listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub metadata: ObjectMetadata,
}

/// Optional container-level attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Versioning,
    Encryption,
    ObjectLock,
    Policy,
    Tags,
}

impl AttributeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Versioning => "versioning",
            AttributeKind::Encryption => "encryption",
            AttributeKind::ObjectLock => "object-lock",
            AttributeKind::Policy => "policy",
            AttributeKind::Tags => "tags",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// `Ok(false)` when the container does not exist, `Forbidden` when the
    /// caller may not see it.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError>;

    async fn head(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StoreError>;

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError>;

    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), StoreError>;

    /// Deleting a missing key succeeds.
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError>;

    /// At most `max_keys` objects whose key starts with `prefix`, in key order.
    async fn list_by_prefix(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: usize,
    ) -> Result<Vec<ObjectInfo>, StoreError>;

    async fn versioning_enabled(&self, bucket: &str) -> Result<bool, StoreError>;

    async fn encryption_algorithm(&self, bucket: &str) -> Result<String, StoreError>;

    async fn object_lock_enabled(&self, bucket: &str) -> Result<bool, StoreError>;

    async fn access_policy(&self, bucket: &str) -> Result<String, StoreError>;

    async fn tags(&self, bucket: &str) -> Result<BTreeMap<String, String>, StoreError>;
}
