//! In-memory object store
//!
//! Keeps containers in a map guarded by a tokio `RwLock`. Besides the
//! [`ObjectStore`] operations it can deny containers or keys to the caller and
//! inject transient failures, which is how permission and partial-failure paths
//! are exercised.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{AttributeKind, ObjectInfo, ObjectMetadata, ObjectStore, STANDARD_STORAGE_CLASS};
use crate::error::StoreError;

#[derive(Default)]
pub struct MemoryObjectStore {
    state: RwLock<MemoryState>,
    owner: Option<String>,
}

#[derive(Default)]
struct MemoryState {
    buckets: HashMap<String, MemoryBucket>,
    denied_buckets: HashSet<String>,
    denied_keys: HashSet<(String, String)>,
    delete_faults: HashMap<(String, String), usize>,
    attribute_faults: HashSet<(String, AttributeKind)>,
}

#[derive(Default)]
struct MemoryBucket {
    objects: BTreeMap<String, StoredObject>,
    attributes: BucketAttributes,
}

struct StoredObject {
    body: Bytes,
    metadata: ObjectMetadata,
}

#[derive(Default)]
struct BucketAttributes {
    versioning: Option<bool>,
    encryption: Option<String>,
    object_lock: Option<bool>,
    policy: Option<String>,
    tags: Option<BTreeMap<String, String>>,
}

impl MemoryState {
    fn bucket(&self, name: &str) -> Result<&MemoryBucket, StoreError> {
        if self.denied_buckets.contains(name) {
            return Err(StoreError::Forbidden(name.to_string()));
        }
        self.buckets
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn bucket_mut(&mut self, name: &str) -> Result<&mut MemoryBucket, StoreError> {
        if self.denied_buckets.contains(name) {
            return Err(StoreError::Forbidden(name.to_string()));
        }
        self.buckets
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn check_key(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        if self
            .denied_keys
            .contains(&(bucket.to_string(), key.to_string()))
        {
            return Err(StoreError::Forbidden(format!("{}/{}", bucket, key)));
        }
        Ok(())
    }

    fn attributes(
        &self,
        bucket: &str,
        kind: AttributeKind,
    ) -> Result<&BucketAttributes, StoreError> {
        let found = self.bucket(bucket)?;
        if self.attribute_faults.contains(&(bucket.to_string(), kind)) {
            return Err(StoreError::Unavailable(format!(
                "{} lookup failed for {}",
                kind, bucket
            )));
        }
        Ok(&found.attributes)
    }
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owner reported in the metadata of every object this store writes.
    pub fn with_owner(owner: impl Into<String>) -> Self {
        Self {
            state: RwLock::default(),
            owner: Some(owner.into()),
        }
    }

    pub async fn create_bucket(&self, bucket: &str) {
        let mut state = self.state.write().await;
        state.buckets.entry(bucket.to_string()).or_default();
    }

    /// Makes every request against `bucket` fail with `Forbidden`.
    pub async fn deny_bucket(&self, bucket: &str) {
        self.state
            .write()
            .await
            .denied_buckets
            .insert(bucket.to_string());
    }

    pub async fn allow_bucket(&self, bucket: &str) {
        self.state.write().await.denied_buckets.remove(bucket);
    }

    /// Makes requests naming `key` exactly fail with `Forbidden`.
    pub async fn deny_key(&self, bucket: &str, key: &str) {
        self.state
            .write()
            .await
            .denied_keys
            .insert((bucket.to_string(), key.to_string()));
    }

    /// The next `times` deletes of `key` fail with `Unavailable`.
    pub async fn fail_deletes(&self, bucket: &str, key: &str, times: usize) {
        self.state
            .write()
            .await
            .delete_faults
            .insert((bucket.to_string(), key.to_string()), times);
    }

    /// Lookups of `kind` on `bucket` fail with `Unavailable` until cleared.
    pub async fn fail_attribute(&self, bucket: &str, kind: AttributeKind) {
        self.state
            .write()
            .await
            .attribute_faults
            .insert((bucket.to_string(), kind));
    }

    pub async fn set_versioning(&self, bucket: &str, enabled: bool) {
        let mut state = self.state.write().await;
        state
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .attributes
            .versioning = Some(enabled);
    }

    pub async fn set_encryption(&self, bucket: &str, algorithm: &str) {
        let mut state = self.state.write().await;
        state
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .attributes
            .encryption = Some(algorithm.to_string());
    }

    pub async fn set_object_lock(&self, bucket: &str, enabled: bool) {
        let mut state = self.state.write().await;
        state
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .attributes
            .object_lock = Some(enabled);
    }

    pub async fn set_policy(&self, bucket: &str, policy: &str) {
        let mut state = self.state.write().await;
        state
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .attributes
            .policy = Some(policy.to_string());
    }

    pub async fn set_tags(&self, bucket: &str, tags: BTreeMap<String, String>) {
        let mut state = self.state.write().await;
        state
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .attributes
            .tags = Some(tags);
    }

    /// Seeds an object with an explicit modification time, bypassing permission
    /// checks.
    pub async fn insert_object(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Bytes>,
        last_modified: OffsetDateTime,
    ) {
        let body = body.into();
        let metadata = ObjectMetadata {
            size: body.len() as u64,
            created_at: last_modified,
            last_modified,
            storage_class: Some(STANDARD_STORAGE_CLASS.to_string()),
            owner: self.owner.clone(),
        };
        let mut state = self.state.write().await;
        state
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .objects
            .insert(key.to_string(), StoredObject { body, metadata });
    }

    /// All keys of `bucket` in order, bypassing permission checks.
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let state = self.state.read().await;
        state
            .buckets
            .get(bucket)
            .map(|b| b.objects.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        let state = self.state.read().await;
        match state.bucket(bucket) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn head(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StoreError> {
        let state = self.state.read().await;
        let found = state.bucket(bucket)?;
        state.check_key(bucket, key)?;
        found
            .objects
            .get(key)
            .map(|o| o.metadata.clone())
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", bucket, key)))
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        let state = self.state.read().await;
        let found = state.bucket(bucket)?;
        state.check_key(bucket, key)?;
        found
            .objects
            .get(key)
            .map(|o| o.body.clone())
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", bucket, key)))
    }

    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.check_key(bucket, key)?;
        let owner = self.owner.clone();
        let found = state.bucket_mut(bucket)?;

        let now = OffsetDateTime::now_utc();
        let created_at = found
            .objects
            .get(key)
            .map(|o| o.metadata.created_at)
            .unwrap_or(now);
        let metadata = ObjectMetadata {
            size: body.len() as u64,
            created_at,
            last_modified: now,
            storage_class: Some(STANDARD_STORAGE_CLASS.to_string()),
            owner,
        };
        found
            .objects
            .insert(key.to_string(), StoredObject { body, metadata });
        debug!("memory store: put {}/{}", bucket, key);
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.bucket(bucket)?;
        state.check_key(bucket, key)?;

        let fault = (bucket.to_string(), key.to_string());
        if let Some(remaining) = state.delete_faults.get_mut(&fault) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(StoreError::Unavailable(format!(
                    "injected delete failure for {}/{}",
                    bucket, key
                )));
            }
        }

        state.bucket_mut(bucket)?.objects.remove(key);
        debug!("memory store: deleted {}/{}", bucket, key);
        Ok(())
    }

    async fn list_by_prefix(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: usize,
    ) -> Result<Vec<ObjectInfo>, StoreError> {
        let state = self.state.read().await;
        let found = state.bucket(bucket)?;
        Ok(found
            .objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .take(max_keys)
            .map(|(key, object)| ObjectInfo {
                key: key.clone(),
                metadata: object.metadata.clone(),
            })
            .collect())
    }

    async fn versioning_enabled(&self, bucket: &str) -> Result<bool, StoreError> {
        let state = self.state.read().await;
        state
            .attributes(bucket, AttributeKind::Versioning)?
            .versioning
            .ok_or(StoreError::AttributeNotConfigured(AttributeKind::Versioning))
    }

    async fn encryption_algorithm(&self, bucket: &str) -> Result<String, StoreError> {
        let state = self.state.read().await;
        state
            .attributes(bucket, AttributeKind::Encryption)?
            .encryption
            .clone()
            .ok_or(StoreError::AttributeNotConfigured(AttributeKind::Encryption))
    }

    async fn object_lock_enabled(&self, bucket: &str) -> Result<bool, StoreError> {
        let state = self.state.read().await;
        state
            .attributes(bucket, AttributeKind::ObjectLock)?
            .object_lock
            .ok_or(StoreError::AttributeNotConfigured(AttributeKind::ObjectLock))
    }

    async fn access_policy(&self, bucket: &str) -> Result<String, StoreError> {
        let state = self.state.read().await;
        state
            .attributes(bucket, AttributeKind::Policy)?
            .policy
            .clone()
            .ok_or(StoreError::AttributeNotConfigured(AttributeKind::Policy))
    }

    async fn tags(&self, bucket: &str) -> Result<BTreeMap<String, String>, StoreError> {
        let state = self.state.read().await;
        state
            .attributes(bucket, AttributeKind::Tags)?
            .tags
            .clone()
            .ok_or(StoreError::AttributeNotConfigured(AttributeKind::Tags))
    }
}
