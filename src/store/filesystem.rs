//! Local filesystem object store
//!
//! Maps each container to a directory under the store root. Objects live flat
//! in `<container>/objects/`, one file per key, named by the unpadded base64url
//! encoding of the key so the on-disk layout never grows real directories.
//! Container attributes are small text files in `<container>/attributes/`.
//!
//! Filesystems cap file names at 255 bytes, so keys whose encoded name would
//! not fit are refused on write with `KeyTooLong` and never found on read.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bytes::Bytes;
use log::{debug, warn};
use time::OffsetDateTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::validation::is_valid_bucket_name;
use super::{AttributeKind, ObjectInfo, ObjectMetadata, ObjectStore};
use crate::error::StoreError;

const OBJECTS_DIR: &str = "objects";
const ATTRIBUTES_DIR: &str = "attributes";
const TEMP_EXTENSION: &str = "tmp";

/// Longest object file name, leaving room for the `.<uuid>.tmp` suffix of a
/// pending write within the usual 255 byte limit
pub const MAX_OBJECT_NAME_LENGTH: usize = 200;

#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the directory layout of a container.
    pub async fn create_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        let bucket_path = self.bucket_path(bucket)?;
        fs::create_dir_all(bucket_path.join(OBJECTS_DIR)).await?;
        fs::create_dir_all(bucket_path.join(ATTRIBUTES_DIR)).await?;
        Ok(())
    }

    /// Stores the raw text of a container attribute.
    ///
    /// Flags are `Enabled`/`Disabled`, tags are `key=value` lines, the other
    /// attributes are kept verbatim.
    pub async fn set_attribute(
        &self,
        bucket: &str,
        kind: AttributeKind,
        value: &str,
    ) -> Result<(), StoreError> {
        let path = self.attribute_path(bucket, kind)?;
        fs::write(path, value).await?;
        Ok(())
    }

    pub async fn clear_attribute(
        &self,
        bucket: &str,
        kind: AttributeKind,
    ) -> Result<(), StoreError> {
        let path = self.attribute_path(bucket, kind)?;
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn bucket_path(&self, bucket: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_bucket_name(bucket) {
            return Err(StoreError::NotFound(format!("invalid container name: {}", bucket)));
        }
        Ok(self.root.join(bucket))
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        let name = object_file_name(key);
        if name.len() > MAX_OBJECT_NAME_LENGTH {
            return Err(StoreError::KeyTooLong(key.to_string()));
        }
        Ok(self.bucket_path(bucket)?.join(OBJECTS_DIR).join(name))
    }

    /// Path of an object about to be read; a key too long to store cannot exist.
    fn existing_object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        self.object_path(bucket, key).map_err(|e| match e {
            StoreError::KeyTooLong(_) => StoreError::NotFound(format!("{}/{}", bucket, key)),
            other => other,
        })
    }

    fn attribute_path(&self, bucket: &str, kind: AttributeKind) -> Result<PathBuf, StoreError> {
        Ok(self.bucket_path(bucket)?.join(ATTRIBUTES_DIR).join(kind.as_str()))
    }

    /// Fails with `NotFound` unless the container directory exists.
    async fn require_bucket(&self, bucket: &str) -> Result<PathBuf, StoreError> {
        let path = self.bucket_path(bucket)?;
        let meta = fs::metadata(&path).await?;
        if !meta.is_dir() {
            return Err(StoreError::NotFound(bucket.to_string()));
        }
        Ok(path)
    }

    async fn read_attribute(
        &self,
        bucket: &str,
        kind: AttributeKind,
    ) -> Result<String, StoreError> {
        self.require_bucket(bucket).await?;
        match fs::read_to_string(self.attribute_path(bucket, kind)?).await {
            Ok(value) => Ok(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::AttributeNotConfigured(kind))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn object_file_name(key: &str) -> String {
    URL_SAFE_NO_PAD.encode(key.as_bytes())
}

/// Recovers a key from an object file name; temp files and strays yield `None`.
fn key_from_file_name(name: &str) -> Option<String> {
    if name.contains('.') {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(name).ok()?;
    String::from_utf8(bytes).ok()
}

fn metadata_from_fs(meta: &std::fs::Metadata) -> ObjectMetadata {
    let last_modified = meta
        .modified()
        .map(OffsetDateTime::from)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH);
    let created_at = meta
        .created()
        .map(OffsetDateTime::from)
        .unwrap_or(last_modified);
    ObjectMetadata {
        size: meta.len(),
        created_at,
        last_modified,
        storage_class: None,
        owner: None,
    }
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("enabled")
}

fn parse_tags(value: &str) -> Result<BTreeMap<String, String>, StoreError> {
    let mut tags = BTreeMap::new();
    for line in value.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (k, v) = line.split_once('=').ok_or_else(|| {
            StoreError::IoError(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("malformed tag line: {}", line),
            ))
        })?;
        tags.insert(k.trim().to_string(), v.trim().to_string());
    }
    Ok(tags)
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        if !is_valid_bucket_name(bucket) {
            return Ok(false);
        }
        match fs::metadata(self.root.join(bucket)).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn head(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StoreError> {
        self.require_bucket(bucket).await?;
        let meta = fs::metadata(self.existing_object_path(bucket, key)?).await?;
        Ok(metadata_from_fs(&meta))
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        self.require_bucket(bucket).await?;
        let data = fs::read(self.existing_object_path(bucket, key)?).await?;
        Ok(Bytes::from(data))
    }

    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), StoreError> {
        self.require_bucket(bucket).await?;
        let file_path = self.object_path(bucket, key)?;
        let temp_path = file_path.with_extension(format!("{}.{}", Uuid::new_v4(), TEMP_EXTENSION));

        let mut file = fs::File::create(&temp_path).await?;
        let written = async {
            file.write_all(&body).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;
        drop(file);

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                warn!(
                    "Failed to remove temp file {}: {}",
                    temp_path.display(),
                    cleanup
                );
            }
            return Err(e.into());
        }

        fs::rename(&temp_path, &file_path).await?;
        debug!("local store: put {}/{} ({} bytes)", bucket, key, body.len());
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.require_bucket(bucket).await?;
        let path = match self.existing_object_path(bucket, key) {
            Ok(path) => path,
            Err(StoreError::NotFound(_)) => return Ok(()),
            Err(e) => return Err(e),
        };
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_by_prefix(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: usize,
    ) -> Result<Vec<ObjectInfo>, StoreError> {
        let bucket_path = self.require_bucket(bucket).await?;
        let mut entries = fs::read_dir(bucket_path.join(OBJECTS_DIR)).await?;

        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(key) = name.to_str().and_then(key_from_file_name) else {
                continue;
            };
            if !key.starts_with(prefix) {
                continue;
            }
            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                // removed between read_dir and stat
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            found.push(ObjectInfo {
                key,
                metadata: metadata_from_fs(&meta),
            });
        }

        found.sort_by(|a, b| a.key.cmp(&b.key));
        found.truncate(max_keys);
        Ok(found)
    }

    async fn versioning_enabled(&self, bucket: &str) -> Result<bool, StoreError> {
        let value = self.read_attribute(bucket, AttributeKind::Versioning).await?;
        Ok(parse_flag(&value))
    }

    async fn encryption_algorithm(&self, bucket: &str) -> Result<String, StoreError> {
        let value = self.read_attribute(bucket, AttributeKind::Encryption).await?;
        Ok(value.trim().to_string())
    }

    async fn object_lock_enabled(&self, bucket: &str) -> Result<bool, StoreError> {
        let value = self.read_attribute(bucket, AttributeKind::ObjectLock).await?;
        Ok(parse_flag(&value))
    }

    async fn access_policy(&self, bucket: &str) -> Result<String, StoreError> {
        self.read_attribute(bucket, AttributeKind::Policy).await
    }

    async fn tags(&self, bucket: &str) -> Result<BTreeMap<String, String>, StoreError> {
        let value = self.read_attribute(bucket, AttributeKind::Tags).await?;
        parse_tags(&value)
    }
}
