//! Mutating namespace operations
//!
//! Creation checks for an existing key and then writes. The two steps are not
//! atomic: concurrent creators of the same name can both succeed and the last
//! write wins.

use bytes::Bytes;
use log::{info, warn};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::{DeleteReport, Expect, Namespace};
use crate::codec::{
    FolderId, Key, MAX_KEY_LENGTH, OpaqueId, decode, encode, validate_display_name,
};
use crate::error::handlers::{handle_error, internal, translate_store_error};
use crate::error::{NamespaceError, StoreError};
use crate::store::ObjectStore;

impl<S: ObjectStore + ?Sized> Namespace<S> {
    /// Creates a file named `name` in `parent`, empty unless `content` is given.
    pub async fn create_file(
        &self,
        container: &str,
        parent: &FolderId,
        name: &str,
        content: Option<Bytes>,
    ) -> Result<OpaqueId, NamespaceError> {
        validate_display_name(name, self.limits.max_display_name_length)?;
        let body = content.unwrap_or_default();
        self.check_upload_size(body.len() as u64)?;

        let (parent_key, _) = self
            .resolve_key(container, parent.decode(), Expect::Folder)
            .await?;
        let child = parent_key.child_file(name);
        check_key_length(&child)?;

        match self.store.head(container, child.as_str()).await {
            Ok(_) => {
                return Err(NamespaceError::Conflict(format!("{}:{}", container, child)));
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(translate_store_error(e, &format!("{}:{}", container, child))),
        }

        let size = body.len();
        self.store
            .put(container, child.as_str(), body)
            .await
            .map_err(|e| translate_store_error(e, &format!("{}:{}", container, child)))?;

        info!("Created file {}:{} ({} bytes)", container, child, size);
        Ok(encode(&child))
    }

    /// Creates a folder named `name` in `parent` by writing its marker object.
    ///
    /// A folder that already exists implicitly, through keys nested below it,
    /// is a conflict too.
    pub async fn create_folder(
        &self,
        container: &str,
        parent: &FolderId,
        name: &str,
    ) -> Result<OpaqueId, NamespaceError> {
        validate_display_name(name, self.limits.max_display_name_length)?;

        let (parent_key, _) = self
            .resolve_key(container, parent.decode(), Expect::Folder)
            .await?;
        let child = parent_key.child_folder(name);
        check_key_length(&child)?;
        let what = format!("{}:{}", container, child);

        let existing = self
            .store
            .list_by_prefix(container, child.as_str(), 1)
            .await
            .map_err(|e| translate_store_error(e, &what))?;
        if !existing.is_empty() {
            return Err(NamespaceError::Conflict(what));
        }

        self.store
            .put(container, child.as_str(), Bytes::new())
            .await
            .map_err(|e| translate_store_error(e, &what))?;

        info!("Created folder {}", what);
        Ok(encode(&child))
    }

    /// Deletes a file, or a folder with everything below it.
    ///
    /// A folder holding anything besides its own marker is only deleted when
    /// `recursive` is set. Keys are deleted one by one; when only some of them
    /// fail the error carries the full report so the call can be retried.
    pub async fn delete_item(
        &self,
        container: &str,
        item: &OpaqueId,
        recursive: bool,
    ) -> Result<DeleteReport, NamespaceError> {
        let (key, _) = self
            .resolve_key(container, decode(item), Expect::Any)
            .await?;
        let what = format!("{}:{}", container, key);

        let (report, last_error) = if key.is_folder() {
            if !recursive {
                let probe = self
                    .store
                    .list_by_prefix(container, key.as_str(), 2)
                    .await
                    .map_err(|e| translate_store_error(e, &what))?;
                if probe.iter().any(|o| o.key != key.as_str()) {
                    return Err(NamespaceError::BadRequest(format!(
                        "Folder not empty: {} (use a recursive delete)",
                        what
                    )));
                }
            }
            self.delete_folder_keys(container, &key).await?
        } else {
            self.delete_keys(container, vec![key.to_string()]).await
        };

        match last_error {
            None if report.deleted.is_empty() => Err(NamespaceError::NotFound(what)),
            None => {
                info!("Deleted {} ({} keys)", what, report.deleted.len());
                Ok(report)
            }
            Some(e) if report.deleted.is_empty() => Err(translate_store_error(e, &what)),
            Some(_) => {
                let err = NamespaceError::PartialDelete(report);
                handle_error(&err);
                Err(err)
            }
        }
    }

    /// Replaces the content of an existing file with everything read from
    /// `reader`.
    pub async fn put_content<R>(
        &self,
        container: &str,
        file: &OpaqueId,
        reader: R,
    ) -> Result<(), NamespaceError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let (key, _) = self
            .resolve_key(container, decode(file), Expect::File)
            .await?;
        let what = format!("{}:{}", container, key);

        let limit = self.limits.max_upload_size_bytes();
        let mut body = Vec::new();
        reader
            .take(limit.saturating_add(1))
            .read_to_end(&mut body)
            .await
            .map_err(|e| internal(&format!("reading upload for {}", what), e))?;
        self.check_upload_size(body.len() as u64)?;

        let size = body.len();
        self.store
            .put(container, key.as_str(), Bytes::from(body))
            .await
            .map_err(|e| translate_store_error(e, &what))?;

        info!("Stored {} bytes into {}", size, what);
        Ok(())
    }

    /// Deletes every key below `folder`, page by page, until the prefix is
    /// empty or a key fails.
    async fn delete_folder_keys(
        &self,
        container: &str,
        folder: &Key,
    ) -> Result<(DeleteReport, Option<StoreError>), NamespaceError> {
        let mut report = DeleteReport::default();
        loop {
            let scanned = self.scan(container, folder).await?;
            if scanned.is_empty() {
                return Ok((report, None));
            }
            let full_page = scanned.len() >= self.limits.max_list_keys;

            let keys = scanned.into_iter().map(|o| o.key).collect();
            let (pass, last_error) = self.delete_keys(container, keys).await;
            report.merge(pass);

            if last_error.is_some() || !full_page {
                return Ok((report, last_error));
            }
        }
    }

    /// Deletes each key independently, carrying on past failures.
    async fn delete_keys(
        &self,
        container: &str,
        keys: Vec<String>,
    ) -> (DeleteReport, Option<StoreError>) {
        let mut report = DeleteReport::default();
        let mut last_error = None;

        for key in keys {
            match self.delete_with_retries(container, &key).await {
                Ok(()) => report.deleted.push(key),
                Err(e) => {
                    warn!("Failed to delete {}:{}: {}", container, key, e);
                    report.failed.push((key, e.to_string()));
                    last_error = Some(e);
                }
            }
        }
        (report, last_error)
    }

    async fn delete_with_retries(&self, container: &str, key: &str) -> Result<(), StoreError> {
        let attempts = self.limits.delete_retries + 1;
        let mut attempt = 1;
        loop {
            match self.store.delete(container, key).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() && attempt < attempts => {
                    warn!(
                        "Delete of {}:{} failed (attempt {}/{}): {}",
                        container, key, attempt, attempts, e
                    );
                    tokio::time::sleep(self.limits.retry_backoff(attempt)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn check_upload_size(&self, size: u64) -> Result<(), NamespaceError> {
        if size > self.limits.max_upload_size_bytes() {
            return Err(NamespaceError::BadRequest(format!(
                "Content exceeds the {} MB upload limit",
                self.limits.max_upload_size_mb
            )));
        }
        Ok(())
    }
}

fn check_key_length(key: &Key) -> Result<(), NamespaceError> {
    if key.as_str().len() > MAX_KEY_LENGTH {
        return Err(NamespaceError::BadRequest(format!(
            "Path longer than {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
