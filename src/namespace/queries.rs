//! Read-only namespace operations

use bytes::Bytes;
use log::{debug, info, warn};

use super::{Expect, Namespace};
use crate::attributes::{ContainerAttributes, fetch_container_attributes};
use crate::codec::{FolderId, Key, OpaqueId, decode};
use crate::entry::{
    Entry, FileEntry, FolderEntry, Item, folder_metadata, materialize, materialize_file,
    materialize_folder, root_folder,
};
use crate::error::NamespaceError;
use crate::error::handlers::translate_store_error;
use crate::listing::aggregate_children;
use crate::store::{ObjectMetadata, ObjectStore};

impl<S: ObjectStore + ?Sized> Namespace<S> {
    pub async fn get_folder(
        &self,
        container: &str,
        folder: &FolderId,
    ) -> Result<FolderEntry, NamespaceError> {
        let (key, _) = self
            .resolve_key(container, folder.decode(), Expect::Folder)
            .await?;
        if key.is_root() {
            return Ok(root_folder(container));
        }

        let metadata = self.scanned_folder_metadata(container, &key).await?;
        Ok(materialize_folder(&key, &metadata))
    }

    /// The folder or file an id names, whichever it turns out to be.
    pub async fn get_entry(
        &self,
        container: &str,
        item: &OpaqueId,
    ) -> Result<Entry, NamespaceError> {
        let (key, found) = self
            .resolve_key(container, decode(item), Expect::Any)
            .await?;
        let metadata = if key.is_folder() {
            self.scanned_folder_metadata(container, &key).await?
        } else {
            found
                .map(|info| info.metadata)
                .ok_or_else(|| NamespaceError::NotFound(format!("{}:{}", container, key)))?
        };

        let entry = materialize(&key, &metadata);
        debug!(
            "Resolved {}:{} as '{}'",
            container,
            entry.key(),
            entry.display_name()
        );
        Ok(entry)
    }

    /// Immediate children of a folder, each exactly once, in no promised order.
    pub async fn list_children(
        &self,
        container: &str,
        folder: &FolderId,
    ) -> Result<Vec<Item>, NamespaceError> {
        let (key, _) = self
            .resolve_key(container, folder.decode(), Expect::Folder)
            .await?;

        let scanned = self.scan(container, &key).await?;
        if scanned.len() >= self.limits.max_list_keys {
            warn!(
                "Listing of {}:{} hit the {} key page limit; children may be missing",
                container, key, self.limits.max_list_keys
            );
        }

        let items = aggregate_children(&key, &scanned);
        info!(
            "Listed {}:/{} - {} children from {} keys",
            container,
            key,
            items.len(),
            scanned.len()
        );
        Ok(items)
    }

    pub async fn get_file(
        &self,
        container: &str,
        file: &OpaqueId,
    ) -> Result<FileEntry, NamespaceError> {
        let (key, found) = self
            .resolve_key(container, decode(file), Expect::File)
            .await?;
        let info =
            found.ok_or_else(|| NamespaceError::NotFound(format!("{}:{}", container, key)))?;
        Ok(materialize_file(&key, &info.metadata))
    }

    /// Whether the folder exists. Only a permission failure is an error.
    pub async fn has_folder(
        &self,
        container: &str,
        folder: &FolderId,
    ) -> Result<bool, NamespaceError> {
        quiet_probe(self.resolve_key(container, folder.decode(), Expect::Folder).await)
    }

    /// Whether the file exists. Only a permission failure is an error.
    pub async fn has_file(&self, container: &str, file: &OpaqueId) -> Result<bool, NamespaceError> {
        quiet_probe(self.resolve_key(container, decode(file), Expect::File).await)
    }

    pub async fn get_content(
        &self,
        container: &str,
        file: &OpaqueId,
    ) -> Result<Bytes, NamespaceError> {
        let (key, _) = self
            .resolve_key(container, decode(file), Expect::File)
            .await?;
        self.store
            .get(container, key.as_str())
            .await
            .map_err(|e| translate_store_error(e, &format!("{}:{}", container, key)))
    }

    pub async fn container_attributes(
        &self,
        container: &str,
    ) -> Result<ContainerAttributes, NamespaceError> {
        fetch_container_attributes(&*self.store, container).await
    }

    /// Metadata of a non-root folder from a scan of its prefix.
    async fn scanned_folder_metadata(
        &self,
        container: &str,
        key: &Key,
    ) -> Result<ObjectMetadata, NamespaceError> {
        let scanned = self.scan(container, key).await?;
        // the last key may have gone since the existence check
        folder_metadata(key, &scanned)
            .ok_or_else(|| NamespaceError::NotFound(format!("{}:{}", container, key)))
    }
}

fn quiet_probe<T>(resolved: Result<T, NamespaceError>) -> Result<bool, NamespaceError> {
    match resolved {
        Ok(_) => Ok(true),
        Err(NamespaceError::NotFound(_)) | Err(NamespaceError::BadRequest(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
