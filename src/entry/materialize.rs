//! Entry materialization
//!
//! Pure mapping from raw keys and store metadata to typed entries.

use super::results::{Entry, FileEntry, FolderEntry};
use crate::codec::{FolderId, Key, encode};
use crate::store::{ObjectInfo, ObjectMetadata};

/// Best-effort MIME type from a file name's extension.
pub fn mime_type_hint(display_name: &str) -> String {
    mime_guess::from_path(display_name)
        .first_or_octet_stream()
        .to_string()
}

/// Maps a key and its metadata to a folder or file entry, by the key's form.
pub fn materialize(key: &Key, metadata: &ObjectMetadata) -> Entry {
    if key.is_root() || key.is_folder() {
        Entry::Folder(materialize_folder(key, metadata))
    } else {
        Entry::File(materialize_file(key, metadata))
    }
}

/// Folder branch of [`materialize`]; the size in `metadata` is ignored.
pub fn materialize_folder(key: &Key, metadata: &ObjectMetadata) -> FolderEntry {
    let id = if key.is_root() {
        FolderId::Root
    } else {
        FolderId::Id(encode(key))
    };
    FolderEntry {
        id,
        key: key.clone(),
        display_name: key.display_name().to_string(),
        created_at: Some(metadata.created_at),
        modified_at: Some(metadata.last_modified),
        storage_class: metadata.storage_class.clone(),
        owner_hint: metadata.owner.clone(),
    }
}

/// File branch of [`materialize`].
pub fn materialize_file(key: &Key, metadata: &ObjectMetadata) -> FileEntry {
    let display_name = key.display_name().to_string();
    FileEntry {
        id: encode(key),
        key: key.clone(),
        mime_type_hint: mime_type_hint(&display_name),
        display_name,
        created_at: metadata.created_at,
        modified_at: metadata.last_modified,
        storage_class: metadata.storage_class.clone(),
        owner_hint: metadata.owner.clone(),
        size_bytes: metadata.size,
    }
}

/// Synthetic entry for the container root.
pub fn root_folder(container: &str) -> FolderEntry {
    FolderEntry {
        id: FolderId::Root,
        key: Key::root(),
        display_name: container.to_string(),
        created_at: None,
        modified_at: None,
        storage_class: None,
        owner_hint: None,
    }
}

/// Folder metadata from a prefix scan of the folder.
///
/// The marker object wins when present. Otherwise the folder was created
/// implicitly and takes the earliest creation and latest modification time of
/// its contents.
pub fn folder_metadata(key: &Key, scanned: &[ObjectInfo]) -> Option<ObjectMetadata> {
    if let Some(marker) = scanned.iter().find(|o| o.key == key.as_str()) {
        return Some(ObjectMetadata {
            size: 0,
            ..marker.metadata.clone()
        });
    }

    let first = scanned.first()?;
    let mut summary = ObjectMetadata {
        size: 0,
        ..first.metadata.clone()
    };
    for object in &scanned[1..] {
        summary.created_at = summary.created_at.min(object.metadata.created_at);
        summary.last_modified = summary.last_modified.max(object.metadata.last_modified);
    }
    Some(summary)
}
