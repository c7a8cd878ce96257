//! Entry types
//!
//! Materialized views of namespace nodes returned to the API layer.

use time::OffsetDateTime;

use crate::codec::{FolderId, Key, OpaqueId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub id: FolderId,
    pub key: Key,
    pub display_name: String,
    pub created_at: Option<OffsetDateTime>,
    pub modified_at: Option<OffsetDateTime>,
    pub storage_class: Option<String>,
    pub owner_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub id: OpaqueId,
    pub key: Key,
    pub display_name: String,
    pub created_at: OffsetDateTime,
    pub modified_at: OffsetDateTime,
    pub storage_class: Option<String>,
    pub owner_hint: Option<String>,
    pub size_bytes: u64,
    pub mime_type_hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Folder(FolderEntry),
    File(FileEntry),
}

impl Entry {
    pub fn key(&self) -> &Key {
        match self {
            Entry::Folder(folder) => &folder.key,
            Entry::File(file) => &file.key,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Entry::Folder(folder) => &folder.display_name,
            Entry::File(file) => &file.display_name,
        }
    }
}

/// One immediate child of a listed folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: OpaqueId,
    pub key: Key,
    pub display_name: String,
    pub is_folder: bool,
    /// `None` for folders
    pub size_bytes: Option<u64>,
    pub modified_at: OffsetDateTime,
}
