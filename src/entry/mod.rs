//! Entry materializer
//!
//! Turns raw keys and object metadata into folder and file records.

pub mod materialize;
pub mod results;

pub use materialize::{
    folder_metadata, materialize, materialize_file, materialize_folder, mime_type_hint, root_folder,
};
pub use results::{Entry, FileEntry, FolderEntry, Item};
