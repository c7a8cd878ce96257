//! Child aggregation
//!
//! Folds the keys returned by a prefix scan into the immediate children of the
//! scanned folder.

use std::collections::BTreeMap;

use log::warn;

use crate::codec::{Key, encode};
use crate::entry::Item;
use crate::store::ObjectInfo;

/// Builds one item per immediate child of `folder`.
///
/// Every key nested below a subfolder collapses into that subfolder's item,
/// whose modification time is the latest among them. The folder's own marker
/// is not a child.
pub fn aggregate_children(folder: &Key, scanned: &[ObjectInfo]) -> Vec<Item> {
    let prefix = folder.as_str();
    let mut children: BTreeMap<&str, Item> = BTreeMap::new();

    for object in scanned {
        let Some(suffix) = object.key.strip_prefix(prefix) else {
            warn!(
                "Listing of '{}' returned unrelated key '{}', skipping",
                prefix, object.key
            );
            continue;
        };
        if suffix.is_empty() {
            continue;
        }

        let (child_key, is_folder) = match suffix.find('/') {
            Some(idx) => (&object.key[..prefix.len() + idx + 1], true),
            None => (object.key.as_str(), false),
        };

        if let Some(existing) = children.get_mut(child_key) {
            existing.modified_at = existing.modified_at.max(object.metadata.last_modified);
            continue;
        }

        let key = match Key::parse(child_key) {
            Ok(key) => key,
            Err(e) => {
                warn!("Skipping unaddressable key '{}': {}", child_key, e);
                continue;
            }
        };
        children.insert(
            child_key,
            Item {
                id: encode(&key),
                display_name: key.display_name().to_string(),
                key,
                is_folder,
                size_bytes: (!is_folder).then_some(object.metadata.size),
                modified_at: object.metadata.last_modified,
            },
        );
    }

    children.into_values().collect()
}
