//! Container attribute bundle

use std::collections::BTreeMap;

/// Container-level settings; unset attributes keep their default
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerAttributes {
    pub versioning_enabled: bool,
    /// Default encryption algorithm, if any
    pub encryption: Option<String>,
    pub object_lock_enabled: bool,
    /// Access policy document, verbatim
    pub policy: Option<String>,
    pub tags: BTreeMap<String, String>,
}
