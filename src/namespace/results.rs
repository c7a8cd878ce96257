//! Namespace operation results

/// Outcome of a delete, key by key
///
/// Deleting an already deleted key counts as success, so a failed delete can be
/// retried until `failed` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    /// Keys that could not be deleted, with the reason
    pub failed: Vec<(String, String)>,
}

impl DeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn merge(&mut self, other: DeleteReport) {
        self.deleted.extend(other.deleted);
        self.failed.extend(other.failed);
    }
}
