use crate::descriptor::Descriptor;
use crate::diff::FileDiff;
use crate::error::FetchError;
use serde::{Deserialize, Serialize};

/// Commit range of one push event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushRange {
    /// Revision before the push ("old side" content is fetched here).
    pub before: String,
    /// Revision after the push ("new side" content is fetched here).
    pub after: String,
}

impl PushRange {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}

/// Read-side collaborator boundary to the source-control host.
///
/// Implementations own network access, YAML parsing, and timeouts; the
/// engine itself never performs I/O. Both methods may be called
/// concurrently for the fan-out of a single reconciliation.
#[allow(async_fn_in_trait)]
pub trait SourceHost: Send + Sync {
    /// Raw diff list for a push's commit range.
    async fn list_changed_files(
        &self,
        from_revision: &str,
        to_revision: &str,
    ) -> Result<Vec<FileDiff>, FetchError>;

    /// Parsed descriptor fields for a file at a given revision.
    async fn fetch_descriptor(
        &self,
        revision: &str,
        path: &str,
    ) -> Result<Descriptor, FetchError>;
}
