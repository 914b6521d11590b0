use catsync_core::descriptor::Descriptor;
use catsync_core::error::ReconcileError;
use catsync_core::source_host::{PushRange, SourceHost};
use futures::future::try_join_all;

use crate::classify::DiffBuckets;

/// Content-backed candidate for a brand-new record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CreateCandidate {
    pub ordinal: usize,
    pub descriptor: Descriptor,
    pub file_path: String,
}

/// Content-backed candidate for a disappeared record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RemoveCandidate {
    pub ordinal: usize,
    pub descriptor: Descriptor,
    pub file_path: String,
}

/// Old/new content pair for a modified descriptor. Not yet an update: the
/// identity transition handler decides what it becomes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ModifiedCandidate {
    pub ordinal: usize,
    pub old: Descriptor,
    pub new: Descriptor,
    pub file_path: String,
    pub previous_file_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Materialized {
    pub created: Vec<CreateCandidate>,
    pub removed: Vec<RemoveCandidate>,
    pub modified: Vec<ModifiedCandidate>,
}

/// Fetch descriptor content for every bucketed diff and assemble typed
/// candidates. Added diffs read the new side at `range.after`, removed
/// diffs the old side at `range.before`, modified diffs both.
///
/// All fetches for the push run concurrently; the first failure aborts the
/// whole step, so partial reconciliation results are never returned.
pub(crate) async fn materialize<H: SourceHost>(
    host: &H,
    buckets: &DiffBuckets,
    range: &PushRange,
) -> Result<Materialized, ReconcileError> {
    let creates = buckets.added.iter().map(|entry| async move {
        let descriptor = host
            .fetch_descriptor(&range.after, &entry.diff.new_path)
            .await?;
        Ok::<_, ReconcileError>(CreateCandidate {
            ordinal: entry.ordinal,
            descriptor,
            file_path: entry.diff.new_path.clone(),
        })
    });

    let removes = buckets.removed.iter().map(|entry| async move {
        let descriptor = host
            .fetch_descriptor(&range.before, &entry.diff.old_path)
            .await?;
        Ok::<_, ReconcileError>(RemoveCandidate {
            ordinal: entry.ordinal,
            descriptor,
            file_path: entry.diff.old_path.clone(),
        })
    });

    let modified = buckets.modified.iter().map(|entry| async move {
        let (old, new) = futures::try_join!(
            host.fetch_descriptor(&range.before, &entry.diff.old_path),
            host.fetch_descriptor(&range.after, &entry.diff.new_path),
        )?;
        Ok::<_, ReconcileError>(ModifiedCandidate {
            ordinal: entry.ordinal,
            old,
            new,
            file_path: entry.diff.new_path.clone(),
            previous_file_path: entry.diff.old_path.clone(),
        })
    });

    let (created, removed, modified) = futures::try_join!(
        try_join_all(creates),
        try_join_all(removes),
        try_join_all(modified),
    )?;

    Ok(Materialized {
        created,
        removed,
        modified,
    })
}
