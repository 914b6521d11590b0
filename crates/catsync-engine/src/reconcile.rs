use catsync_core::config::Config;
use catsync_core::diff::FileDiff;
use catsync_core::error::ReconcileError;
use catsync_core::ops::ComponentChanges;
use catsync_core::source_host::{PushRange, SourceHost};
use tracing::{debug, info};

use crate::{assemble, classify, materialize, moves, transition};

/// Reconcile a pre-fetched diff list into catalog operations.
///
/// Deterministic for a given (diffs, content snapshot, config); the only
/// suspension point is the content-fetch fan-out, and any fetch failure
/// aborts the whole batch.
pub async fn reconcile<H: SourceHost>(
    host: &H,
    diffs: &[FileDiff],
    range: &PushRange,
    config: &Config,
) -> Result<ComponentChanges, ReconcileError> {
    let matcher = config.matcher();
    let policy = &config.policy;

    let buckets = classify::classify_diffs(diffs, &matcher);
    debug!(
        added = buckets.added.len(),
        modified = buckets.modified.len(),
        removed = buckets.removed.len(),
        "classified descriptor diffs"
    );

    let materialized = materialize::materialize(host, &buckets, range).await?;
    let move_outcome = moves::detect_moves(materialized.created, materialized.removed, policy);
    let modified_ops = transition::resolve_modified(materialized.modified, policy);
    let changes = assemble::assemble(move_outcome, modified_ops, policy);

    info!(
        to_create = changes.to_create.len(),
        to_update = changes.to_update.len(),
        to_unlink = changes.to_unlink.len(),
        before = %range.before,
        after = %range.after,
        "reconciliation complete"
    );
    Ok(changes)
}

/// Fetch the push's diff list from the host, then reconcile it.
pub async fn reconcile_push<H: SourceHost>(
    host: &H,
    range: &PushRange,
    config: &Config,
) -> Result<ComponentChanges, ReconcileError> {
    let diffs = host.list_changed_files(&range.before, &range.after).await?;
    reconcile(host, &diffs, range, config).await
}
