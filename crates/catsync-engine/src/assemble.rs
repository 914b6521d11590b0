use catsync_core::config::ReconciliationPolicy;
use catsync_core::descriptor::Identity;
use catsync_core::ops::{ComponentChanges, CreateOp, SyncOperation, UnlinkOp, UpdateOp};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::moves::MoveOutcome;

/// An operation tagged with its originating diff's position, so the final
/// sequences come out in input order. Move-resolved updates carry the added
/// side's ordinal.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingOp {
    pub ordinal: usize,
    pub op: SyncOperation,
}

/// Merge the move detector's and transition handler's outputs into the
/// final operation sets.
///
/// The move detector and the transition handler operate on disjoint inputs,
/// so a create and an unlink sharing one identity is not expected; when it
/// happens anyway the pair is collapsed into a single update.
pub(crate) fn assemble(
    moves: MoveOutcome,
    modified_ops: Vec<PendingOp>,
    policy: &ReconciliationPolicy,
) -> ComponentChanges {
    let mut pending = Vec::new();

    for candidate in moves.created {
        pending.push(PendingOp {
            ordinal: candidate.ordinal,
            op: SyncOperation::Create(CreateOp {
                identity: Identity::of(&candidate.descriptor, policy),
                descriptor: candidate.descriptor,
                absolute_path: candidate.file_path,
            }),
        });
    }

    for candidate in moves.removed {
        match Identity::of(&candidate.descriptor, policy) {
            Some(identity) => pending.push(PendingOp {
                ordinal: candidate.ordinal,
                op: SyncOperation::Unlink(UnlinkOp { identity }),
            }),
            None => warn!(
                path = %candidate.file_path,
                "removed descriptor has no resolvable identity, skipping unlink"
            ),
        }
    }

    pending.extend(moves.updates);
    pending.extend(modified_ops);
    // Stable sort: the unlink-before-create pair a transition emits shares
    // one ordinal and must keep that relative order.
    pending.sort_by_key(|p| p.ordinal);

    split_into_changes(pending, policy)
}

fn split_into_changes(pending: Vec<PendingOp>, policy: &ReconciliationPolicy) -> ComponentChanges {
    let create_identities: HashSet<Identity> = pending
        .iter()
        .filter_map(|p| match &p.op {
            SyncOperation::Create(create) => create.identity.clone(),
            _ => None,
        })
        .collect();
    let unlink_identities: HashSet<Identity> = pending
        .iter()
        .filter_map(|p| match &p.op {
            SyncOperation::Unlink(unlink) => Some(unlink.identity.clone()),
            _ => None,
        })
        .collect();
    // A shared name only counts as the same identity when name-based move
    // detection is on; otherwise it is coincidence and both ops stand.
    let collapse: HashSet<Identity> = create_identities
        .intersection(&unlink_identities)
        .filter(|identity| {
            policy.enable_name_based_move_detection || !matches!(identity, Identity::Name(_))
        })
        .cloned()
        .collect();

    let mut changes = ComponentChanges::default();
    for entry in pending {
        match entry.op {
            SyncOperation::Create(create) => {
                if let Some(identity) = &create.identity
                    && collapse.contains(identity)
                {
                    debug!(
                        identity = ?identity,
                        path = %create.absolute_path,
                        "create/unlink identity collision, collapsing to update"
                    );
                    changes.to_update.push(UpdateOp {
                        identity: create.identity,
                        descriptor: create.descriptor,
                        path: create.absolute_path,
                        previous_path: None,
                    });
                } else {
                    changes.to_create.push(create);
                }
            }
            SyncOperation::Update(update) => changes.to_update.push(update),
            SyncOperation::Unlink(unlink) => {
                if !collapse.contains(&unlink.identity) {
                    changes.to_unlink.push(unlink);
                }
            }
        }
    }
    changes
}
