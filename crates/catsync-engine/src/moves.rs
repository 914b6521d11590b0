use catsync_core::config::ReconciliationPolicy;
use catsync_core::descriptor::{Descriptor, Identity};
use catsync_core::ops::{SyncOperation, UpdateOp};
use tracing::debug;

use crate::assemble::PendingOp;
use crate::materialize::{CreateCandidate, RemoveCandidate};

/// Which rule confirmed a move. Priority is fixed: id match, then name
/// match, then identity introduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveRule {
    Id,
    Name,
    IdIntroduced,
}

impl MoveRule {
    fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::IdIntroduced => "id_introduced",
        }
    }
}

/// Result of cross-referencing the added and removed candidates.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MoveOutcome {
    /// One update per confirmed move, carrying the removed side's path as
    /// `previous_path` and ordered at the added side's position.
    pub updates: Vec<PendingOp>,
    /// Added candidates with no matching removal; these stay creates.
    pub created: Vec<CreateCandidate>,
    /// Removed candidates with no matching addition; these stay unlinks.
    pub removed: Vec<RemoveCandidate>,
}

fn match_rule(
    added: &Descriptor,
    removed: &Descriptor,
    policy: &ReconciliationPolicy,
) -> Option<MoveRule> {
    if let (Some(a), Some(r)) = (&added.id, &removed.id)
        && a == r
    {
        return Some(MoveRule::Id);
    }

    let names_equal = matches!((&added.name, &removed.name), (Some(a), Some(r)) if a == r);

    if added.id.is_none()
        && removed.id.is_none()
        && policy.enable_name_based_move_detection
        && names_equal
    {
        return Some(MoveRule::Name);
    }

    // An id being assigned to a previously id-less file while it moved.
    if removed.id.is_none()
        && added.id.is_some()
        && policy.enable_identity_transition_detection
        && names_equal
    {
        return Some(MoveRule::IdIntroduced);
    }

    None
}

/// Discover moves the diff metadata did not mark as renames by matching
/// added candidates against removed candidates.
///
/// At most one match per added candidate; the first matching removed
/// candidate wins, in stable bucket order.
pub(crate) fn detect_moves(
    created: Vec<CreateCandidate>,
    removed: Vec<RemoveCandidate>,
    policy: &ReconciliationPolicy,
) -> MoveOutcome {
    let mut remaining_removed = removed;
    let mut updates = Vec::new();
    let mut unmatched_created = Vec::new();

    for candidate in created {
        let mut hit = None;
        for (index, removal) in remaining_removed.iter().enumerate() {
            if let Some(rule) = match_rule(&candidate.descriptor, &removal.descriptor, policy) {
                hit = Some((index, rule));
                break;
            }
        }

        match hit {
            Some((index, rule)) => {
                let removal = remaining_removed.remove(index);
                debug!(
                    rule = rule.as_str(),
                    path = %candidate.file_path,
                    previous_path = %removal.file_path,
                    "move detected"
                );
                updates.push(PendingOp {
                    ordinal: candidate.ordinal,
                    op: SyncOperation::Update(UpdateOp {
                        identity: Identity::of(&candidate.descriptor, policy),
                        descriptor: candidate.descriptor,
                        path: candidate.file_path,
                        previous_path: Some(removal.file_path),
                    }),
                });
            }
            None => unmatched_created.push(candidate),
        }
    }

    MoveOutcome {
        updates,
        created: unmatched_created,
        removed: remaining_removed,
    }
}
