use catsync_core::config::ReconciliationPolicy;
use catsync_core::descriptor::Identity;
use catsync_core::ops::{CreateOp, SyncOperation, UnlinkOp, UpdateOp};
use tracing::{debug, warn};

use crate::assemble::PendingOp;
use crate::materialize::ModifiedCandidate;

/// Did the file's stable identity change between the two versions?
///
/// With transition detection off this is the legacy id-only comparison.
/// With it on, a bare id introduction is an ordinary update, and a file
/// that uses `name` as its de-facto identity only transitions when it both
/// moved and was renamed.
fn identity_changed(candidate: &ModifiedCandidate, policy: &ReconciliationPolicy) -> bool {
    let old = &candidate.old;
    let new = &candidate.new;

    if !policy.enable_identity_transition_detection {
        // Legacy id-only comparison. An id disappearing is not a change
        // (the old record keeps its link); a new or different id is.
        return new.id.is_some() && old.id != new.id;
    }
    if old.id != new.id {
        return !(old.id.is_none() && new.id.is_some());
    }
    old.id.is_none()
        && candidate.file_path != candidate.previous_file_path
        && old.name != new.name
}

fn plain_update(candidate: ModifiedCandidate, policy: &ReconciliationPolicy) -> PendingOp {
    let ModifiedCandidate {
        ordinal,
        new,
        file_path,
        previous_file_path,
        ..
    } = candidate;
    let previous_path = if file_path != previous_file_path {
        Some(previous_file_path)
    } else {
        None
    };
    PendingOp {
        ordinal,
        op: SyncOperation::Update(UpdateOp {
            identity: Identity::of(&new, policy),
            descriptor: new,
            path: file_path,
            previous_path,
        }),
    }
}

/// Decide what each modified pair becomes: a plain update when the identity
/// is unchanged, or an unlink of the old identity plus (gated) a create of
/// the new one when the identity scheme changed.
pub(crate) fn resolve_modified(
    candidates: Vec<ModifiedCandidate>,
    policy: &ReconciliationPolicy,
) -> Vec<PendingOp> {
    let mut ops = Vec::new();
    for candidate in candidates {
        if !identity_changed(&candidate, policy) {
            ops.push(plain_update(candidate, policy));
            continue;
        }

        let Some(old_identity) = Identity::of(&candidate.old, policy) else {
            // The superseded version names nothing we could unlink; emit a
            // plain update and let the downstream catalog lookup decide.
            warn!(
                path = %candidate.file_path,
                "identity changed but old version has no resolvable identity"
            );
            ops.push(plain_update(candidate, policy));
            continue;
        };

        debug!(
            path = %candidate.file_path,
            old_identity = ?old_identity,
            "identity transition, splitting update into unlink + create"
        );
        let ordinal = candidate.ordinal;
        ops.push(PendingOp {
            ordinal,
            op: SyncOperation::Unlink(UnlinkOp {
                identity: old_identity,
            }),
        });

        // The flag only gates creates for id-less descriptors; a descriptor
        // that gained a durable id is always eligible.
        if candidate.new.id.is_some() || policy.enable_create_from_descriptor_without_id {
            ops.push(PendingOp {
                ordinal,
                op: SyncOperation::Create(CreateOp {
                    identity: Identity::of(&candidate.new, policy),
                    descriptor: candidate.new,
                    absolute_path: candidate.file_path,
                }),
            });
        }
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use catsync_core::descriptor::Descriptor;

    fn pair(old: Descriptor, new: Descriptor) -> ModifiedCandidate {
        ModifiedCandidate {
            ordinal: 0,
            old,
            new,
            file_path: "svc/compass.yml".to_string(),
            previous_file_path: "svc/compass.yml".to_string(),
        }
    }

    fn moved_pair(old: Descriptor, new: Descriptor) -> ModifiedCandidate {
        ModifiedCandidate {
            ordinal: 0,
            old,
            new,
            file_path: "new/compass.yml".to_string(),
            previous_file_path: "old/compass.yml".to_string(),
        }
    }

    fn transition_policy() -> ReconciliationPolicy {
        ReconciliationPolicy {
            enable_identity_transition_detection: true,
            enable_create_from_descriptor_without_id: true,
            ..ReconciliationPolicy::default()
        }
    }

    #[test]
    fn unchanged_identity_is_a_plain_update() {
        let ops = resolve_modified(
            vec![pair(
                Descriptor::named("svc").with_id("X"),
                Descriptor::named("svc-renamed").with_id("X"),
            )],
            &transition_policy(),
        );
        assert_eq!(ops.len(), 1);
        match &ops[0].op {
            SyncOperation::Update(update) => {
                assert_eq!(update.previous_path, None);
                assert_eq!(update.identity, Some(Identity::Id("X".to_string())));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn moved_file_with_same_identity_keeps_previous_path() {
        let ops = resolve_modified(
            vec![moved_pair(
                Descriptor::named("svc").with_id("X"),
                Descriptor::named("svc").with_id("X"),
            )],
            &transition_policy(),
        );
        match &ops[0].op {
            SyncOperation::Update(update) => {
                assert_eq!(update.path, "new/compass.yml");
                assert_eq!(update.previous_path.as_deref(), Some("old/compass.yml"));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn id_change_splits_into_unlink_and_create() {
        let ops = resolve_modified(
            vec![pair(
                Descriptor::named("svc").with_id("X"),
                Descriptor::named("svc").with_id("Y"),
            )],
            &transition_policy(),
        );
        assert_eq!(ops.len(), 2);
        assert!(matches!(
            &ops[0].op,
            SyncOperation::Unlink(unlink) if unlink.identity == Identity::Id("X".to_string())
        ));
        assert!(matches!(
            &ops[1].op,
            SyncOperation::Create(create) if create.identity == Some(Identity::Id("Y".to_string()))
        ));
    }

    #[test]
    fn id_to_immutable_local_key_transition_unlinks_old_id() {
        let ops = resolve_modified(
            vec![pair(
                Descriptor::named("svc").with_id("X"),
                Descriptor::named("svc").with_immutable_local_key("K"),
            )],
            &transition_policy(),
        );
        assert_eq!(ops.len(), 2);
        assert!(matches!(
            &ops[0].op,
            SyncOperation::Unlink(unlink) if unlink.identity == Identity::Id("X".to_string())
        ));
        assert!(matches!(
            &ops[1].op,
            SyncOperation::Create(create)
                if create.identity == Some(Identity::ImmutableLocalKey("K".to_string()))
        ));
    }

    #[test]
    fn same_transition_with_feature_disabled_is_a_plain_update() {
        // id -> immutableLocalKey swap with transition detection off stays
        // a single update; the legacy comparison ignores the new key field
        // and does not treat the id's disappearance as a change.
        let ops = resolve_modified(
            vec![pair(
                Descriptor::named("svc").with_id("X"),
                Descriptor::named("svc").with_immutable_local_key("K"),
            )],
            &ReconciliationPolicy::default(),
        );
        assert_eq!(ops.len(), 1);
        match &ops[0].op {
            SyncOperation::Update(update) => assert_eq!(update.previous_path, None),
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn legacy_mode_splits_on_any_id_difference() {
        let ops = resolve_modified(
            vec![pair(
                Descriptor::named("svc"),
                Descriptor::named("svc").with_id("X"),
            )],
            &ReconciliationPolicy {
                enable_create_from_descriptor_without_id: true,
                ..ReconciliationPolicy::default()
            },
        );
        // Old side has only a name; unlink is keyed by it.
        assert_eq!(ops.len(), 2);
        assert!(matches!(
            &ops[0].op,
            SyncOperation::Unlink(unlink) if unlink.identity == Identity::Name("svc".to_string())
        ));
    }

    #[test]
    fn bare_id_introduction_is_not_a_transition() {
        let ops = resolve_modified(
            vec![pair(
                Descriptor::named("svc"),
                Descriptor::named("svc").with_id("X"),
            )],
            &transition_policy(),
        );
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0].op, SyncOperation::Update(_)));
    }

    #[test]
    fn name_identity_transitions_only_when_the_file_also_moved() {
        let unmoved = resolve_modified(
            vec![pair(Descriptor::named("old"), Descriptor::named("new"))],
            &transition_policy(),
        );
        assert_eq!(unmoved.len(), 1);
        assert!(matches!(&unmoved[0].op, SyncOperation::Update(_)));

        let moved = resolve_modified(
            vec![moved_pair(Descriptor::named("old"), Descriptor::named("new"))],
            &transition_policy(),
        );
        assert_eq!(moved.len(), 2);
        assert!(matches!(
            &moved[0].op,
            SyncOperation::Unlink(unlink) if unlink.identity == Identity::Name("old".to_string())
        ));
    }

    #[test]
    fn create_without_id_gate_suppresses_the_replacement_create() {
        let policy = ReconciliationPolicy {
            enable_identity_transition_detection: true,
            enable_create_from_descriptor_without_id: false,
            ..ReconciliationPolicy::default()
        };
        let ops = resolve_modified(
            vec![moved_pair(Descriptor::named("old"), Descriptor::named("new"))],
            &policy,
        );
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0].op, SyncOperation::Unlink(_)));
    }

    #[test]
    fn replacement_with_id_is_created_even_with_gate_off() {
        let policy = ReconciliationPolicy {
            enable_identity_transition_detection: true,
            enable_create_from_descriptor_without_id: false,
            ..ReconciliationPolicy::default()
        };
        let ops = resolve_modified(
            vec![pair(
                Descriptor::named("svc").with_id("X"),
                Descriptor::named("svc").with_id("Y"),
            )],
            &policy,
        );
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn unidentifiable_old_side_degrades_to_plain_update() {
        // Identity changed via the moved+renamed name rule, but the old
        // version has no name at all to unlink by.
        let ops = resolve_modified(
            vec![moved_pair(Descriptor::default(), Descriptor::named("new"))],
            &transition_policy(),
        );
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0].op, SyncOperation::Update(_)));
    }
}
