use crate::descriptor::{Descriptor, Identity};
use serde::{Deserialize, Serialize};

/// A brand-new record to create and link to `absolute_path`.
///
/// `identity` is `None` when the descriptor carries no usable identity
/// field; the downstream catalog client then keys the create by path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOp {
    pub identity: Option<Identity>,
    pub descriptor: Descriptor,
    pub absolute_path: String,
}

/// An existing record whose descriptor content changed or whose file moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOp {
    pub identity: Option<Identity>,
    pub descriptor: Descriptor,
    pub path: String,
    /// Present only when the file's location changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_path: Option<String>,
}

/// A record to detach because its descriptor file disappeared or its
/// identity was superseded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlinkOp {
    pub identity: Identity,
}

/// One catalog operation produced by the reconciliation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SyncOperation {
    Create(CreateOp),
    Update(UpdateOp),
    Unlink(UnlinkOp),
}

/// The engine's sole output: the minimal operation set that brings the
/// catalog in line with the push's descriptor files.
///
/// A given descriptor's net effect across one push appears in exactly one
/// of the three sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentChanges {
    pub to_create: Vec<CreateOp>,
    pub to_update: Vec<UpdateOp>,
    pub to_unlink: Vec<UnlinkOp>,
}

impl ComponentChanges {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_unlink.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_unlink.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_changes_report_empty() {
        let changes = ComponentChanges::default();
        assert!(changes.is_empty());
        assert_eq!(changes.len(), 0);
    }

    #[test]
    fn len_counts_all_three_sequences() {
        let changes = ComponentChanges {
            to_create: vec![CreateOp {
                identity: None,
                descriptor: Descriptor::named("svc"),
                absolute_path: "svc/compass.yml".to_string(),
            }],
            to_update: Vec::new(),
            to_unlink: vec![UnlinkOp {
                identity: Identity::Id("abc".to_string()),
            }],
        };
        assert!(!changes.is_empty());
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn sync_operation_serializes_with_op_tag() {
        let op = SyncOperation::Unlink(UnlinkOp {
            identity: Identity::Id("abc".to_string()),
        });
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json.get("op").and_then(|v| v.as_str()), Some("unlink"));
        assert_eq!(
            json.pointer("/identity/id").and_then(|v| v.as_str()),
            Some("abc")
        );
    }

    #[test]
    fn update_omits_absent_previous_path() {
        let op = UpdateOp {
            identity: None,
            descriptor: Descriptor::named("svc"),
            path: "svc/compass.yml".to_string(),
            previous_path: None,
        };
        let json = serde_json::to_value(&op).unwrap();
        assert!(json.get("previous_path").is_none());
    }
}
