use crate::config::ReconciliationPolicy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parsed fields of a component descriptor file.
///
/// The three identity fields are lifted out; everything else the file
/// declares is preserved untouched in `fields` for the downstream catalog
/// client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        rename = "immutableLocalKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub immutable_local_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Descriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_immutable_local_key(mut self, key: impl Into<String>) -> Self {
        self.immutable_local_key = Some(key.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

/// The field a descriptor uses to name "which real component this is".
///
/// Exactly one variant applies per descriptor: `id` dominates when present,
/// then `immutable_local_key` (only while identity transition detection is
/// enabled), then `name` as the fallback. Two different keys are never
/// merged into a composite identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    Id(String),
    ImmutableLocalKey(String),
    Name(String),
}

impl Identity {
    /// Resolve the effective identity of a descriptor under the given policy.
    ///
    /// Returns `None` when the descriptor carries no usable identity field;
    /// callers decide whether that is a drop (unlinks) or a deferred lookup
    /// (updates).
    pub fn of(descriptor: &Descriptor, policy: &ReconciliationPolicy) -> Option<Self> {
        if let Some(id) = &descriptor.id {
            return Some(Self::Id(id.clone()));
        }
        if policy.enable_identity_transition_detection
            && let Some(key) = &descriptor.immutable_local_key
        {
            return Some(Self::ImmutableLocalKey(key.clone()));
        }
        descriptor.name.as_ref().map(|name| Self::Name(name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition_policy() -> ReconciliationPolicy {
        ReconciliationPolicy {
            enable_identity_transition_detection: true,
            ..ReconciliationPolicy::default()
        }
    }

    #[test]
    fn identity_prefers_id_over_everything() {
        let descriptor = Descriptor::named("svc")
            .with_id("abc-123")
            .with_immutable_local_key("key-1");
        assert_eq!(
            Identity::of(&descriptor, &transition_policy()),
            Some(Identity::Id("abc-123".to_string()))
        );
    }

    #[test]
    fn identity_uses_immutable_local_key_only_when_transitions_enabled() {
        let descriptor = Descriptor::named("svc").with_immutable_local_key("key-1");
        assert_eq!(
            Identity::of(&descriptor, &transition_policy()),
            Some(Identity::ImmutableLocalKey("key-1".to_string()))
        );
        assert_eq!(
            Identity::of(&descriptor, &ReconciliationPolicy::default()),
            Some(Identity::Name("svc".to_string()))
        );
    }

    #[test]
    fn identity_falls_back_to_name() {
        let descriptor = Descriptor::named("svc");
        assert_eq!(
            Identity::of(&descriptor, &ReconciliationPolicy::default()),
            Some(Identity::Name("svc".to_string()))
        );
    }

    #[test]
    fn identity_is_none_when_no_field_is_usable() {
        assert_eq!(
            Identity::of(&Descriptor::default(), &transition_policy()),
            None
        );
    }

    #[test]
    fn descriptor_preserves_unrecognized_fields() {
        let raw = r#"{"id":"abc","name":"svc","ownerId":"team-7","typeId":"SERVICE"}"#;
        let descriptor: Descriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(descriptor.id.as_deref(), Some("abc"));
        assert_eq!(descriptor.fields.get("ownerId").and_then(|v| v.as_str()), Some("team-7"));

        let round_tripped = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(round_tripped.get("typeId").and_then(|v| v.as_str()), Some("SERVICE"));
    }

    #[test]
    fn immutable_local_key_uses_camel_case_wire_name() {
        let descriptor: Descriptor =
            serde_json::from_str(r#"{"immutableLocalKey":"key-9"}"#).unwrap();
        assert_eq!(descriptor.immutable_local_key.as_deref(), Some("key-9"));
        assert!(descriptor.fields.is_empty());
    }
}
