//! Ready-made compare functions.
//!
//! Both functions follow the [`Compare`](reconcile_storage::Compare)
//! contract: when no write is needed they hand back `existing` untouched.
//! Server-managed metadata (`uid`, `resourceVersion`, `generation`,
//! `creationTimestamp`) is never taken from the required object.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{trace, warn};

use reconcile_core::Resource;

const SERVER_FIELDS: [&str; 4] = ["uid", "resourceVersion", "generation", "creationTimestamp"];

/// Merges `required` into `existing` as an RFC 7396 merge patch.
///
/// Fields present in `required` overwrite those in `existing`; fields only
/// present in `existing` (status, defaults filled in by the server) survive.
/// Reports a change only when the merged document differs from `existing`.
///
/// Objects that can't go through `serde_json` (for example maps with
/// non-string keys) are compared with [`replace_if_different`] instead, so
/// an unchanged object still yields no write.
pub fn merge_json<T>(required: &T, existing: T) -> (T, bool)
where
    T: Resource + Clone + PartialEq + Serialize + DeserializeOwned,
{
    let current = match serde_json::to_value(&existing) {
        Ok(value) => value,
        Err(err) => return replace_on_error(required, existing, &err),
    };
    let mut patch = match serde_json::to_value(required) {
        Ok(value) => value,
        Err(err) => return replace_on_error(required, existing, &err),
    };
    strip_server_fields(&mut patch);

    let mut merged = current.clone();
    json_patch::merge(&mut merged, &patch);
    if merged == current {
        return (existing, false);
    }

    trace!(
        kind = %required.kind(),
        name = %required.name(),
        operations = json_patch::diff(&current, &merged).0.len(),
        "Merged object differs from existing"
    );

    match serde_json::from_value::<T>(merged) {
        Ok(obj) => (obj, true),
        Err(err) => replace_on_error(required, existing, &err),
    }
}

/// Replaces `existing` with `required` when their content differs.
///
/// The comparison ignores server-managed metadata, so an object read back
/// from the store compares equal to the one that was written.
pub fn replace_if_different<T>(required: &T, existing: T) -> (T, bool)
where
    T: Resource + Clone + PartialEq,
{
    let mut candidate = required.clone();
    candidate.meta_mut().copy_server_fields(existing.meta());
    if candidate == existing {
        (existing, false)
    } else {
        (candidate, true)
    }
}

fn strip_server_fields(patch: &mut Value) {
    if let Some(metadata) = patch.get_mut("metadata").and_then(Value::as_object_mut) {
        for field in SERVER_FIELDS {
            metadata.remove(field);
        }
    }
}

fn replace_on_error<T>(required: &T, existing: T, err: &serde_json::Error) -> (T, bool)
where
    T: Resource + Clone + PartialEq,
{
    warn!(
        kind = %required.kind(),
        name = %required.name(),
        error = %err,
        "Could not merge as JSON, comparing whole objects"
    );
    replace_if_different(required, existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconcile_core::{DynamicObject, ObjectMeta};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn stored(name: &str, data: Value) -> DynamicObject {
        let mut obj = DynamicObject::new("v1", "ConfigMap", name).with_field("data", data);
        obj.metadata.uid = Some("uid-1".into());
        obj.metadata.resource_version = Some("5".into());
        obj.metadata.generation = Some(3);
        obj
    }

    #[test]
    fn test_merge_json_unchanged_returns_existing() {
        let existing = stored("a", json!({"mode": "fast"}));
        let required =
            DynamicObject::new("v1", "ConfigMap", "a").with_field("data", json!({"mode": "fast"}));

        let (merged, changed) = merge_json(&required, existing.clone());
        assert!(!changed);
        assert_eq!(merged, existing);
    }

    #[test]
    fn test_merge_json_keeps_server_fields_and_extra_keys() {
        let existing =
            stored("a", json!({"mode": "fast"})).with_field("status", json!({"ready": true}));
        let mut required =
            DynamicObject::new("v1", "ConfigMap", "a").with_field("data", json!({"mode": "slow"}));
        required.metadata.resource_version = Some("1".into());

        let (merged, changed) = merge_json(&required, existing);
        assert!(changed);
        assert_eq!(merged.get_field("data"), Some(&json!({"mode": "slow"})));
        assert_eq!(merged.get_field("status"), Some(&json!({"ready": true})));
        assert_eq!(merged.resource_version(), Some("5"));
        assert_eq!(merged.metadata.uid.as_deref(), Some("uid-1"));
    }

    #[test]
    fn test_merge_json_adds_labels() {
        let existing = stored("a", json!({}));
        let mut required =
            DynamicObject::new("v1", "ConfigMap", "a").with_field("data", json!({}));
        required.metadata.labels.insert("app".into(), "web".into());

        let (merged, changed) = merge_json(&required, existing);
        assert!(changed);
        assert_eq!(merged.metadata.labels.get("app").map(String::as_str), Some("web"));
    }

    #[test]
    fn test_replace_if_different() {
        let existing = stored("a", json!({"mode": "fast"}));

        let same =
            DynamicObject::new("v1", "ConfigMap", "a").with_field("data", json!({"mode": "fast"}));
        let (merged, changed) = replace_if_different(&same, existing.clone());
        assert!(!changed);
        assert_eq!(merged, existing);

        let different =
            DynamicObject::new("v1", "ConfigMap", "a").with_field("data", json!({"mode": "slow"}));
        let (merged, changed) = replace_if_different(&different, existing);
        assert!(changed);
        assert_eq!(merged.get_field("data"), Some(&json!({"mode": "slow"})));
        assert_eq!(merged.resource_version(), Some("5"));
        assert_eq!(merged.metadata.generation, Some(3));
    }

    /// Port map keyed by (from, to); serde_json rejects non-string map keys.
    #[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
    struct PortMap {
        metadata: ObjectMeta,
        routes: BTreeMap<(u16, u16), u8>,
    }

    impl Resource for PortMap {
        fn kind(&self) -> &str {
            "PortMap"
        }

        fn meta(&self) -> &ObjectMeta {
            &self.metadata
        }

        fn meta_mut(&mut self) -> &mut ObjectMeta {
            &mut self.metadata
        }
    }

    fn port_map(weight: u8) -> PortMap {
        PortMap {
            metadata: ObjectMeta::named("edge"),
            routes: BTreeMap::from([((80, 8080), weight)]),
        }
    }

    #[test]
    fn test_merge_json_unserializable_unchanged_is_not_a_write() {
        let mut existing = port_map(1);
        existing.metadata.resource_version = Some("5".into());
        assert!(serde_json::to_value(&existing).is_err());

        let (merged, changed) = merge_json(&port_map(1), existing.clone());
        assert!(!changed);
        assert_eq!(merged, existing);
    }

    #[test]
    fn test_merge_json_unserializable_changed_replaces() {
        let mut existing = port_map(1);
        existing.metadata.resource_version = Some("5".into());

        let (merged, changed) = merge_json(&port_map(9), existing);
        assert!(changed);
        assert_eq!(merged.routes.get(&(80, 8080)), Some(&9));
        assert_eq!(merged.resource_version(), Some("5"));
    }
}
