//! Resource accessors.
//!
//! Objects handled by the applier describe themselves through the [`Resource`]
//! trait instead of reflection: every object exposes its kind, API group and
//! [`ObjectMeta`]. [`DynamicObject`] is a JSON-backed implementation for
//! callers that don't have typed structs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use time::OffsetDateTime;

/// Metadata carried by every managed object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub namespace: Option<String>,
    /// Assigned by the store on create.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub uid: Option<String>,
    /// Opaque version used for optimistic concurrency.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub generation: Option<i64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        with = "time::serde::rfc3339::option"
    )]
    pub creation_timestamp: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Copies the fields owned by the store (uid, version, generation,
    /// creation timestamp) from `other`.
    pub fn copy_server_fields(&mut self, other: &ObjectMeta) {
        self.uid = other.uid.clone();
        self.resource_version = other.resource_version.clone();
        self.generation = other.generation;
        self.creation_timestamp = other.creation_timestamp;
    }

    /// Clears the fields owned by the store.
    pub fn clear_server_fields(&mut self) {
        self.uid = None;
        self.resource_version = None;
        self.generation = None;
        self.creation_timestamp = None;
    }
}

/// Accessor capability required from every object passed to the applier.
///
/// # Example
///
/// ```
/// use reconcile_core::{ObjectMeta, Resource};
///
/// #[derive(Clone)]
/// struct ConfigMap {
///     metadata: ObjectMeta,
/// }
///
/// impl Resource for ConfigMap {
///     fn kind(&self) -> &str {
///         "ConfigMap"
///     }
///     fn meta(&self) -> &ObjectMeta {
///         &self.metadata
///     }
///     fn meta_mut(&mut self) -> &mut ObjectMeta {
///         &mut self.metadata
///     }
/// }
///
/// let cm = ConfigMap { metadata: ObjectMeta::named("settings") };
/// assert_eq!(cm.name(), "settings");
/// ```
pub trait Resource {
    /// Kind of the object, e.g. `"ConfigMap"`.
    fn kind(&self) -> &str;

    /// API group; empty for the core group.
    fn group(&self) -> &str {
        ""
    }

    fn meta(&self) -> &ObjectMeta;

    fn meta_mut(&mut self) -> &mut ObjectMeta;

    fn name(&self) -> &str {
        &self.meta().name
    }

    fn namespace(&self) -> Option<&str> {
        self.meta().namespace.as_deref()
    }

    fn resource_version(&self) -> Option<&str> {
        self.meta().resource_version.as_deref()
    }
}

/// Formats an object the way CLI tools print it: `kind[.group]/name -n ns`.
pub fn format_resource_for_cli<R: Resource + ?Sized>(obj: &R) -> String {
    ResourceRef::from_resource(obj).to_string()
}

/// Owned reference to an object, detached from the object itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub group: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub namespace: Option<String>,
}

impl ResourceRef {
    pub fn from_resource<R: Resource + ?Sized>(obj: &R) -> Self {
        Self {
            kind: obj.kind().to_string(),
            group: obj.group().to_string(),
            name: obj.name().to_string(),
            namespace: obj.namespace().map(String::from),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.to_lowercase())?;
        if !self.group.is_empty() {
            write!(f, ".{}", self.group)?;
        }
        write!(f, "/{}", self.name)?;
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => write!(f, " -n {ns}"),
            _ => Ok(()),
        }
    }
}

/// JSON-backed object for callers without typed structs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicObject {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl DynamicObject {
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            metadata: ObjectMeta::named(name),
            data: Map::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.metadata.namespace = Some(namespace.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    pub fn get_field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }
}

impl Resource for DynamicObject {
    fn kind(&self) -> &str {
        &self.kind
    }

    /// `apps/v1` → `apps`; `v1` → core group.
    fn group(&self) -> &str {
        match self.api_version.rsplit_once('/') {
            Some((group, _)) => group,
            None => "",
        }
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
