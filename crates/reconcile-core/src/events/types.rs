//! Event types emitted by recorders.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::resource::ResourceRef;

/// Severity of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Routine state change (created, updated)
    Normal,
    /// Something went wrong and the caller should look
    Warning,
}

impl EventType {
    /// Returns the string representation of the event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Normal => "Normal",
            EventType::Warning => "Warning",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome an event reason is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonAction {
    Created,
    CreateFailed,
    Updated,
    UpdateFailed,
}

impl ReasonAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonAction::Created => "Created",
            ReasonAction::CreateFailed => "CreateFailed",
            ReasonAction::Updated => "Updated",
            ReasonAction::UpdateFailed => "UpdateFailed",
        }
    }
}

/// Builds a kind-derived reason such as `ConfigMapCreated`.
pub fn reason_for(kind: &str, action: ReasonAction) -> String {
    format!("{kind}{}", action.as_str())
}

/// A human-readable event about a managed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_type: EventType,
    /// Machine-friendly reason, e.g. `DeploymentUpdateFailed`
    pub reason: String,
    pub message: String,
    /// Object the event is about, when known
    pub involved: Option<ResourceRef>,
    /// Component that recorded the event
    pub source: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl Event {
    pub fn new(
        event_type: EventType,
        source: impl Into<String>,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            event_type,
            reason: reason.into(),
            message: message.into(),
            involved: None,
            source: source.into(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn normal(
        source: impl Into<String>,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(EventType::Normal, source, reason, message)
    }

    pub fn warning(
        source: impl Into<String>,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(EventType::Warning, source, reason, message)
    }

    pub fn with_involved(mut self, involved: ResourceRef) -> Self {
        self.involved = Some(involved);
        self
    }

    pub fn is_warning(&self) -> bool {
        self.event_type == EventType::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_for() {
        assert_eq!(reason_for("ConfigMap", ReasonAction::Created), "ConfigMapCreated");
        assert_eq!(
            reason_for("Deployment", ReasonAction::UpdateFailed),
            "DeploymentUpdateFailed"
        );
    }

    #[test]
    fn test_event_constructors() {
        let event = Event::warning("operator", "SecretCreateFailed", "boom");
        assert!(event.is_warning());
        assert_eq!(event.source, "operator");
        assert!(event.involved.is_none());

        let event = Event::normal("operator", "SecretCreated", "ok");
        assert_eq!(event.event_type, EventType::Normal);
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::normal("operator", "PodCreated", "Created pod/a").with_involved(
            ResourceRef {
                kind: "Pod".into(),
                group: String::new(),
                name: "a".into(),
                namespace: None,
            },
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "Normal");
        assert_eq!(json["reason"], "PodCreated");
        assert_eq!(json["involved"]["name"], "a");
        assert!(json["timestamp"].is_string());
    }
}
