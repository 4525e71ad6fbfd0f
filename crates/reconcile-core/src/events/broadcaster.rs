//! Broadcast recorder.
//!
//! Publishes recorded events on a tokio broadcast channel so any number of
//! subscribers (audit writers, UIs, tests) can follow them.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

use super::recorder::EventRecorder;
use super::types::Event;

/// Default buffer size for the broadcast channel.
/// Events beyond this limit will cause older events to be dropped for slow receivers.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Recorder backed by a broadcast channel.
///
/// # Example
///
/// ```
/// use reconcile_core::events::{BroadcastRecorder, EventRecorder};
///
/// let recorder = BroadcastRecorder::new("operator");
/// let mut receiver = recorder.subscribe();
///
/// recorder.event("ConfigMapCreated", "Created configmap/settings because it was missing");
///
/// let event = receiver.try_recv().unwrap();
/// assert_eq!(event.reason, "ConfigMapCreated");
/// ```
#[derive(Clone)]
pub struct BroadcastRecorder {
    component: String,
    sender: broadcast::Sender<Event>,
}

impl BroadcastRecorder {
    /// Create a new recorder with default buffer size.
    pub fn new(component: impl Into<String>) -> Self {
        Self::with_capacity(component, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new recorder with custom buffer size.
    pub fn with_capacity(component: impl Into<String>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            component: component.into(),
            sender,
        }
    }

    /// Create a new recorder wrapped in an Arc for sharing.
    pub fn new_shared(component: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(component))
    }

    /// Subscribe to events.
    ///
    /// Events sent before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }

    /// Send an event, returning how many subscribers received it.
    pub fn send(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or_default()
    }
}

impl EventRecorder for BroadcastRecorder {
    fn component(&self) -> &str {
        &self.component
    }

    fn record(&self, event: Event) {
        let reason = event.reason.clone();
        let count = self.send(event);
        trace!(reason = %reason, subscribers = count, "Broadcast event");
    }

    fn with_component_suffix(&self, suffix: &str) -> Arc<dyn EventRecorder> {
        Arc::new(Self {
            component: format!("{}-{suffix}", self.component),
            sender: self.sender.clone(),
        })
    }
}

impl std::fmt::Debug for BroadcastRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastRecorder")
            .field("component", &self.component)
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
