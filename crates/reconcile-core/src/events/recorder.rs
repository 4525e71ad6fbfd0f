//! Event recorders.
//!
//! A recorder is the side channel the applier reports outcomes to. Recording
//! never fails: sinks that can't deliver an event drop it.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use super::types::{Event, EventType};

/// Sink for human-readable events about managed objects.
pub trait EventRecorder: Send + Sync {
    /// Name of the component events are attributed to.
    fn component(&self) -> &str;

    /// Records a fully built event.
    fn record(&self, event: Event);

    /// Returns a recorder sharing this sink whose component is
    /// `<component>-<suffix>`.
    fn with_component_suffix(&self, suffix: &str) -> Arc<dyn EventRecorder>;

    /// Records a normal event.
    fn event(&self, reason: &str, message: &str) {
        self.record(Event::normal(self.component(), reason, message));
    }

    /// Records a warning event.
    fn warning(&self, reason: &str, message: &str) {
        self.record(Event::warning(self.component(), reason, message));
    }
}

fn suffixed(component: &str, suffix: &str) -> String {
    format!("{component}-{suffix}")
}

/// Writes events to the tracing subscriber.
#[derive(Debug, Clone)]
pub struct LoggingRecorder {
    component: String,
}

impl LoggingRecorder {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }
}

impl EventRecorder for LoggingRecorder {
    fn component(&self) -> &str {
        &self.component
    }

    fn record(&self, event: Event) {
        let involved = event
            .involved
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        match event.event_type {
            EventType::Normal => info!(
                component = %event.source,
                reason = %event.reason,
                involved = %involved,
                "{}",
                event.message
            ),
            EventType::Warning => warn!(
                component = %event.source,
                reason = %event.reason,
                involved = %involved,
                "{}",
                event.message
            ),
        }
    }

    fn with_component_suffix(&self, suffix: &str) -> Arc<dyn EventRecorder> {
        Arc::new(Self::new(suffixed(&self.component, suffix)))
    }
}

/// Keeps events in memory, in recording order.
///
/// Clones and suffixed recorders share the same buffer.
#[derive(Debug, Clone)]
pub struct InMemoryRecorder {
    component: String,
    events: Arc<Mutex<Vec<Event>>>,
}

impl InMemoryRecorder {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        // A panic while holding the lock leaves the Vec intact.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of all events recorded so far.
    pub fn events(&self) -> Vec<Event> {
        self.lock().clone()
    }

    /// Reasons of all events recorded so far.
    pub fn reasons(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.reason.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl EventRecorder for InMemoryRecorder {
    fn component(&self) -> &str {
        &self.component
    }

    fn record(&self, event: Event) {
        self.lock().push(event);
    }

    fn with_component_suffix(&self, suffix: &str) -> Arc<dyn EventRecorder> {
        Arc::new(Self {
            component: suffixed(&self.component, suffix),
            events: self.events.clone(),
        })
    }
}

/// Forwards every event to each inner recorder.
#[derive(Clone)]
pub struct FanoutRecorder {
    component: String,
    sinks: Vec<Arc<dyn EventRecorder>>,
}

impl FanoutRecorder {
    pub fn new(component: impl Into<String>, sinks: Vec<Arc<dyn EventRecorder>>) -> Self {
        Self {
            component: component.into(),
            sinks,
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl EventRecorder for FanoutRecorder {
    fn component(&self) -> &str {
        &self.component
    }

    fn record(&self, event: Event) {
        for sink in &self.sinks {
            sink.record(event.clone());
        }
    }

    fn with_component_suffix(&self, suffix: &str) -> Arc<dyn EventRecorder> {
        Arc::new(Self {
            component: suffixed(&self.component, suffix),
            sinks: self
                .sinks
                .iter()
                .map(|s| s.with_component_suffix(suffix))
                .collect(),
        })
    }
}

impl std::fmt::Debug for FanoutRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutRecorder")
            .field("component", &self.component)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
