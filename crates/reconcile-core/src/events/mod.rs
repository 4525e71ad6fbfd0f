//! Event recording for reconciliation outcomes.
//!
//! Recorders are the notification side channel of the applier: every
//! create/update attempt is reported as a human-readable [`Event`] with a
//! kind-derived reason such as `ConfigMapCreated` or `DeploymentUpdateFailed`.
//!
//! # Sinks
//!
//! - [`LoggingRecorder`]: writes events through `tracing`
//! - [`BroadcastRecorder`]: publishes on a tokio broadcast channel
//! - [`InMemoryRecorder`]: keeps events for inspection
//! - [`FanoutRecorder`]: forwards to several sinks
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use reconcile_core::events::{EventRecorder, FanoutRecorder, InMemoryRecorder, LoggingRecorder};
//!
//! let memory = InMemoryRecorder::new("operator");
//! let recorder = FanoutRecorder::new(
//!     "operator",
//!     vec![Arc::new(LoggingRecorder::new("operator")), Arc::new(memory.clone())],
//! );
//!
//! recorder.event("ConfigMapCreated", "Created configmap/settings because it was missing");
//! assert_eq!(memory.len(), 1);
//! ```

pub mod broadcaster;
pub mod recorder;
pub mod types;

pub use broadcaster::{BroadcastRecorder, DEFAULT_BUFFER_SIZE};
pub use recorder::{EventRecorder, FanoutRecorder, InMemoryRecorder, LoggingRecorder};
pub use types::{reason_for, Event, EventType, ReasonAction};
