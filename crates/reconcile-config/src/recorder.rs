use std::sync::Arc;

use reconcile_core::events::{
    BroadcastRecorder, EventRecorder, FanoutRecorder, InMemoryRecorder, LoggingRecorder,
};

use crate::settings::{EventSink, EventsConfig};

/// The configured recorder plus concrete handles for sinks that callers
/// read from.
#[derive(Clone)]
pub struct RecorderHandle {
    pub recorder: Arc<dyn EventRecorder>,
    pub broadcast: Option<BroadcastRecorder>,
    pub memory: Option<InMemoryRecorder>,
}

impl std::fmt::Debug for RecorderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecorderHandle")
            .field("component", &self.recorder.component())
            .field("broadcast", &self.broadcast.is_some())
            .field("memory", &self.memory.is_some())
            .finish()
    }
}

pub fn build_recorder(config: &EventsConfig) -> RecorderHandle {
    let component = config.component.as_str();
    match config.sink {
        EventSink::Log => RecorderHandle {
            recorder: Arc::new(LoggingRecorder::new(component)),
            broadcast: None,
            memory: None,
        },
        EventSink::Broadcast => {
            let broadcast = BroadcastRecorder::with_capacity(component, config.buffer_size);
            RecorderHandle {
                recorder: Arc::new(broadcast.clone()),
                broadcast: Some(broadcast),
                memory: None,
            }
        }
        EventSink::Memory => {
            let memory = InMemoryRecorder::new(component);
            RecorderHandle {
                recorder: Arc::new(memory.clone()),
                broadcast: None,
                memory: Some(memory),
            }
        }
        EventSink::LogAndBroadcast => {
            let broadcast = BroadcastRecorder::with_capacity(component, config.buffer_size);
            let fanout = FanoutRecorder::new(
                component,
                vec![
                    Arc::new(LoggingRecorder::new(component)),
                    Arc::new(broadcast.clone()),
                ],
            );
            RecorderHandle {
                recorder: Arc::new(fanout),
                broadcast: Some(broadcast),
                memory: None,
            }
        }
    }
}
