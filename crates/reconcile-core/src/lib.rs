pub mod events;
pub mod resource;

pub use events::{Event, EventRecorder, EventType};
pub use resource::{format_resource_for_cli, DynamicObject, ObjectMeta, Resource, ResourceRef};
