//! In-memory object store for the reconcile applier.
//!
//! This crate provides an in-memory implementation of the `Getter` and
//! `Client` traits from `reconcile-storage`, using a sharded `DashMap` for
//! concurrent access. It behaves like a real API server for the parts the
//! applier cares about: creates collide, stale updates conflict.
//!
//! # Example
//!
//! ```ignore
//! use reconcile_db_memory::InMemoryStore;
//! use reconcile_storage::{CancellationToken, Client, CreateOptions};
//!
//! let store = InMemoryStore::new("ConfigMap");
//! let created = store
//!     .create(&CancellationToken::new(), &config_map, &CreateOptions::default())
//!     .await?;
//! ```

pub mod storage;

pub use reconcile_storage::{Client, Getter, StoreError};
pub use storage::{InMemoryStore, StoreStats};

/// Type alias for a shareable store instance.
pub type SharedStore<T> = std::sync::Arc<InMemoryStore<T>>;

/// Creates a new shareable in-memory store for objects of `kind`.
pub fn create_store<T>(kind: impl Into<String>) -> SharedStore<T>
where
    T: reconcile_core::Resource + Clone + Send + Sync + 'static,
{
    std::sync::Arc::new(InMemoryStore::new(kind))
}
