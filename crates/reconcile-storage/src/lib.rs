//! # reconcile-storage
//!
//! Collaborator contracts for the reconcile applier.
//!
//! This crate defines the traits a backend must implement to be driven by the
//! applier, plus the error taxonomy shared between them. It does not contain
//! any backend - see `reconcile-db-memory` for an in-memory one.
//!
//! ## Overview
//!
//! - [`Getter`]: read an object by name, reporting absence as `NotFound`
//! - [`Client`]: create and update objects, reporting a lost creation race as
//!   `AlreadyExists`
//! - [`Compare`]: decide whether the existing object must be rewritten
//!
//! ## Example
//!
//! ```ignore
//! use async_trait::async_trait;
//! use reconcile_storage::{Getter, StoreError};
//!
//! struct ConfigMapLister { /* ... */ }
//!
//! #[async_trait]
//! impl Getter<ConfigMap> for ConfigMapLister {
//!     async fn get(&self, name: &str) -> Result<ConfigMap, StoreError> {
//!         self.cache
//!             .get(name)
//!             .cloned()
//!             .ok_or_else(|| StoreError::not_found("ConfigMap", name))
//!     }
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StoreError};
pub use traits::{Client, Compare, CompareFunc, Getter};
pub use types::{CreateOptions, UpdateOptions};

/// Re-exported so callers don't need a direct `tokio-util` dependency.
pub use tokio_util::sync::CancellationToken;

/// Type alias for a store result.
pub type StoreResult<T> = Result<T, StoreError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use reconcile_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StoreError};
    pub use crate::traits::{Client, Compare, CompareFunc, Getter};
    pub use crate::types::{CreateOptions, UpdateOptions};
    pub use crate::{CancellationToken, StoreResult};
}
