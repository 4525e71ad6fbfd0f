//! # reconcile-apply
//!
//! Idempotent create-or-update ("apply") for objects behind a remote API.
//!
//! Given the required object, a [`Getter`](reconcile_storage::Getter) to read
//! the current one, a [`Client`](reconcile_storage::Client) to write, and a
//! [`Compare`](reconcile_storage::Compare) function, the [`Applier`] makes a
//! single pass:
//!
//! - missing → create, lost creation races are absorbed
//! - present and unchanged → nothing is written
//! - present and changed → update with the compare result
//!
//! Outcomes are reported to an [`EventRecorder`](reconcile_core::EventRecorder)
//! with kind-derived reasons (`ConfigMapCreated`, `ConfigMapUpdateFailed`, ...).

mod applier;
pub mod compare;
mod error;

pub use applier::{Applied, Applier, Apply, ApplyAction};
pub use error::ApplyError;

/// Type alias for an apply result.
pub type ApplyResult<T> = Result<Applied<T>, ApplyError>;

/// Type alias for a boxed applier.
pub type DynApplier<T> = Box<dyn Apply<T>>;
