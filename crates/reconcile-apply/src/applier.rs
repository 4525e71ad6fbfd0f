//! The upsert applier.
//!
//! [`Applier::apply`] makes the stored object match the required one with a
//! single get / compare / create-or-update pass:
//!
//! ```text
//! get(name)
//!  ├─ NotFound ─▶ create
//!  │               ├─ Ok ───────────▶ Created (+ "<Kind>Created")
//!  │               ├─ AlreadyExists ▶ AlreadyExists, nothing recorded
//!  │               └─ Err ──────────▶ error (+ "<Kind>CreateFailed")
//!  ├─ other error ─▶ error, nothing recorded
//!  └─ Ok(existing) ─▶ compare
//!                      ├─ unchanged ─▶ Unchanged, no write
//!                      └─ changed ───▶ update
//!                                       ├─ Ok ──▶ Updated (+ "<Kind>Updated")
//!                                       └─ Err ─▶ error (+ "<Kind>UpdateFailed")
//! ```
//!
//! There are no retries; every failure is handed back to the caller.

use std::marker::PhantomData;

use async_trait::async_trait;
use tracing::debug;

use reconcile_core::events::{reason_for, Event, EventRecorder, EventType, ReasonAction};
use reconcile_core::{format_resource_for_cli, Resource, ResourceRef};
use reconcile_storage::{CancellationToken, Client, Compare, CreateOptions, Getter, UpdateOptions};

use crate::error::ApplyError;

/// What an apply call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplyAction {
    /// The object was missing and has been created.
    Created,
    /// The object differed and has been updated.
    Updated,
    /// The object already matched; nothing was written.
    Unchanged,
    /// Creation lost a race with another creator; nothing was written.
    AlreadyExists,
}

impl ApplyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyAction::Created => "created",
            ApplyAction::Updated => "updated",
            ApplyAction::Unchanged => "unchanged",
            ApplyAction::AlreadyExists => "already_exists",
        }
    }
}

impl std::fmt::Display for ApplyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Successful outcome of an apply call.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    /// The persisted object, or the required object when creation lost a race.
    pub object: T,
    pub action: ApplyAction,
}

impl<T> Applied<T> {
    pub fn new(object: T, action: ApplyAction) -> Self {
        Self { object, action }
    }

    /// Whether the call modified the store.
    pub fn changed(&self) -> bool {
        matches!(self.action, ApplyAction::Created | ApplyAction::Updated)
    }

    pub fn into_inner(self) -> T {
        self.object
    }
}

/// Create-or-update an object, reporting outcomes to a recorder.
///
/// Object-safe so callers can hold `Box<dyn Apply<T>>` regardless of the
/// collaborators behind it.
#[async_trait]
pub trait Apply<T: Send + Sync + 'static>: Send + Sync {
    /// Makes the stored object match `required`.
    ///
    /// # Errors
    ///
    /// Returns `ApplyError::Get` when the lookup fails with anything but
    /// not-found, and `ApplyError::Create` / `ApplyError::Update` when the
    /// corresponding write fails. A lost creation race is not an error.
    async fn apply(
        &self,
        ctx: &CancellationToken,
        required: &T,
        recorder: &dyn EventRecorder,
    ) -> Result<Applied<T>, ApplyError>;
}

/// [`Apply`] implementation over a getter, a client and a compare function.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use reconcile_apply::{compare, Applier, Apply};
/// use reconcile_core::events::LoggingRecorder;
/// use reconcile_db_memory::InMemoryStore;
/// use reconcile_storage::CancellationToken;
///
/// let store = Arc::new(InMemoryStore::new("ConfigMap"));
/// let applier = Applier::new(store.clone(), store, compare::merge_json);
/// let recorder = LoggingRecorder::new("operator");
///
/// let applied = applier.apply(&CancellationToken::new(), &config_map, &recorder).await?;
/// if applied.changed() {
///     // ...
/// }
/// ```
pub struct Applier<T, G, C, F> {
    getter: G,
    client: C,
    compare: F,
    create_options: CreateOptions,
    update_options: UpdateOptions,
    _object: PhantomData<fn() -> T>,
}

impl<T, G, C, F> Applier<T, G, C, F>
where
    T: Resource + Clone + Send + Sync + 'static,
    G: Getter<T>,
    C: Client<T>,
    F: Compare<T>,
{
    pub fn new(getter: G, client: C, compare: F) -> Self {
        Self {
            getter,
            client,
            compare,
            create_options: CreateOptions::default(),
            update_options: UpdateOptions::default(),
            _object: PhantomData,
        }
    }

    /// Options passed to every create call.
    pub fn with_create_options(mut self, options: CreateOptions) -> Self {
        self.create_options = options;
        self
    }

    /// Options passed to every update call.
    pub fn with_update_options(mut self, options: UpdateOptions) -> Self {
        self.update_options = options;
        self
    }

    /// Convenience for setting `dry_run` on both create and update.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.create_options.dry_run = dry_run;
        self.update_options.dry_run = dry_run;
        self
    }

    async fn create_missing(
        &self,
        ctx: &CancellationToken,
        required: &T,
        recorder: &dyn EventRecorder,
    ) -> Result<Applied<T>, ApplyError> {
        match self.client.create(ctx, required, &self.create_options).await {
            Ok(created) => {
                debug!(
                    kind = %required.kind(),
                    name = %required.name(),
                    namespace = ?required.namespace(),
                    resource_version = ?created.resource_version(),
                    "Created object"
                );
                record(
                    recorder,
                    EventType::Normal,
                    reason_for(required.kind(), ReasonAction::Created),
                    format!(
                        "Created {} because it was missing",
                        format_resource_for_cli(&created)
                    ),
                    required,
                );
                Ok(Applied::new(created, ApplyAction::Created))
            }
            Err(err) if err.is_already_exists() => {
                debug!(
                    kind = %required.kind(),
                    name = %required.name(),
                    namespace = ?required.namespace(),
                    "Object was created concurrently, leaving it alone"
                );
                Ok(Applied::new(required.clone(), ApplyAction::AlreadyExists))
            }
            Err(err) => {
                debug!(
                    kind = %required.kind(),
                    name = %required.name(),
                    namespace = ?required.namespace(),
                    category = %err.category(),
                    "Create failed"
                );
                record(
                    recorder,
                    EventType::Warning,
                    reason_for(required.kind(), ReasonAction::CreateFailed),
                    format!(
                        "Failed to create {}: {err}",
                        format_resource_for_cli(required)
                    ),
                    required,
                );
                Err(ApplyError::Create(err))
            }
        }
    }
}

#[async_trait]
impl<T, G, C, F> Apply<T> for Applier<T, G, C, F>
where
    T: Resource + Clone + Send + Sync + 'static,
    G: Getter<T>,
    C: Client<T>,
    F: Compare<T>,
{
    async fn apply(
        &self,
        ctx: &CancellationToken,
        required: &T,
        recorder: &dyn EventRecorder,
    ) -> Result<Applied<T>, ApplyError> {
        let existing = match self.getter.get(required.name()).await {
            Ok(existing) => existing,
            Err(err) if err.is_not_found() => {
                debug!(
                    kind = %required.kind(),
                    name = %required.name(),
                    namespace = ?required.namespace(),
                    "Object missing, creating"
                );
                return self.create_missing(ctx, required, recorder).await;
            }
            Err(err) => {
                debug!(
                    kind = %required.kind(),
                    name = %required.name(),
                    namespace = ?required.namespace(),
                    category = %err.category(),
                    "Lookup failed"
                );
                return Err(ApplyError::Get(err));
            }
        };

        let (merged, modified) = self.compare.compare(required, existing);
        if !modified {
            debug!(
                kind = %required.kind(),
                name = %required.name(),
                namespace = ?required.namespace(),
                "Object up to date"
            );
            return Ok(Applied::new(merged, ApplyAction::Unchanged));
        }

        match self.client.update(ctx, &merged, &self.update_options).await {
            Ok(updated) => {
                debug!(
                    kind = %required.kind(),
                    name = %required.name(),
                    namespace = ?required.namespace(),
                    resource_version = ?updated.resource_version(),
                    "Updated object"
                );
                record(
                    recorder,
                    EventType::Normal,
                    reason_for(required.kind(), ReasonAction::Updated),
                    format!("Updated {}", format_resource_for_cli(&updated)),
                    required,
                );
                Ok(Applied::new(updated, ApplyAction::Updated))
            }
            Err(err) => {
                debug!(
                    kind = %required.kind(),
                    name = %required.name(),
                    namespace = ?required.namespace(),
                    category = %err.category(),
                    "Update failed"
                );
                record(
                    recorder,
                    EventType::Warning,
                    reason_for(required.kind(), ReasonAction::UpdateFailed),
                    format!(
                        "Failed to update {}: {err}",
                        format_resource_for_cli(required)
                    ),
                    required,
                );
                Err(ApplyError::Update(err))
            }
        }
    }
}

fn record<T: Resource>(
    recorder: &dyn EventRecorder,
    event_type: EventType,
    reason: String,
    message: String,
    involved: &T,
) {
    let event = Event::new(event_type, recorder.component(), reason, message)
        .with_involved(ResourceRef::from_resource(involved));
    recorder.record(event);
}

impl<T, G, C, F> std::fmt::Debug for Applier<T, G, C, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Applier")
            .field("create_options", &self.create_options)
            .field("update_options", &self.update_options)
            .finish()
    }
}
