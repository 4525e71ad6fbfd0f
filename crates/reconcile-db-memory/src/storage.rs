use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use time::OffsetDateTime;
use tracing::debug;

use reconcile_core::Resource;
use reconcile_storage::{
    CancellationToken, Client, CreateOptions, Getter, StoreError, UpdateOptions,
};

const CONFLICT_MESSAGE: &str =
    "the object has been modified; please apply your changes to the latest version and try again";

/// Call counters, for observability and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub gets: u64,
    pub creates: u64,
    pub updates: u64,
}

#[derive(Debug, Default)]
struct Counters {
    gets: AtomicU64,
    creates: AtomicU64,
    updates: AtomicU64,
}

/// In-memory object store keyed by name.
///
/// One store holds one kind in one namespace, mirroring how a lister and a
/// client are scoped. It provides:
/// - Atomic create (`AlreadyExists` on a name collision)
/// - Optimistic concurrency on update via `resourceVersion`
/// - Server-assigned `uid`, `resourceVersion`, `generation` and
///   `creationTimestamp`
/// - Dry-run writes that validate without persisting
#[derive(Debug)]
pub struct InMemoryStore<T> {
    kind: String,
    data: DashMap<String, T>,
    /// Monotonic counter for resource versions
    version_counter: AtomicU64,
    counters: Counters,
}

impl<T> InMemoryStore<T>
where
    T: Resource + Clone + Send + Sync + 'static,
{
    /// Creates an empty store for objects of `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: DashMap::new(),
            version_counter: AtomicU64::new(1),
            counters: Counters::default(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Generates the next resource version.
    fn next_version(&self) -> String {
        self.version_counter
            .fetch_add(1, Ordering::SeqCst)
            .to_string()
    }

    /// Inserts `obj` as-is, replacing any object with the same name.
    /// Metadata is not touched; used for seeding.
    pub fn insert_raw(&self, obj: T) {
        self.data.insert(obj.name().to_string(), obj);
    }

    /// Returns a copy of the named object, bypassing the counters.
    pub fn get_object(&self, name: &str) -> Option<T> {
        self.data.get(name).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, name: &str) -> Option<T> {
        self.data.remove(name).map(|(_, obj)| obj)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// Names of all stored objects, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.data.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            gets: self.counters.gets.load(Ordering::Relaxed),
            creates: self.counters.creates.load(Ordering::Relaxed),
            updates: self.counters.updates.load(Ordering::Relaxed),
        }
    }
}

fn validate(obj: &impl Resource) -> Result<(), StoreError> {
    if obj.name().is_empty() {
        return Err(StoreError::invalid(format!(
            "{}: metadata.name is required",
            obj.kind()
        )));
    }
    Ok(())
}

#[async_trait]
impl<T> Getter<T> for InMemoryStore<T>
where
    T: Resource + Clone + Send + Sync + 'static,
{
    async fn get(&self, name: &str) -> Result<T, StoreError> {
        self.counters.gets.fetch_add(1, Ordering::Relaxed);
        self.get_object(name)
            .ok_or_else(|| StoreError::not_found(&self.kind, name))
    }
}

#[async_trait]
impl<T> Client<T> for InMemoryStore<T>
where
    T: Resource + Clone + Send + Sync + 'static,
{
    async fn create(
        &self,
        ctx: &CancellationToken,
        obj: &T,
        opts: &CreateOptions,
    ) -> Result<T, StoreError> {
        if ctx.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        validate(obj)?;
        self.counters.creates.fetch_add(1, Ordering::Relaxed);

        let name = obj.name().to_string();
        match self.data.entry(name.clone()) {
            Entry::Occupied(_) => Err(StoreError::already_exists(obj.kind(), name)),
            Entry::Vacant(slot) => {
                let mut stored = obj.clone();
                let meta = stored.meta_mut();
                meta.uid = Some(uuid::Uuid::new_v4().to_string());
                // Dry-run previews carry no resourceVersion and don't advance the counter.
                meta.resource_version = (!opts.dry_run).then(|| self.next_version());
                meta.generation = Some(1);
                meta.creation_timestamp = Some(OffsetDateTime::now_utc());

                if !opts.dry_run {
                    slot.insert(stored.clone());
                }
                debug!(
                    kind = %obj.kind(),
                    name = %name,
                    dry_run = opts.dry_run,
                    "Created object"
                );
                Ok(stored)
            }
        }
    }

    async fn update(
        &self,
        ctx: &CancellationToken,
        obj: &T,
        opts: &UpdateOptions,
    ) -> Result<T, StoreError> {
        if ctx.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        validate(obj)?;
        self.counters.updates.fetch_add(1, Ordering::Relaxed);

        let name = obj.name();
        let mut current = self
            .data
            .get_mut(name)
            .ok_or_else(|| StoreError::not_found(obj.kind(), name))?;

        if let Some(version) = obj.resource_version() {
            if current.resource_version() != Some(version) {
                return Err(StoreError::conflict(obj.kind(), name, CONFLICT_MESSAGE));
            }
        }

        let mut stored = obj.clone();
        let generation = current.meta().generation.unwrap_or(0) + 1;
        let resource_version = if opts.dry_run {
            current.meta().resource_version.clone()
        } else {
            Some(self.next_version())
        };
        {
            let meta = stored.meta_mut();
            meta.uid = current.meta().uid.clone();
            meta.creation_timestamp = current.meta().creation_timestamp;
            meta.resource_version = resource_version;
            meta.generation = Some(generation);
        }

        if !opts.dry_run {
            *current = stored.clone();
        }
        debug!(
            kind = %obj.kind(),
            name = %name,
            generation,
            dry_run = opts.dry_run,
            "Updated object"
        );
        Ok(stored)
    }
}
