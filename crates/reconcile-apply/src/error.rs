//! Applier error types.

use reconcile_storage::StoreError;

/// Failure of a single apply call.
///
/// The variant records which step failed; the wrapped [`StoreError`] is the
/// collaborator's error, untouched, and is also what `Display` prints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    /// Reading the existing object failed with something other than
    /// not-found. Nothing was written.
    #[error(transparent)]
    Get(StoreError),

    /// Creating the missing object failed.
    #[error(transparent)]
    Create(StoreError),

    /// Updating the existing object failed.
    #[error(transparent)]
    Update(StoreError),
}

impl ApplyError {
    /// Whether a write was attempted before the failure.
    ///
    /// `true` for create and update failures: the object may or may not have
    /// been modified, so callers should treat state as changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self, Self::Create(_) | Self::Update(_))
    }

    /// The collaborator error that caused this failure.
    #[must_use]
    pub fn store_error(&self) -> &StoreError {
        match self {
            Self::Get(err) | Self::Create(err) | Self::Update(err) => err,
        }
    }

    #[must_use]
    pub fn into_store_error(self) -> StoreError {
        match self {
            Self::Get(err) | Self::Create(err) | Self::Update(err) => err,
        }
    }
}
