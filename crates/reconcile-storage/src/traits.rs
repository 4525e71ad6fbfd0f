//! Collaborator traits for the applier.
//!
//! The applier never talks to a backend directly. It reads through a
//! [`Getter`], writes through a [`Client`] and decides whether a write is
//! needed with a [`Compare`] function.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::StoreError;
use crate::types::{CreateOptions, UpdateOptions};

/// Reads objects by name, typically from a lister cache.
///
/// # Errors
///
/// Implementations must report a missing object as `StoreError::NotFound`;
/// the applier relies on that to take the create path.
#[async_trait]
pub trait Getter<T: Send + Sync + 'static>: Send + Sync {
    async fn get(&self, name: &str) -> Result<T, StoreError>;
}

/// Writes objects to the backing API.
#[async_trait]
pub trait Client<T: Send + Sync + 'static>: Send + Sync {
    /// Creates `obj` and returns the persisted object.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if an object with the same name
    /// exists, which includes losing a creation race.
    async fn create(
        &self,
        ctx: &CancellationToken,
        obj: &T,
        opts: &CreateOptions,
    ) -> Result<T, StoreError>;

    /// Replaces the stored object with `obj` and returns the persisted object.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the object does not exist and
    /// `StoreError::Conflict` if `obj` carries a stale resource version.
    async fn update(
        &self,
        ctx: &CancellationToken,
        obj: &T,
        opts: &UpdateOptions,
    ) -> Result<T, StoreError>;
}

/// Compares the required object with the existing one.
///
/// Returns the object that should be persisted and whether a write is
/// needed. When no write is needed the returned object must equal `existing`.
pub trait Compare<T>: Send + Sync {
    fn compare(&self, required: &T, existing: T) -> (T, bool);
}

/// Plain function form of [`Compare`].
pub type CompareFunc<T> = fn(&T, T) -> (T, bool);

impl<T, F> Compare<T> for F
where
    F: Fn(&T, T) -> (T, bool) + Send + Sync,
{
    fn compare(&self, required: &T, existing: T) -> (T, bool) {
        self(required, existing)
    }
}

#[async_trait]
impl<T, G> Getter<T> for Arc<G>
where
    T: Send + Sync + 'static,
    G: Getter<T> + ?Sized,
{
    async fn get(&self, name: &str) -> Result<T, StoreError> {
        (**self).get(name).await
    }
}

#[async_trait]
impl<T, C> Client<T> for Arc<C>
where
    T: Send + Sync + 'static,
    C: Client<T> + ?Sized,
{
    async fn create(
        &self,
        ctx: &CancellationToken,
        obj: &T,
        opts: &CreateOptions,
    ) -> Result<T, StoreError> {
        (**self).create(ctx, obj, opts).await
    }

    async fn update(
        &self,
        ctx: &CancellationToken,
        obj: &T,
        opts: &UpdateOptions,
    ) -> Result<T, StoreError> {
        (**self).update(ctx, obj, opts).await
    }
}

#[async_trait]
impl<T, G> Getter<T> for &G
where
    T: Send + Sync + 'static,
    G: Getter<T> + ?Sized,
{
    async fn get(&self, name: &str) -> Result<T, StoreError> {
        (**self).get(name).await
    }
}

#[async_trait]
impl<T, C> Client<T> for &C
where
    T: Send + Sync + 'static,
    C: Client<T> + ?Sized,
{
    async fn create(
        &self,
        ctx: &CancellationToken,
        obj: &T,
        opts: &CreateOptions,
    ) -> Result<T, StoreError> {
        (**self).create(ctx, obj, opts).await
    }

    async fn update(
        &self,
        ctx: &CancellationToken,
        obj: &T,
        opts: &UpdateOptions,
    ) -> Result<T, StoreError> {
        (**self).update(ctx, obj, opts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time checks that the collaborator traits are object-safe
    fn _assert_getter_object_safe(_: &dyn Getter<String>) {}
    fn _assert_client_object_safe(_: &dyn Client<String>) {}
    fn _assert_compare_object_safe(_: &dyn Compare<String>) {}

    struct Fixed;

    #[async_trait]
    impl Getter<String> for Fixed {
        async fn get(&self, name: &str) -> Result<String, StoreError> {
            if name == "present" {
                Ok(name.to_string())
            } else {
                Err(StoreError::not_found("String", name))
            }
        }
    }

    fn keep_existing(_required: &String, existing: String) -> (String, bool) {
        (existing, false)
    }

    #[tokio::test]
    async fn test_arc_getter_delegates() {
        let getter: Arc<dyn Getter<String>> = Arc::new(Fixed);
        assert_eq!(getter.get("present").await.unwrap(), "present");
        assert!(getter.get("absent").await.unwrap_err().is_not_found());
    }

    struct Echo;

    #[async_trait]
    impl Client<String> for Echo {
        async fn create(
            &self,
            ctx: &CancellationToken,
            obj: &String,
            _opts: &CreateOptions,
        ) -> Result<String, StoreError> {
            if ctx.is_cancelled() {
                return Err(StoreError::Cancelled);
            }
            Ok(format!("created:{obj}"))
        }

        async fn update(
            &self,
            _ctx: &CancellationToken,
            obj: &String,
            _opts: &UpdateOptions,
        ) -> Result<String, StoreError> {
            Ok(format!("updated:{obj}"))
        }
    }

    async fn fetch_or_create<G, C>(
        getter: G,
        client: C,
        name: &str,
    ) -> Result<String, StoreError>
    where
        G: Getter<String>,
        C: Client<String>,
    {
        match getter.get(name).await {
            Err(err) if err.is_not_found() => {
                let ctx = CancellationToken::new();
                client
                    .create(&ctx, &name.to_string(), &CreateOptions::default())
                    .await
            }
            other => other,
        }
    }

    #[tokio::test]
    async fn test_borrowed_collaborators_delegate() {
        let getter = Fixed;
        let client = Echo;

        assert_eq!(
            fetch_or_create(&getter, &client, "present").await.unwrap(),
            "present"
        );
        assert_eq!(
            fetch_or_create(&getter, &client, "absent").await.unwrap(),
            "created:absent"
        );

        let dyn_client: &dyn Client<String> = &client;
        let ctx = CancellationToken::new();
        let updated = (&dyn_client)
            .update(&ctx, &"x".to_string(), &UpdateOptions::default())
            .await
            .unwrap();
        assert_eq!(updated, "updated:x");

        ctx.cancel();
        let borrowed = &client;
        let err = <&Echo as Client<String>>::create(
            &borrowed,
            &ctx,
            &"y".to_string(),
            &CreateOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_function_is_compare() {
        let (merged, changed) = keep_existing.compare(&"new".to_string(), "old".to_string());
        assert_eq!(merged, "old");
        assert!(!changed);

        let replace = |required: &String, existing: String| {
            let changed = *required != existing;
            (required.clone(), changed)
        };
        let (merged, changed) = Compare::compare(&replace, &"b".to_string(), "a".to_string());
        assert_eq!(merged, "b");
        assert!(changed);
    }
}
