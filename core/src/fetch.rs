use crate::error::FetchError;
use crate::value::{SlotValue, SlotValues};
use async_trait::async_trait;
use std::any::Any;
use std::future::Future;
use std::marker::PhantomData;

/// The contract for an asynchronous data source.
///
/// `inputs` holds the resolved values of the slot's declared dependencies,
/// and nothing else. Errors are stored on the slot by the gate; they never
/// reach sibling slots.
#[async_trait]
pub trait Fetch: Send + Sync + 'static {
    async fn fetch(&self, inputs: &SlotValues) -> Result<SlotValue, FetchError>;
}

/// A [`Fetch`] backed by an async closure returning a typed value.
pub struct FnFetch<F, T> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

/// Create a fetch from an async closure.
///
/// The closure receives an owned copy of the dependency values so the
/// returned future can be `'static`.
pub fn fetch_fn<F, Fut, T>(f: F) -> FnFetch<F, T>
where
    F: Fn(SlotValues) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    T: Any + Send + Sync + PartialEq,
{
    FnFetch {
        f,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, T> Fetch for FnFetch<F, T>
where
    F: Fn(SlotValues) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    T: Any + Send + Sync + PartialEq,
{
    async fn fetch(&self, inputs: &SlotValues) -> Result<SlotValue, FetchError> {
        let value = (self.f)(inputs.clone()).await?;
        Ok(SlotValue::new(value))
    }
}

impl<F, T> std::fmt::Debug for FnFetch<F, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFetch")
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}
