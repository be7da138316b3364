use async_trait::async_trait;
use postgate_core::error::FetchError;
use postgate_core::fetch::Fetch;
use postgate_core::slot::SlotKey;
use postgate_core::value::{SlotValue, SlotValues};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::marker::PhantomData;
use std::time::Duration;

/// Resolves to a fixed value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstFetch<T> {
    pub value: T,
}

impl<T> ConstFetch<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

#[async_trait]
impl<T> Fetch for ConstFetch<T>
where
    T: Any + Send + Sync + PartialEq + Clone,
{
    async fn fetch(&self, _inputs: &SlotValues) -> Result<SlotValue, FetchError> {
        Ok(SlotValue::new(self.value.clone()))
    }
}

/// Resolves to a fixed value after a delay. Handy for simulating slow
/// services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayFetch<T> {
    pub duration_ms: u64,
    pub value: T,
}

impl<T> DelayFetch<T> {
    pub fn new(duration_ms: u64, value: T) -> Self {
        Self { duration_ms, value }
    }
}

#[async_trait]
impl<T> Fetch for DelayFetch<T>
where
    T: Any + Send + Sync + PartialEq + Clone,
{
    async fn fetch(&self, _inputs: &SlotValues) -> Result<SlotValue, FetchError> {
        tokio::time::sleep(Duration::from_millis(self.duration_ms)).await;
        Ok(SlotValue::new(self.value.clone()))
    }
}

/// Derives a value from one dependency.
///
/// ```rust,ignore
/// FetchSlot::new("nameLength", MapFetch::new("username", |name: &String| name.len()))
///     .depends_on(["username"])
/// ```
pub struct MapFetch<In, Out, F> {
    input: SlotKey,
    f: F,
    _marker: PhantomData<fn(&In) -> Out>,
}

impl<In, Out, F> MapFetch<In, Out, F> {
    pub fn new(input: impl Into<SlotKey>, f: F) -> Self {
        Self {
            input: input.into(),
            f,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<In, Out, F> Fetch for MapFetch<In, Out, F>
where
    In: Any + Send + Sync,
    Out: Any + Send + Sync + PartialEq,
    F: Fn(&In) -> Out + Send + Sync + 'static,
{
    async fn fetch(&self, inputs: &SlotValues) -> Result<SlotValue, FetchError> {
        let input = inputs.require::<In>(&self.input)?;
        Ok(SlotValue::new((self.f)(input)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_const_fetch() {
        let value = ConstFetch::new(7u8).fetch(&SlotValues::new()).await.unwrap();
        assert_eq!(value.downcast_ref::<u8>(), Some(&7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_fetch_waits() {
        let start = tokio::time::Instant::now();
        let value = DelayFetch::new(250, "late".to_string())
            .fetch(&SlotValues::new())
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("late"));
    }

    #[tokio::test]
    async fn test_map_fetch_reads_dependency() {
        let fetch = MapFetch::new("username", |name: &String| name.len());

        let mut inputs = SlotValues::new();
        assert!(matches!(
            fetch.fetch(&inputs).await,
            Err(FetchError::MissingInput(key)) if key == "username"
        ));

        inputs.insert("username", SlotValue::new("alice".to_string()));
        let value = fetch.fetch(&inputs).await.unwrap();
        assert_eq!(value.downcast_ref::<usize>(), Some(&5));
    }
}
