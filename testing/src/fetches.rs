use crate::log::CallLog;
use async_trait::async_trait;
use parking_lot::Mutex;
use postgate_core::error::FetchError;
use postgate_core::fetch::Fetch;
use postgate_core::value::{SlotValue, SlotValues};
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Returns scripted values in order, repeating the last one.
pub struct RecordingFetch<T> {
    name: String,
    script: Mutex<Vec<T>>,
    log: CallLog,
}

impl<T> RecordingFetch<T>
where
    T: Any + Send + Sync + PartialEq + Clone,
{
    pub fn new(name: &str, value: T, log: &CallLog) -> Self {
        Self::sequence(name, vec![value], log)
    }

    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn sequence(name: &str, values: Vec<T>, log: &CallLog) -> Self {
        assert!(!values.is_empty(), "RecordingFetch needs at least one value");
        let mut script = values;
        script.reverse();
        Self {
            name: name.to_string(),
            script: Mutex::new(script),
            log: log.clone(),
        }
    }

    fn next_value(&self) -> T {
        let mut script = self.script.lock();
        if script.len() > 1 {
            if let Some(value) = script.pop() {
                return value;
            }
        }
        script[0].clone()
    }
}

#[async_trait]
impl<T> Fetch for RecordingFetch<T>
where
    T: Any + Send + Sync + PartialEq + Clone,
{
    async fn fetch(&self, inputs: &SlotValues) -> Result<SlotValue, FetchError> {
        self.log.record(&self.name, inputs.keys().map(str::to_string));
        Ok(SlotValue::new(self.next_value()))
    }
}

/// Test-side control for a [`GatedFetch`].
#[derive(Debug, Clone, Default)]
pub struct GateHandle {
    notify: Arc<Notify>,
    started: Arc<AtomicUsize>,
}

impl GateHandle {
    /// Let one waiting (or the next) invocation complete.
    pub fn release(&self) {
        self.notify.notify_one();
    }

    /// Number of invocations that have started.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

/// Holds each invocation until [`GateHandle::release`] is called.
pub struct GatedFetch<T> {
    value: T,
    handle: GateHandle,
}

impl<T> GatedFetch<T>
where
    T: Any + Send + Sync + PartialEq + Clone,
{
    pub fn new(value: T) -> (Self, GateHandle) {
        let handle = GateHandle::default();
        (
            Self {
                value,
                handle: handle.clone(),
            },
            handle,
        )
    }
}

#[async_trait]
impl<T> Fetch for GatedFetch<T>
where
    T: Any + Send + Sync + PartialEq + Clone,
{
    async fn fetch(&self, _inputs: &SlotValues) -> Result<SlotValue, FetchError> {
        self.handle.started.fetch_add(1, Ordering::SeqCst);
        self.handle.notify.notified().await;
        Ok(SlotValue::new(self.value.clone()))
    }
}

/// Always fails with the same message.
#[derive(Debug, Clone)]
pub struct FailingFetch {
    message: String,
    calls: Arc<AtomicUsize>,
}

impl FailingFetch {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetch for FailingFetch {
    async fn fetch(&self, _inputs: &SlotValues) -> Result<SlotValue, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FetchError::msg(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_fetch_follows_script() {
        let log = CallLog::new();
        let fetch = RecordingFetch::sequence("username", vec![1u8, 2], &log);
        let inputs = SlotValues::new();

        let first = fetch.fetch(&inputs).await.unwrap();
        let second = fetch.fetch(&inputs).await.unwrap();
        let third = fetch.fetch(&inputs).await.unwrap();

        assert_eq!(first.downcast_ref::<u8>(), Some(&1));
        assert_eq!(second.downcast_ref::<u8>(), Some(&2));
        assert_eq!(third.downcast_ref::<u8>(), Some(&2));
        assert_eq!(log.count("username"), 3);
    }

    #[tokio::test]
    async fn test_gated_fetch_waits_for_release() {
        let (fetch, handle) = GatedFetch::new("ok".to_string());
        handle.release();

        let value = fetch.fetch(&SlotValues::new()).await.unwrap();
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("ok"));
        assert_eq!(handle.started(), 1);
    }

    #[tokio::test]
    async fn test_failing_fetch_counts_calls() {
        let fetch = FailingFetch::new("boom");
        let err = fetch.fetch(&SlotValues::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(fetch.calls(), 1);
    }
}
