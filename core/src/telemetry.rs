//! # Telemetry: Observability Decorators
//!
//! Wraps any [`Fetch`] with a tracing span and outcome logging.

use crate::error::FetchError;
use crate::fetch::Fetch;
use crate::value::{SlotValue, SlotValues};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{Instrument, info_span};

/// A wrapper fetch that adds tracing to any inner fetch.
#[derive(Clone)]
pub struct Traced<F> {
    inner: F,
    name: String,
}

impl<F> Traced<F> {
    pub fn new(inner: F, name: &str) -> Self {
        Self {
            inner,
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl<F> Fetch for Traced<F>
where
    F: Fetch,
{
    async fn fetch(&self, inputs: &SlotValues) -> Result<SlotValue, FetchError> {
        let span = info_span!(
            "Fetch",
            postgate.slot = %self.name,
            postgate.inputs = inputs.len()
        );

        async move {
            tracing::debug!("Entering fetch");
            let start = std::time::Instant::now();

            let result = self.inner.fetch(inputs).await;

            let duration = start.elapsed();
            match &result {
                Ok(value) => {
                    tracing::info!(value_type = value.type_name(), ?duration, "Fetch resolved");
                }
                Err(e) => {
                    tracing::error!(error = %e, ?duration, "Fetch failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Lets a shared fetch be wrapped again, e.g. `Traced::new(slot.fetch.clone(), ..)`.
#[async_trait]
impl Fetch for Arc<dyn Fetch> {
    async fn fetch(&self, inputs: &SlotValues) -> Result<SlotValue, FetchError> {
        (**self).fetch(inputs).await
    }
}
