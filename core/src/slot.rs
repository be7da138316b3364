use crate::error::FetchError;
use crate::fetch::{Fetch, fetch_fn};
use crate::value::SlotValues;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::future::Future;
use std::sync::Arc;

pub type SlotKey = String;

/// Lifecycle of a slot inside a gate.
///
/// `Pending -> Running -> Resolved | Failed`. Resolved and failed slots go
/// back to `Pending` only when a dependency changes or the caller asks for a
/// refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Pending,
    Running,
    Resolved,
    Failed,
}

impl SlotStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SlotStatus::Resolved | SlotStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SlotStatus::Pending => "pending",
            SlotStatus::Running => "running",
            SlotStatus::Resolved => "resolved",
            SlotStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration of one asynchronous data source.
///
/// ```rust,ignore
/// let user = FetchSlot::from_fn("userData", |inputs: SlotValues| async move {
///     let name = inputs.require::<String>("username")?;
///     Ok::<_, FetchError>(load_user(name).await?)
/// })
/// .depends_on(["username"]);
/// ```
#[derive(Clone)]
pub struct FetchSlot {
    pub key: SlotKey,
    pub depends_on: Vec<SlotKey>,
    pub fetch: Arc<dyn Fetch>,
}

impl FetchSlot {
    pub fn new(key: impl Into<SlotKey>, fetch: impl Fetch) -> Self {
        Self {
            key: key.into(),
            depends_on: Vec::new(),
            fetch: Arc::new(fetch),
        }
    }

    /// Shorthand for `FetchSlot::new(key, fetch_fn(f))`.
    pub fn from_fn<F, Fut, T>(key: impl Into<SlotKey>, f: F) -> Self
    where
        F: Fn(SlotValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
        T: Any + Send + Sync + PartialEq,
    {
        Self::new(key, fetch_fn(f))
    }

    pub fn depends_on<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<SlotKey>,
    {
        self.depends_on.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn is_independent(&self) -> bool {
        self.depends_on.is_empty()
    }
}

impl std::fmt::Debug for FetchSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchSlot")
            .field("key", &self.key)
            .field("depends_on", &self.depends_on)
            .finish()
    }
}
