//! # DataGate: Dependency-Ordered Fetch Coordination
//!
//! The `DataGate` is the **runtime** of a slot set. It owns every in-flight
//! fetch, launches slots as soon as their dependencies resolve, and answers
//! one question for the caller: is everything ready, and if so, what should
//! be rendered?
//!
//! ## Evaluation model
//!
//! * **One owner**: the gate is a plain state machine driven by its caller,
//!   either with [`DataGate::tick`] (non-blocking) or [`DataGate::settle`]
//!   (async, runs until nothing more can happen).
//! * **Passes**: each launch pass starts every pending slot whose
//!   dependencies are resolved at that moment, together.
//! * **No threads**: in-flight fetches live in a `FuturesUnordered` polled
//!   from the caller's task. Dropping the gate abandons them.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use postgate_core::config::GateConfig;
use postgate_core::dispatch::{Discriminant, Dispatcher};
use postgate_core::error::{FetchError, GateError};
use postgate_core::fetch::Fetch;
use postgate_core::schematic::Schematic;
use postgate_core::slot::{FetchSlot, SlotKey, SlotStatus};
use postgate_core::telemetry::Traced;
use postgate_core::timeline::{Timeline, TimelineEvent, now_millis};
use postgate_core::value::{SlotValue, SlotValues};
use postgate_core::view::{GateView, Readiness, SlotFailure};
use std::any::{Any, type_name};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

struct SlotEntry {
    key: SlotKey,
    fetch: Arc<dyn Fetch>,
    dependencies: Vec<usize>,
    dependents: Vec<usize>,
    status: SlotStatus,
    value: Option<SlotValue>,
    /// Last resolved value, kept across resets for change detection.
    last_value: Option<SlotValue>,
    error: Option<FetchError>,
    /// A dependency changed while this slot was running.
    rerun: bool,
    runs: u64,
}

struct Completion {
    index: usize,
    result: Result<SlotValue, FetchError>,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Coordinates a set of [`FetchSlot`]s to completion.
///
/// ## Example
///
/// ```rust,ignore
/// let mut gate = DataGate::builder("post-router")
///     .slot(FetchSlot::from_fn("username", load_username))
///     .slot(FetchSlot::from_fn("userData", load_user).depends_on(["username"]))
///     .build()?;
///
/// match gate.settle().await {
///     Readiness::Ready => render(gate.values()),
///     Readiness::Failed => render_error(gate.failures()),
///     Readiness::Loading => render_spinner(),
/// }
/// ```
pub struct DataGate {
    id: Uuid,
    label: String,
    config: GateConfig,
    schematic: Schematic,
    /// Slots in topological order.
    slots: Vec<SlotEntry>,
    index: HashMap<SlotKey, usize>,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
    pass: u64,
    timeline: Timeline,
}

impl DataGate {
    /// Register a slot set with the default configuration.
    pub fn register(label: &str, slots: Vec<FetchSlot>) -> Result<Self, GateError> {
        Self::register_with(label, slots, GateConfig::default())
    }

    /// Register a slot set.
    ///
    /// Fails with [`GateError::Configuration`] on duplicate keys, undeclared
    /// dependencies or dependency cycles. Nothing is launched yet.
    pub fn register_with(
        label: &str,
        slots: Vec<FetchSlot>,
        config: GateConfig,
    ) -> Result<Self, GateError> {
        let schematic = Schematic::from_slots(label, &slots)?;
        let order = schematic.topological_order()?;

        let index: HashMap<SlotKey, usize> = order
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), i))
            .collect();

        let mut declared: HashMap<SlotKey, FetchSlot> = slots
            .into_iter()
            .map(|slot| (slot.key.clone(), slot))
            .collect();

        let mut entries: Vec<SlotEntry> = Vec::with_capacity(order.len());
        for key in &order {
            let Some(slot) = declared.remove(key) else {
                continue;
            };
            let mut dependencies: Vec<usize> = slot
                .depends_on
                .iter()
                .filter_map(|dep| index.get(dep).copied())
                .collect();
            dependencies.sort_unstable();
            dependencies.dedup();

            let fetch: Arc<dyn Fetch> = if config.trace_fetches {
                Arc::new(Traced::new(slot.fetch, &slot.key))
            } else {
                slot.fetch
            };

            entries.push(SlotEntry {
                key: slot.key,
                fetch,
                dependencies,
                dependents: Vec::new(),
                status: SlotStatus::Pending,
                value: None,
                last_value: None,
                error: None,
                rerun: false,
                runs: 0,
            });
        }

        for i in 0..entries.len() {
            for dep in entries[i].dependencies.clone() {
                entries[dep].dependents.push(i);
            }
        }

        tracing::debug!(
            gate = %label,
            slots = entries.len(),
            edges = schematic.edges.len(),
            "Registered gate"
        );

        Ok(Self {
            id: Uuid::new_v4(),
            label: label.to_string(),
            config,
            schematic,
            slots: entries,
            index,
            in_flight: FuturesUnordered::new(),
            pass: 0,
            timeline: Timeline::new(),
        })
    }

    pub fn builder(label: &str) -> GateBuilder {
        GateBuilder::new(label)
    }

    // ============== Evaluation ==============

    /// One non-blocking evaluation step.
    ///
    /// Absorbs every fetch that has already completed, then launches every
    /// pending slot whose dependencies are resolved. Returns the number of
    /// fetches launched.
    pub fn tick(&mut self) -> usize {
        self.absorb_ready();
        self.launch_eligible()
    }

    /// Drive the gate until nothing is running and nothing is eligible.
    ///
    /// Returns `Ready` when every slot resolved, `Failed` when some slot
    /// failed (its dependents are left pending), and `Loading` only if the
    /// caller overrode values in a way that leaves slots blocked.
    pub async fn settle(&mut self) -> Readiness {
        let span = tracing::info_span!(
            "Gate",
            postgate.gate = %self.label,
            postgate.id = %self.id
        );

        async {
            loop {
                self.launch_eligible();
                match self.in_flight.next().await {
                    Some(completion) => {
                        self.complete(completion);
                        self.absorb_ready();
                    }
                    None => break,
                }
            }
        }
        .instrument(span)
        .await;

        let readiness = self.readiness();
        tracing::info!(gate = %self.label, passes = self.pass, ?readiness, "Gate settled");
        readiness
    }

    fn absorb_ready(&mut self) {
        while let Some(Some(completion)) = self.in_flight.next().now_or_never() {
            self.complete(completion);
        }
    }

    fn is_eligible(&self, index: usize) -> bool {
        let entry = &self.slots[index];
        entry.status == SlotStatus::Pending
            && entry
                .dependencies
                .iter()
                .all(|&dep| self.slots[dep].status == SlotStatus::Resolved)
    }

    fn launch_eligible(&mut self) -> usize {
        let eligible: Vec<usize> = (0..self.slots.len())
            .filter(|&i| self.is_eligible(i))
            .collect();
        if eligible.is_empty() {
            return 0;
        }

        self.pass += 1;
        for &index in &eligible {
            self.launch(index);
        }
        eligible.len()
    }

    fn launch(&mut self, index: usize) {
        let mut inputs = SlotValues::new();
        for &dep in &self.slots[index].dependencies {
            let dependency = &self.slots[dep];
            if let Some(value) = &dependency.value {
                inputs.insert(dependency.key.clone(), value.clone());
            }
        }

        let pass = self.pass;
        let catch_panics = self.config.catch_panics;
        let entry = &mut self.slots[index];
        entry.status = SlotStatus::Running;
        entry.error = None;
        entry.runs += 1;

        let key = entry.key.clone();
        let fetch = Arc::clone(&entry.fetch);
        tracing::debug!(slot = %key, pass, run = entry.runs, "Launching fetch");

        let span = tracing::info_span!("Slot", postgate.slot = %key, postgate.pass = pass);
        let future = async move {
            let call = fetch.fetch(&inputs);
            let result = if catch_panics {
                match AssertUnwindSafe(call).catch_unwind().await {
                    Ok(result) => result,
                    Err(payload) => Err(FetchError::Panicked(panic_message(payload.as_ref()))),
                }
            } else {
                call.await
            };
            Completion { index, result }
        }
        .instrument(span)
        .boxed();

        self.in_flight.push(future);
        self.timeline.push(TimelineEvent::Launched {
            key,
            pass,
            timestamp: now_millis(),
        });
    }

    fn complete(&mut self, completion: Completion) {
        let Completion { index, result } = completion;
        let pass = self.pass;
        let mode = self.config.change_detection;
        let entry = &mut self.slots[index];

        if entry.rerun {
            entry.rerun = false;
            entry.status = SlotStatus::Pending;
            tracing::debug!(slot = %entry.key, "Dropping result computed from stale inputs");
            self.timeline.push(TimelineEvent::Discarded {
                key: entry.key.clone(),
                pass,
                timestamp: now_millis(),
            });
            return;
        }

        match result {
            Ok(value) => {
                let changed = entry
                    .last_value
                    .as_ref()
                    .is_none_or(|previous| previous.changed(&value, mode));
                entry.value = Some(value.clone());
                entry.last_value = Some(value);
                entry.status = SlotStatus::Resolved;
                tracing::debug!(slot = %entry.key, changed, "Fetch resolved");
                self.timeline.push(TimelineEvent::Resolved {
                    key: entry.key.clone(),
                    pass,
                    changed,
                    timestamp: now_millis(),
                });
                if changed {
                    self.invalidate_dependents(index);
                }
            }
            Err(error) => {
                tracing::warn!(slot = %entry.key, error = %error, "Fetch failed");
                self.timeline.push(TimelineEvent::Failed {
                    key: entry.key.clone(),
                    pass,
                    error: error.to_string(),
                    timestamp: now_millis(),
                });
                entry.value = None;
                entry.error = Some(error);
                entry.status = SlotStatus::Failed;
            }
        }
    }

    /// Reset every settled dependent of `index`; flag running ones for
    /// exactly one re-run.
    fn invalidate_dependents(&mut self, index: usize) {
        let cause = self.slots[index].key.clone();
        let pass = self.pass;
        for dependent in self.slots[index].dependents.clone() {
            let entry = &mut self.slots[dependent];
            match entry.status {
                SlotStatus::Resolved | SlotStatus::Failed => {
                    entry.status = SlotStatus::Pending;
                    entry.value = None;
                    entry.error = None;
                    tracing::debug!(slot = %entry.key, cause = %cause, "Dependency changed, resetting slot");
                    self.timeline.push(TimelineEvent::Reset {
                        key: entry.key.clone(),
                        cause: cause.clone(),
                        pass,
                        timestamp: now_millis(),
                    });
                }
                SlotStatus::Running => entry.rerun = true,
                SlotStatus::Pending => {}
            }
        }
    }

    // ============== Caller Control ==============

    /// Ask for `key` to run again.
    ///
    /// A settled slot goes back to pending. A running slot keeps running and
    /// is re-run once after it completes; a second fetch is never started
    /// alongside the first.
    pub fn refresh(&mut self, key: &str) -> Result<(), GateError> {
        let index = self.position(key)?;
        let entry = &mut self.slots[index];
        match entry.status {
            SlotStatus::Running => entry.rerun = true,
            SlotStatus::Resolved | SlotStatus::Failed => {
                entry.status = SlotStatus::Pending;
                entry.value = None;
                entry.error = None;
            }
            SlotStatus::Pending => {}
        }
        tracing::debug!(slot = %key, "Refresh requested");
        Ok(())
    }

    /// Supply a resolved value for `key` from outside, as if its fetch had
    /// returned it.
    ///
    /// Dependents are reset when the value changed. Returns whether it did.
    pub fn set_value<T>(&mut self, key: &str, value: T) -> Result<bool, GateError>
    where
        T: Any + Send + Sync + PartialEq,
    {
        let index = self.position(key)?;
        let mode = self.config.change_detection;
        let pass = self.pass;
        let entry = &mut self.slots[index];
        if entry.status == SlotStatus::Running {
            return Err(GateError::SlotBusy(key.to_string()));
        }

        let value = SlotValue::new(value);
        let changed = entry
            .last_value
            .as_ref()
            .is_none_or(|previous| previous.changed(&value, mode));
        entry.value = Some(value.clone());
        entry.last_value = Some(value);
        entry.error = None;
        entry.status = SlotStatus::Resolved;
        self.timeline.push(TimelineEvent::Overridden {
            key: key.to_string(),
            changed,
            pass,
            timestamp: now_millis(),
        });

        if changed {
            self.invalidate_dependents(index);
        }
        Ok(changed)
    }

    // ============== Queries ==============

    fn position(&self, key: &str) -> Result<usize, GateError> {
        self.index
            .get(key)
            .copied()
            .ok_or_else(|| GateError::UnknownSlot(key.to_string()))
    }

    pub fn readiness(&self) -> Readiness {
        if self.has_failed() {
            Readiness::Failed
        } else if self.is_ready() {
            Readiness::Ready
        } else {
            Readiness::Loading
        }
    }

    /// Every slot resolved.
    pub fn is_ready(&self) -> bool {
        self.slots
            .iter()
            .all(|entry| entry.status == SlotStatus::Resolved)
    }

    pub fn has_failed(&self) -> bool {
        self.slots
            .iter()
            .any(|entry| entry.status == SlotStatus::Failed)
    }

    /// Nothing running and nothing eligible to launch.
    pub fn is_settled(&self) -> bool {
        self.in_flight.is_empty() && !(0..self.slots.len()).any(|i| self.is_eligible(i))
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn status(&self, key: &str) -> Option<SlotStatus> {
        self.index.get(key).map(|&i| self.slots[i].status)
    }

    /// Number of times the fetch for `key` has been invoked.
    pub fn runs(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|&i| self.slots[i].runs)
    }

    pub fn error(&self, key: &str) -> Option<&FetchError> {
        self.index
            .get(key)
            .and_then(|&i| self.slots[i].error.as_ref())
    }

    /// Typed read of a resolved value.
    pub fn value<T: 'static>(&self, key: &str) -> Option<&T> {
        self.index
            .get(key)
            .and_then(|&i| self.slots[i].value.as_ref())
            .and_then(|value| value.downcast_ref())
    }

    /// Typed read that explains why no value is available.
    pub fn try_value<T: 'static>(&self, key: &str) -> Result<&T, GateError> {
        let index = self.position(key)?;
        let value = self.slots[index]
            .value
            .as_ref()
            .ok_or_else(|| GateError::NotResolved(key.to_string()))?;
        value.downcast_ref().ok_or_else(|| GateError::TypeMismatch {
            slot: key.to_string(),
            expected: type_name::<T>(),
            found: value.type_name(),
        })
    }

    /// All currently resolved values.
    pub fn values(&self) -> SlotValues {
        let mut values = SlotValues::new();
        for entry in &self.slots {
            if let Some(value) = &entry.value {
                values.insert(entry.key.clone(), value.clone());
            }
        }
        values
    }

    pub fn failures(&self) -> Vec<SlotFailure> {
        self.slots
            .iter()
            .filter_map(|entry| {
                entry.error.as_ref().map(|error| SlotFailure {
                    key: entry.key.clone(),
                    error: error.clone(),
                })
            })
            .collect()
    }

    /// The gate as something to render.
    pub fn view(&self) -> GateView<SlotValues> {
        match self.readiness() {
            Readiness::Failed => GateView::Failed(self.failures()),
            Readiness::Loading => GateView::Loading,
            Readiness::Ready => GateView::Ready(self.values()),
        }
    }

    /// Route the payload of slot `key` through `dispatcher` once ready.
    ///
    /// Loading and failed gates produce the matching [`GateView`]; an
    /// unrecognised discriminant goes to the dispatcher's fallback. Only
    /// programmer errors are returned as `Err`: an unknown slot key, or a
    /// payload that is not a `P`.
    pub fn dispatch<P, R>(
        &self,
        key: &str,
        dispatcher: &Dispatcher<P, R>,
    ) -> Result<GateView<R>, GateError>
    where
        P: Discriminant + 'static,
    {
        self.position(key)?;
        match self.readiness() {
            Readiness::Failed => Ok(GateView::Failed(self.failures())),
            Readiness::Loading => Ok(GateView::Loading),
            Readiness::Ready => {
                let payload = self.try_value::<P>(key)?;
                Ok(GateView::Ready(dispatcher.dispatch(payload)))
            }
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Number of launch passes performed so far.
    pub fn pass(&self) -> u64 {
        self.pass
    }

    /// Slot keys, dependencies first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|entry| entry.key.as_str())
    }

    pub fn schematic(&self) -> &Schematic {
        &self.schematic
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}

impl std::fmt::Debug for DataGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statuses: Vec<(&str, SlotStatus)> = self
            .slots
            .iter()
            .map(|entry| (entry.key.as_str(), entry.status))
            .collect();
        f.debug_struct("DataGate")
            .field("label", &self.label)
            .field("slots", &statuses)
            .field("in_flight", &self.in_flight.len())
            .field("pass", &self.pass)
            .finish()
    }
}

/// Collects slots and configuration for a [`DataGate`].
#[derive(Debug)]
pub struct GateBuilder {
    label: String,
    slots: Vec<FetchSlot>,
    config: GateConfig,
}

impl GateBuilder {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            slots: Vec::new(),
            config: GateConfig::default(),
        }
    }

    pub fn slot(mut self, slot: FetchSlot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn slots(mut self, slots: impl IntoIterator<Item = FetchSlot>) -> Self {
        self.slots.extend(slots);
        self
    }

    pub fn config(mut self, config: GateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<DataGate, GateError> {
        DataGate::register_with(&self.label, self.slots, self.config)
    }
}
