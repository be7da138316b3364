//! Test utilities for postgate.
//!
//! * [`RecordingFetch`]: returns scripted values and records each call.
//! * [`GatedFetch`]: blocks until the test releases it, to observe a slot
//!   while it is running.
//! * [`FailingFetch`]: always fails with a fixed message.
//! * [`assert_slot_status!`] and [`assert_ready!`] for gate assertions.

mod fetches;
mod log;
mod macros;

pub use fetches::{FailingFetch, GateHandle, GatedFetch, RecordingFetch};
pub use log::{Call, CallLog};
