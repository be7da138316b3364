//! Runtime for postgate gates.
//!
//! [`DataGate`] owns a registered slot set and drives it to completion:
//! slots launch as soon as their dependencies resolve, results are tracked
//! per slot, and changed values invalidate their dependents.

pub mod gate;

pub mod prelude {
    pub use crate::gate::{DataGate, GateBuilder};
    pub use postgate_core::prelude::*;
}

pub use gate::{DataGate, GateBuilder};
