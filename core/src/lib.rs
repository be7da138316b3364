//! Protocol-agnostic core of postgate.
//!
//! Declarations and contracts shared by the runtime and the applications
//! built on it: slots, type-erased values, the `Fetch` contract, the
//! dependency schematic, dispatch, views, the timeline and configuration.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod schematic;
pub mod slot;
pub mod telemetry;
pub mod timeline;
pub mod value;
pub mod view;

pub use config::{ChangeDetection, GateConfig};
pub use dispatch::{Discriminant, Dispatcher};
pub use error::{ConfigError, ConfigurationError, FetchError, GateError};
pub use fetch::{Fetch, FnFetch, fetch_fn};
pub use schematic::Schematic;
pub use slot::{FetchSlot, SlotKey, SlotStatus};
pub use telemetry::Traced;
pub use timeline::{Timeline, TimelineEvent};
pub use value::{SlotValue, SlotValues};
pub use view::{GateView, Readiness, SlotFailure};

pub mod prelude {
    pub use crate::config::{ChangeDetection, GateConfig};
    pub use crate::dispatch::{Discriminant, Dispatcher};
    pub use crate::error::{ConfigurationError, FetchError, GateError};
    pub use crate::fetch::{Fetch, fetch_fn};
    pub use crate::slot::{FetchSlot, SlotKey, SlotStatus};
    pub use crate::value::{SlotValue, SlotValues};
    pub use crate::view::{GateView, Readiness, SlotFailure};
}
