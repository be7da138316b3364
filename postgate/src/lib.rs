//! postgate facade crate.
//!
//! Re-exports the core, runtime, std and layout crates with a single entry
//! point, and hosts the post router: the gate applied to loading and
//! rendering a game post.

pub use postgate_core as core;
#[cfg(feature = "layout")]
pub use postgate_layout as layout;
pub use postgate_runtime as runtime;
#[cfg(feature = "std")]
pub use postgate_std as std;

#[cfg(feature = "router")]
pub mod router;

pub use postgate_core::{
    Dispatcher, FetchSlot, GateConfig, GateView, Readiness, Schematic, SlotValue, SlotValues,
};
#[cfg(feature = "layout")]
pub use postgate_layout::{GridPacker, pack};
pub use postgate_runtime::DataGate;

pub mod prelude {
    pub use postgate_core::prelude::*;
    #[cfg(feature = "layout")]
    pub use postgate_layout::{Cell, GridPacker, LayoutError, Row};
    pub use postgate_runtime::prelude::*;
    #[cfg(feature = "std")]
    pub use postgate_std::prelude::*;

    #[cfg(feature = "router")]
    pub use crate::router::{
        PostKind, PostRecord, PostRenderer, PostRouter, PostService, RouterConfig, RouterContext,
        Screen, ScreenRenderer,
    };
}
