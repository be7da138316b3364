//! # Post router
//!
//! Loads everything a game post needs through a [`DataGate`] and routes the
//! result to one renderer arm per post type.
//!
//! Five slots are registered:
//!
//! | slot | depends on | value |
//! |---|---|---|
//! | `username` | | `Option<String>`, via the hash-field cache |
//! | `settings` | | `GameSettings` |
//! | `postData` | | `PostRecord` |
//! | `dictionaries` | | `Vec<Dictionary>` |
//! | `userData` | `username` | `UserData` |

mod config;
pub mod memory;
mod render;
mod service;
pub mod slots;
mod types;

pub use config::{RouterConfig, USERNAME_CACHE_KEY};
pub use render::{PostRenderer, Screen, ScreenRenderer, UNKNOWN_POST_NOTICE, ViewerContext};
pub use service::{PostService, load_post};
pub use types::{
    CollectionPostData, Dictionary, DrawingPostData, GameSettings, PinnedPostData, PostId,
    PostKind, PostRecord, UserData,
};

use postgate_core::error::GateError;
use postgate_core::view::Readiness;
use postgate_runtime::DataGate;
use postgate_std::cache::HashCache;
use postgate_std::lookup::Directory;
use std::sync::Arc;

/// The services and identity a router invocation runs against.
#[derive(Clone)]
pub struct RouterContext {
    pub post_id: PostId,
    /// `None` for anonymous viewers.
    pub user_id: Option<String>,
    pub service: Arc<dyn PostService>,
    pub directory: Arc<dyn Directory>,
    pub cache: Arc<dyn HashCache>,
}

impl std::fmt::Debug for RouterContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterContext")
            .field("post_id", &self.post_id)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// One router invocation: a gate over the five post slots.
#[derive(Debug)]
pub struct PostRouter {
    gate: DataGate,
}

impl PostRouter {
    pub fn new(ctx: &RouterContext, config: &RouterConfig) -> Result<Self, GateError> {
        let gate = DataGate::builder("post-router")
            .config(config.gate.clone())
            .slots(slots::all(ctx, config))
            .build()?;
        tracing::debug!(post_id = %ctx.post_id, anonymous = ctx.user_id.is_none(), "Post router ready");
        Ok(Self { gate })
    }

    pub fn gate(&self) -> &DataGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut DataGate {
        &mut self.gate
    }

    pub async fn settle(&mut self) -> Readiness {
        self.gate.settle().await
    }

    /// Settle the gate, then render.
    pub async fn render<R: PostRenderer>(&mut self, renderer: &R) -> Result<R::Output, GateError> {
        self.gate.settle().await;
        self.view(renderer)
    }

    /// Render the gate's current state without driving it.
    ///
    /// Errors only when a slot holds a value of an unexpected type.
    pub fn view<R: PostRenderer>(&self, renderer: &R) -> Result<R::Output, GateError> {
        match self.gate.readiness() {
            Readiness::Loading => return Ok(renderer.loading()),
            Readiness::Failed => return Ok(renderer.failed(&self.gate.failures())),
            Readiness::Ready => {}
        }

        let post = self.gate.try_value::<PostRecord>(slots::POST_DATA)?;
        let viewer = ViewerContext {
            username: self
                .gate
                .try_value::<Option<String>>(slots::USERNAME)?
                .as_deref(),
            settings: self.gate.try_value::<GameSettings>(slots::SETTINGS)?,
            dictionaries: self.gate.try_value::<Vec<Dictionary>>(slots::DICTIONARIES)?,
            user_data: self.gate.try_value::<UserData>(slots::USER_DATA)?,
        };

        let output = match (post.kind(), post) {
            (Some(PostKind::Drawing), PostRecord::Drawing(data)) => renderer.drawing(data, &viewer),
            (Some(PostKind::Collection), PostRecord::Collection(data)) => {
                renderer.collection(data)
            }
            (Some(PostKind::Pinned), PostRecord::Pinned(data)) => renderer.pinned(data, &viewer),
            _ => {
                tracing::warn!(post_id = post.post_id(), post_type = post.post_type(), "Unknown post type");
                renderer.unknown(post.post_type())
            }
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests;
