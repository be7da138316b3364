//! Slot constructors for the post router's gate.

use super::RouterContext;
use super::config::RouterConfig;
use super::service::load_post;
use postgate_core::error::FetchError;
use postgate_core::slot::FetchSlot;
use postgate_core::value::SlotValues;
use postgate_std::lookup::CachedLookup;
use std::sync::Arc;

pub const USERNAME: &str = "username";
pub const SETTINGS: &str = "settings";
pub const POST_DATA: &str = "postData";
pub const DICTIONARIES: &str = "dictionaries";
pub const USER_DATA: &str = "userData";

/// Resolves to `Option<String>`.
pub fn username(ctx: &RouterContext, config: &RouterConfig) -> FetchSlot {
    FetchSlot::new(
        USERNAME,
        CachedLookup::new(
            Arc::clone(&ctx.cache),
            Arc::clone(&ctx.directory),
            config.username_cache_key.clone(),
            ctx.user_id.clone(),
        ),
    )
}

/// Resolves to `GameSettings`.
pub fn settings(ctx: &RouterContext) -> FetchSlot {
    let service = Arc::clone(&ctx.service);
    FetchSlot::from_fn(SETTINGS, move |_inputs: SlotValues| {
        let service = Arc::clone(&service);
        async move { Ok::<_, FetchError>(service.get_game_settings().await?) }
    })
}

/// Resolves to `PostRecord`.
pub fn post_data(ctx: &RouterContext) -> FetchSlot {
    let service = Arc::clone(&ctx.service);
    let post_id = ctx.post_id.clone();
    FetchSlot::from_fn(POST_DATA, move |_inputs: SlotValues| {
        let service = Arc::clone(&service);
        let post_id = post_id.clone();
        async move { Ok::<_, FetchError>(load_post(service.as_ref(), &post_id).await?) }
    })
}

/// Resolves to `Vec<Dictionary>`.
pub fn dictionaries(ctx: &RouterContext) -> FetchSlot {
    let service = Arc::clone(&ctx.service);
    FetchSlot::from_fn(DICTIONARIES, move |_inputs: SlotValues| {
        let service = Arc::clone(&service);
        async move { Ok::<_, FetchError>(service.get_active_dictionaries().await?) }
    })
}

/// Resolves to `UserData`. Waits for `username`.
pub fn user_data(ctx: &RouterContext) -> FetchSlot {
    let service = Arc::clone(&ctx.service);
    let post_id = ctx.post_id.clone();
    FetchSlot::from_fn(USER_DATA, move |inputs: SlotValues| {
        let service = Arc::clone(&service);
        let post_id = post_id.clone();
        async move {
            let username = inputs.require::<Option<String>>(USERNAME)?;
            Ok::<_, FetchError>(service.get_user(username.as_deref(), &post_id).await?)
        }
    })
    .depends_on([USERNAME])
}

/// All five slots, in declaration order.
pub fn all(ctx: &RouterContext, config: &RouterConfig) -> Vec<FetchSlot> {
    vec![
        username(ctx, config),
        settings(ctx),
        post_data(ctx),
        dictionaries(ctx),
        user_data(ctx),
    ]
}
