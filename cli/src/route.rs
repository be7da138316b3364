use anyhow::{Context, Result};
use postgate::router::{PostRouter, RouterConfig, Screen, ScreenRenderer};

use crate::demo;

async fn route(post_id: &str, user_id: Option<&str>, config: &RouterConfig) -> Result<Screen> {
    let ctx = demo::context(post_id, user_id);
    let mut router = PostRouter::new(&ctx, config).context("Failed to build post router")?;
    let screen = router
        .render(&ScreenRenderer)
        .await
        .context("Failed to render post")?;
    tracing::info!(post_id, passes = router.gate().pass(), "Routed post");
    Ok(screen)
}

pub fn run_route_command(
    post_id: &str,
    user_id: Option<&str>,
    config: &RouterConfig,
    pretty: bool,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;
    let screen = runtime.block_on(route(post_id, user_id, config))?;

    let json = if pretty {
        serde_json::to_string_pretty(&screen)?
    } else {
        serde_json::to_string(&screen)?
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_posts_route() {
        let config = RouterConfig::default();

        let screen = route(demo::DRAWING_POST, Some(demo::DEMO_USER), &config)
            .await
            .unwrap();
        assert!(matches!(screen, Screen::Drawing { score: 12, .. }));

        let screen = route("t3_widget", None, &config).await.unwrap();
        assert!(matches!(screen, Screen::Unknown { .. }));

        let screen = route("t3_nope", None, &config).await.unwrap();
        assert!(matches!(screen, Screen::Error { .. }));
    }
}
