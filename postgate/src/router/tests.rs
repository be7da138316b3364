use super::memory::{MemoryDirectory, MemoryPostService};
use super::*;
use postgate_core::dispatch::Dispatcher;
use postgate_core::slot::SlotStatus;
use postgate_core::view::GateView;
use postgate_std::cache::MemoryCache;
use postgate_test::assert_slot_status;

const POST: &str = "t3_drawing";

fn drawing(post_id: &str, post_type: &str) -> PostRecord {
    PostRecord::Drawing(DrawingPostData {
        post_id: post_id.into(),
        post_type: post_type.into(),
        word: "lighthouse".into(),
        dictionary_name: "main".into(),
        author_username: "bob".into(),
        solves: 4,
        skips: 1,
    })
}

fn service() -> MemoryPostService {
    MemoryPostService::new()
        .with_post(drawing(POST, "drawing"))
        .with_post(drawing("t3_widget", "widget"))
        .with_post(PostRecord::Collection(CollectionPostData {
            post_id: "t3_collection".into(),
            post_type: "collection".into(),
            timeframe: "week".into(),
            drawings: vec![POST.into()],
        }))
        .with_post(PostRecord::Pinned(PinnedPostData {
            post_id: "t3_pinned".into(),
            post_type: "pinned".into(),
        }))
        .with_settings(GameSettings {
            subreddit_name: "pixelary".into(),
            selected_dictionary: "main".into(),
        })
        .with_dictionary(Dictionary {
            name: "main".into(),
            words: vec!["lighthouse".into()],
        })
        .with_user(
            "alice",
            POST,
            UserData {
                score: 12,
                solved: true,
                skipped: false,
                guess_count: 3,
            },
        )
}

struct Fixture {
    service: Arc<MemoryPostService>,
    directory: Arc<MemoryDirectory>,
    cache: Arc<MemoryCache>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            service: Arc::new(service()),
            directory: Arc::new(MemoryDirectory::new().with_user("t2_alice", "alice")),
            cache: Arc::new(MemoryCache::new()),
        }
    }

    fn router(&self, post_id: &str, user_id: Option<&str>) -> PostRouter {
        let ctx = RouterContext {
            post_id: post_id.into(),
            user_id: user_id.map(str::to_string),
            service: self.service.clone(),
            directory: self.directory.clone(),
            cache: self.cache.clone(),
        };
        PostRouter::new(&ctx, &RouterConfig::default()).unwrap()
    }
}

#[tokio::test]
async fn test_drawing_post_renders_with_viewer() {
    let fixture = Fixture::new();
    let mut router = fixture.router(POST, Some("t2_alice"));

    assert_eq!(router.view(&ScreenRenderer).unwrap(), Screen::Loading);

    let screen = router.render(&ScreenRenderer).await.unwrap();
    assert_eq!(
        screen,
        Screen::Drawing {
            post_id: POST.into(),
            word: "lighthouse".into(),
            author: "bob".into(),
            username: Some("alice".into()),
            solved: true,
            score: 12,
            dictionaries: 1,
        }
    );
    assert_eq!(fixture.directory.lookups(), 1);
    assert_eq!(
        fixture
            .cache
            .hget(USERNAME_CACHE_KEY, "t2_alice")
            .await
            .unwrap()
            .as_deref(),
        Some("alice")
    );
}

#[tokio::test]
async fn test_cache_hit_skips_directory() {
    let fixture = Fixture::new();
    fixture
        .cache
        .hset(USERNAME_CACHE_KEY, "t2_alice", "alice")
        .await
        .unwrap();

    let mut router = fixture.router(POST, Some("t2_alice"));
    router.settle().await;

    assert_eq!(fixture.directory.lookups(), 0);
    assert_eq!(
        router.gate().value::<Option<String>>(slots::USERNAME),
        Some(&Some("alice".to_string()))
    );
}

#[tokio::test]
async fn test_anonymous_viewer_skips_cache() {
    let fixture = Fixture::new();
    let mut router = fixture.router(POST, None);

    let screen = router.render(&ScreenRenderer).await.unwrap();
    assert!(matches!(
        screen,
        Screen::Drawing { username: None, solved: false, score: 0, .. }
    ));
    assert_eq!(fixture.directory.lookups(), 0);
    assert_eq!(fixture.cache.len(USERNAME_CACHE_KEY).await, 0);
    assert_eq!(fixture.service.user_calls(), 1);
}

#[tokio::test]
async fn test_unknown_post_type_renders_notice() {
    let fixture = Fixture::new();
    let mut router = fixture.router("t3_widget", Some("t2_alice"));

    let screen = router.render(&ScreenRenderer).await.unwrap();
    assert_eq!(
        screen,
        Screen::Unknown {
            post_type: "widget".into(),
            notice: UNKNOWN_POST_NOTICE.into(),
        }
    );
}

#[tokio::test]
async fn test_collection_and_pinned_routes() {
    let fixture = Fixture::new();

    let collection = fixture
        .router("t3_collection", None)
        .render(&ScreenRenderer)
        .await
        .unwrap();
    assert!(matches!(collection, Screen::Collection { ref timeframe, .. } if timeframe == "week"));

    let pinned = fixture
        .router("t3_pinned", Some("t2_alice"))
        .render(&ScreenRenderer)
        .await
        .unwrap();
    assert_eq!(
        pinned,
        Screen::Pinned {
            post_id: "t3_pinned".into(),
            username: Some("alice".into()),
            subreddit: "pixelary".into(),
            dictionary: "main".into(),
        }
    );
}

#[tokio::test]
async fn test_missing_post_renders_error_view() {
    let fixture = Fixture::new();
    let mut router = fixture.router("t3_missing", Some("t2_alice"));

    let screen = router.render(&ScreenRenderer).await.unwrap();
    assert_eq!(
        screen,
        Screen::Error {
            failures: vec!["postData: post t3_missing not found".into()],
        }
    );
    assert_slot_status!(router.gate(), slots::USER_DATA, SlotStatus::Resolved);
}

#[tokio::test]
async fn test_generic_dispatch_over_post_data() {
    let fixture = Fixture::new();
    let dispatcher: Dispatcher<PostRecord, &'static str> =
        Dispatcher::new(|_tag: &str, _post: &PostRecord| "unknown")
            .on("drawing", |_post: &PostRecord| "drawing")
            .on("collection", |_post: &PostRecord| "collection");

    let mut router = fixture.router("t3_widget", None);
    router.settle().await;
    let view = router.gate().dispatch(slots::POST_DATA, &dispatcher).unwrap();
    assert!(matches!(view, GateView::Ready("unknown")));

    let mut router = fixture.router(POST, None);
    router.settle().await;
    let view = router.gate().dispatch(slots::POST_DATA, &dispatcher).unwrap();
    assert!(matches!(view, GateView::Ready("drawing")));
}

#[tokio::test]
async fn test_username_change_reloads_user_data_once() {
    let fixture = Fixture::new();
    let mut router = fixture.router(POST, None);
    router.settle().await;
    assert_eq!(fixture.service.user_calls(), 1);

    let changed = router
        .gate_mut()
        .set_value(slots::USERNAME, Some("alice".to_string()))
        .unwrap();
    assert!(changed);
    assert!(matches!(router.view(&ScreenRenderer).unwrap(), Screen::Loading));

    let screen = router.render(&ScreenRenderer).await.unwrap();
    assert_eq!(fixture.service.user_calls(), 2);
    assert!(matches!(screen, Screen::Drawing { score: 12, .. }));
}
