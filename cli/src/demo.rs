//! Demo data for the CLI.

use postgate::router::memory::{MemoryDirectory, MemoryPostService};
use postgate::router::{
    CollectionPostData, Dictionary, DrawingPostData, GameSettings, PinnedPostData, PostRecord,
    RouterContext, UserData,
};
use postgate::std::cache::MemoryCache;
use std::sync::Arc;

pub const DRAWING_POST: &str = "t3_drawing";
pub const DEMO_USER: &str = "t2_alice";

fn drawing(post_id: &str, post_type: &str, word: &str) -> PostRecord {
    PostRecord::Drawing(DrawingPostData {
        post_id: post_id.to_string(),
        post_type: post_type.to_string(),
        word: word.to_string(),
        dictionary_name: "main".to_string(),
        author_username: "bob".to_string(),
        solves: 7,
        skips: 2,
    })
}

pub fn service() -> MemoryPostService {
    MemoryPostService::new()
        .with_post(drawing(DRAWING_POST, "drawing", "lighthouse"))
        .with_post(drawing("t3_widget", "widget", "kite"))
        .with_post(PostRecord::Collection(CollectionPostData {
            post_id: "t3_collection".to_string(),
            post_type: "collection".to_string(),
            timeframe: "week".to_string(),
            drawings: vec![DRAWING_POST.to_string(), "t3_widget".to_string()],
        }))
        .with_post(PostRecord::Pinned(PinnedPostData {
            post_id: "t3_pinned".to_string(),
            post_type: "pinned".to_string(),
        }))
        .with_settings(GameSettings {
            subreddit_name: "pixelary".to_string(),
            selected_dictionary: "main".to_string(),
        })
        .with_dictionary(Dictionary {
            name: "main".to_string(),
            words: ["lighthouse", "kite", "anchor"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .with_user(
            "alice",
            DRAWING_POST,
            UserData {
                score: 12,
                solved: true,
                skipped: false,
                guess_count: 3,
            },
        )
}

pub fn context(post_id: &str, user_id: Option<&str>) -> RouterContext {
    RouterContext {
        post_id: post_id.to_string(),
        user_id: user_id.map(str::to_string),
        service: Arc::new(service()),
        directory: Arc::new(MemoryDirectory::new().with_user(DEMO_USER, "alice")),
        cache: Arc::new(MemoryCache::new()),
    }
}
