use super::types::{
    CollectionPostData, Dictionary, DrawingPostData, GameSettings, PinnedPostData, UserData,
};
use postgate_core::view::SlotFailure;
use serde::{Deserialize, Serialize};

/// Notice shown for a post whose type the router does not recognise.
pub const UNKNOWN_POST_NOTICE: &str = "Error: Unknown post type";

/// Everything the drawing and pinned screens receive besides the post.
#[derive(Debug, Clone, Copy)]
pub struct ViewerContext<'a> {
    pub username: Option<&'a str>,
    pub settings: &'a GameSettings,
    pub dictionaries: &'a [Dictionary],
    pub user_data: &'a UserData,
}

/// One arm per router outcome.
pub trait PostRenderer {
    type Output;

    fn loading(&self) -> Self::Output;

    fn failed(&self, failures: &[SlotFailure]) -> Self::Output;

    fn drawing(&self, post: &DrawingPostData, viewer: &ViewerContext<'_>) -> Self::Output;

    fn collection(&self, post: &CollectionPostData) -> Self::Output;

    fn pinned(&self, post: &PinnedPostData, viewer: &ViewerContext<'_>) -> Self::Output;

    /// Fallback for any post type without a dedicated arm.
    fn unknown(&self, post_type: &str) -> Self::Output;
}

/// A renderer-independent description of what to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Loading,
    Error {
        failures: Vec<String>,
    },
    Drawing {
        post_id: String,
        word: String,
        author: String,
        username: Option<String>,
        solved: bool,
        score: u64,
        dictionaries: usize,
    },
    Collection {
        post_id: String,
        timeframe: String,
        drawings: Vec<String>,
    },
    Pinned {
        post_id: String,
        username: Option<String>,
        subreddit: String,
        dictionary: String,
    },
    Unknown {
        post_type: String,
        notice: String,
    },
}

/// Renders to [`Screen`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenRenderer;

impl PostRenderer for ScreenRenderer {
    type Output = Screen;

    fn loading(&self) -> Screen {
        Screen::Loading
    }

    fn failed(&self, failures: &[SlotFailure]) -> Screen {
        Screen::Error {
            failures: failures
                .iter()
                .map(|failure| format!("{}: {}", failure.key, failure.error))
                .collect(),
        }
    }

    fn drawing(&self, post: &DrawingPostData, viewer: &ViewerContext<'_>) -> Screen {
        Screen::Drawing {
            post_id: post.post_id.clone(),
            word: post.word.clone(),
            author: post.author_username.clone(),
            username: viewer.username.map(str::to_string),
            solved: viewer.user_data.solved,
            score: viewer.user_data.score,
            dictionaries: viewer.dictionaries.len(),
        }
    }

    fn collection(&self, post: &CollectionPostData) -> Screen {
        Screen::Collection {
            post_id: post.post_id.clone(),
            timeframe: post.timeframe.clone(),
            drawings: post.drawings.clone(),
        }
    }

    fn pinned(&self, post: &PinnedPostData, viewer: &ViewerContext<'_>) -> Screen {
        Screen::Pinned {
            post_id: post.post_id.clone(),
            username: viewer.username.map(str::to_string),
            subreddit: viewer.settings.subreddit_name.clone(),
            dictionary: viewer.settings.selected_dictionary.clone(),
        }
    }

    fn unknown(&self, post_type: &str) -> Screen {
        Screen::Unknown {
            post_type: post_type.to_string(),
            notice: UNKNOWN_POST_NOTICE.to_string(),
        }
    }
}
