use postgate_core::dispatch::Discriminant;
use serde::{Deserialize, Serialize};

pub type PostId = String;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub subreddit_name: String,
    pub selected_dictionary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    pub name: String,
    pub words: Vec<String>,
}

/// A viewer's standing on one post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub score: u64,
    pub solved: bool,
    pub skipped: bool,
    pub guess_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingPostData {
    pub post_id: PostId,
    pub post_type: String,
    pub word: String,
    pub dictionary_name: String,
    pub author_username: String,
    pub solves: u32,
    pub skips: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPostData {
    pub post_id: PostId,
    pub post_type: String,
    pub timeframe: String,
    /// Drawing post ids shown in the collection grid.
    pub drawings: Vec<PostId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedPostData {
    pub post_id: PostId,
    pub post_type: String,
}

/// Post types the router knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    Drawing,
    Collection,
    Pinned,
}

impl PostKind {
    /// `None` for tags the router does not recognise.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "drawing" => Some(PostKind::Drawing),
            "collection" => Some(PostKind::Collection),
            "pinned" => Some(PostKind::Pinned),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostKind::Drawing => "drawing",
            PostKind::Collection => "collection",
            PostKind::Pinned => "pinned",
        }
    }
}

/// The payload of the `postData` slot.
///
/// The discriminant is the raw `post_type` stored on the payload, not the
/// variant: a post with an unrecognised type is loaded as a drawing but
/// still reports its own tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostRecord {
    Drawing(DrawingPostData),
    Collection(CollectionPostData),
    Pinned(PinnedPostData),
}

impl PostRecord {
    pub fn post_id(&self) -> &str {
        match self {
            PostRecord::Drawing(data) => &data.post_id,
            PostRecord::Collection(data) => &data.post_id,
            PostRecord::Pinned(data) => &data.post_id,
        }
    }

    pub fn post_type(&self) -> &str {
        match self {
            PostRecord::Drawing(data) => &data.post_type,
            PostRecord::Collection(data) => &data.post_type,
            PostRecord::Pinned(data) => &data.post_type,
        }
    }

    pub fn kind(&self) -> Option<PostKind> {
        PostKind::parse(self.post_type())
    }
}

impl Discriminant for PostRecord {
    fn discriminant(&self) -> &str {
        self.post_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_stored_tag() {
        let record = PostRecord::Drawing(DrawingPostData {
            post_id: "t3_1".into(),
            post_type: "widget".into(),
            word: "cat".into(),
            dictionary_name: "main".into(),
            author_username: "alice".into(),
            solves: 0,
            skips: 0,
        });
        assert_eq!(record.kind(), None);
        assert_eq!(record.discriminant(), "widget");
        assert_eq!(PostKind::parse("pinned"), Some(PostKind::Pinned));
        assert_eq!(PostKind::Collection.as_str(), "collection");
    }

    #[test]
    fn test_user_data_wire_names() {
        let json = serde_json::to_value(UserData {
            score: 3,
            guess_count: 2,
            ..UserData::default()
        })
        .unwrap();
        assert_eq!(json["guessCount"], 2);
        assert_eq!(json["solved"], false);
    }
}
