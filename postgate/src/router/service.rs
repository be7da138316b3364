use super::types::{
    CollectionPostData, Dictionary, DrawingPostData, GameSettings, PinnedPostData, PostKind,
    PostRecord, UserData,
};
use async_trait::async_trait;

/// Backend for post data.
#[async_trait]
pub trait PostService: Send + Sync {
    /// Raw post type tag as stored for the post.
    async fn get_post_type(&self, post_id: &str) -> anyhow::Result<String>;

    async fn get_game_settings(&self) -> anyhow::Result<GameSettings>;

    async fn get_collection_post(&self, post_id: &str) -> anyhow::Result<CollectionPostData>;

    async fn get_pinned_post(&self, post_id: &str) -> anyhow::Result<PinnedPostData>;

    async fn get_drawing_post(&self, post_id: &str) -> anyhow::Result<DrawingPostData>;

    async fn get_active_dictionaries(&self) -> anyhow::Result<Vec<Dictionary>>;

    /// `username` is `None` for anonymous viewers.
    async fn get_user(&self, username: Option<&str>, post_id: &str) -> anyhow::Result<UserData>;
}

/// Read the post type, then load the matching record.
///
/// Unrecognised types load through the drawing loader.
pub async fn load_post(service: &dyn PostService, post_id: &str) -> anyhow::Result<PostRecord> {
    let post_type = service.get_post_type(post_id).await?;
    let record = match PostKind::parse(&post_type) {
        Some(PostKind::Collection) => {
            PostRecord::Collection(service.get_collection_post(post_id).await?)
        }
        Some(PostKind::Pinned) => PostRecord::Pinned(service.get_pinned_post(post_id).await?),
        Some(PostKind::Drawing) | None => {
            PostRecord::Drawing(service.get_drawing_post(post_id).await?)
        }
    };
    Ok(record)
}
