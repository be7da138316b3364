//! In-memory services for demos and tests.

use super::service::PostService;
use super::types::{
    CollectionPostData, Dictionary, DrawingPostData, GameSettings, PinnedPostData, PostRecord,
    UserData,
};
use anyhow::Context;
use async_trait::async_trait;
use postgate_std::lookup::Directory;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A [`PostService`] over fixed data.
///
/// Posts are stored with their raw type tag, which may be one the router
/// does not recognise.
#[derive(Debug, Default)]
pub struct MemoryPostService {
    posts: HashMap<String, PostRecord>,
    settings: GameSettings,
    dictionaries: Vec<Dictionary>,
    users: HashMap<(String, String), UserData>,
    user_calls: AtomicUsize,
}

impl MemoryPostService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_post(mut self, record: PostRecord) -> Self {
        self.posts.insert(record.post_id().to_string(), record);
        self
    }

    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_dictionary(mut self, dictionary: Dictionary) -> Self {
        self.dictionaries.push(dictionary);
        self
    }

    pub fn with_user(mut self, username: &str, post_id: &str, data: UserData) -> Self {
        self.users
            .insert((username.to_string(), post_id.to_string()), data);
        self
    }

    /// Number of `get_user` calls served.
    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    fn post(&self, post_id: &str) -> anyhow::Result<&PostRecord> {
        self.posts
            .get(post_id)
            .with_context(|| format!("post {post_id} not found"))
    }
}

#[async_trait]
impl PostService for MemoryPostService {
    async fn get_post_type(&self, post_id: &str) -> anyhow::Result<String> {
        Ok(self.post(post_id)?.post_type().to_string())
    }

    async fn get_game_settings(&self) -> anyhow::Result<GameSettings> {
        Ok(self.settings.clone())
    }

    async fn get_collection_post(&self, post_id: &str) -> anyhow::Result<CollectionPostData> {
        match self.post(post_id)? {
            PostRecord::Collection(data) => Ok(data.clone()),
            other => anyhow::bail!("post {post_id} is a {} post", other.post_type()),
        }
    }

    async fn get_pinned_post(&self, post_id: &str) -> anyhow::Result<PinnedPostData> {
        match self.post(post_id)? {
            PostRecord::Pinned(data) => Ok(data.clone()),
            other => anyhow::bail!("post {post_id} is a {} post", other.post_type()),
        }
    }

    async fn get_drawing_post(&self, post_id: &str) -> anyhow::Result<DrawingPostData> {
        match self.post(post_id)? {
            PostRecord::Drawing(data) => Ok(data.clone()),
            other => anyhow::bail!("post {post_id} is a {} post", other.post_type()),
        }
    }

    async fn get_active_dictionaries(&self) -> anyhow::Result<Vec<Dictionary>> {
        Ok(self.dictionaries.clone())
    }

    async fn get_user(&self, username: Option<&str>, post_id: &str) -> anyhow::Result<UserData> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        let Some(username) = username else {
            return Ok(UserData::default());
        };
        Ok(self
            .users
            .get(&(username.to_string(), post_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// A [`Directory`] over a fixed id to username map.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: HashMap<String, String>,
    lookups: AtomicUsize,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: &str, username: &str) -> Self {
        self.users.insert(user_id.to_string(), username.to_string());
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn username(&self, user_id: &str) -> anyhow::Result<Option<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.get(user_id).cloned())
    }
}
