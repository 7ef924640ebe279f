//! Post endpoint request/response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Post;

/// Public representation of a feed post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub content: String,
    pub tags: Vec<String>,
    pub likes: u64,
    /// ISO 8601 timestamp
    pub created_at: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            author_username: post.author_username,
            content: post.content,
            tags: post.tags,
            likes: post.likes,
            created_at: post.created_at.to_string(),
        }
    }
}

/// New post submitted by an authenticated user.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}
