//! Post model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A post in the DevMate news feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub content: String,
    pub tags: Vec<String>,
    pub likes: u64,
    pub created_at: Timestamp,
}
