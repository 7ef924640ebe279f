//! Post repository.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use jiff::{Timestamp, ToSpan};
use tokio::sync::RwLock;

use crate::models::Post;

/// In-memory post store.
#[derive(Clone)]
pub struct PostRepo {
    posts: Arc<RwLock<Vec<Post>>>,
    next_id: Arc<AtomicI64>,
}

impl PostRepo {
    pub fn new() -> Self {
        Self {
            posts: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Store seeded with a handful of feed posts.
    pub fn seeded() -> Self {
        let posts = seed_posts();
        let next_id = posts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        Self {
            posts: Arc::new(RwLock::new(posts)),
            next_id: Arc::new(AtomicI64::new(next_id)),
        }
    }

    /// News feed: newest first.
    pub async fn feed(&self) -> Vec<Post> {
        let mut posts = self.posts.read().await.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    /// Trending: most liked first, capped.
    pub async fn trending(&self, limit: usize) -> Vec<Post> {
        let mut posts = self.posts.read().await.clone();
        posts.sort_by(|a, b| b.likes.cmp(&a.likes));
        posts.truncate(limit);
        posts
    }

    pub async fn create(
        &self,
        author_id: i64,
        author_username: String,
        content: String,
        tags: Vec<String>,
    ) -> Post {
        let post = Post {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            author_id,
            author_username,
            content,
            tags,
            likes: 0,
            created_at: Timestamp::now(),
        };
        self.posts.write().await.push(post.clone());
        post
    }

    /// Increment the like counter; returns the updated post if present.
    pub async fn like(&self, id: i64) -> Option<Post> {
        let mut posts = self.posts.write().await;
        let post = posts.iter_mut().find(|p| p.id == id)?;
        post.likes += 1;
        Some(post.clone())
    }
}

impl Default for PostRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_posts() -> Vec<Post> {
    let base: Timestamp = "2025-06-01T12:00:00Z".parse().unwrap_or_default();
    vec![
        Post {
            id: 1,
            author_id: 1,
            author_username: "octocat".to_string(),
            content: "Shipped the response cache today. MISS, MISS, HIT, HIT, HIT.".to_string(),
            tags: vec!["rust".to_string(), "redis".to_string()],
            likes: 12,
            created_at: base,
        },
        Post {
            id: 2,
            author_id: 2,
            author_username: "ferris".to_string(),
            content: "Borrow checker approved my PR on the first try. Suspicious.".to_string(),
            tags: vec!["rust".to_string()],
            likes: 42,
            created_at: base + 1.hours(),
        },
        Post {
            id: 3,
            author_id: 1,
            author_username: "octocat".to_string(),
            content: "Hot take: X-Cache headers are the best debugging tool nobody reads."
                .to_string(),
            tags: vec!["http".to_string(), "caching".to_string()],
            likes: 7,
            created_at: base + 2.hours(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn feed_is_newest_first() {
        let repo = PostRepo::seeded();
        let feed = repo.feed().await;
        assert_eq!(feed.first().map(|p| p.id), Some(3));
    }

    #[tokio::test]
    async fn trending_is_most_liked_first() {
        let repo = PostRepo::seeded();
        let trending = repo.trending(2).await;
        assert_eq!(trending.len(), 2);
        assert_eq!(trending.first().map(|p| p.id), Some(2));
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let repo = PostRepo::seeded();
        let post = repo
            .create(1, "octocat".to_string(), "hi".to_string(), vec![])
            .await;
        assert_eq!(post.id, 4);
    }

    #[tokio::test]
    async fn like_increments_counter() {
        let repo = PostRepo::seeded();
        let post = repo.like(1).await.unwrap();
        assert_eq!(post.likes, 13);
        assert!(repo.like(999).await.is_none());
    }
}
