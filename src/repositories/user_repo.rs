//! User repository.

use std::collections::HashMap;
use std::sync::Arc;

use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::models::User;

/// In-memory user store.
#[derive(Clone)]
pub struct UserRepo {
    users: Arc<RwLock<HashMap<i64, User>>>,
}

impl UserRepo {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Store seeded with a couple of demo profiles.
    pub fn seeded() -> Self {
        Self {
            users: Arc::new(RwLock::new(seed_users())),
        }
    }

    pub async fn find(&self, id: i64) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    /// Replace mutable profile fields; returns the updated user if present.
    pub async fn update(
        &self,
        id: i64,
        display_name: Option<String>,
        bio: Option<String>,
        location: Option<String>,
        skills: Option<Vec<String>>,
    ) -> Option<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id)?;
        if let Some(display_name) = display_name {
            user.display_name = display_name;
        }
        if let Some(bio) = bio {
            user.bio = Some(bio);
        }
        if let Some(location) = location {
            user.location = Some(location);
        }
        if let Some(skills) = skills {
            user.skills = skills;
        }
        Some(user.clone())
    }
}

impl Default for UserRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_users() -> HashMap<i64, User> {
    let joined_at: Timestamp = "2025-01-15T09:00:00Z".parse().unwrap_or_default();
    [
        User {
            id: 1,
            username: "octocat".to_string(),
            display_name: "Octo Cat".to_string(),
            bio: Some("Builds things with Rust and too many tabs open".to_string()),
            location: Some("The Cloud".to_string()),
            skills: vec!["rust".to_string(), "redis".to_string()],
            joined_at,
        },
        User {
            id: 2,
            username: "ferris".to_string(),
            display_name: "Ferris".to_string(),
            bio: Some("Unofficial mascot, official reviewer".to_string()),
            location: None,
            skills: vec!["rust".to_string(), "async".to_string()],
            joined_at,
        },
    ]
    .into_iter()
    .map(|user| (user.id, user))
    .collect()
}
