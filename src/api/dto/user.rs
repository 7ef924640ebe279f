//! User endpoint request/response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;

/// Public representation of a user profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    /// ISO 8601 timestamp
    pub joined_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            bio: user.bio,
            location: user.location,
            skills: user.skills,
            joined_at: user.joined_at.to_string(),
        }
    }
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
}
