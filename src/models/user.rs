//! User model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A DevMate user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub joined_at: Timestamp,
}
