//! In-memory repositories backing the API handlers.
//!
//! The data model is deliberately thin: these stores exist so the response
//! cache has real read and write traffic to wrap. They are seeded at startup
//! and hold everything behind `tokio::sync::RwLock`.

mod post_repo;
mod user_repo;

pub use post_repo::PostRepo;
pub use user_repo::UserRepo;

/// Container for all repositories.
///
/// Cloning is cheap; the repositories share their storage via Arc.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepo,
    pub posts: PostRepo,
}

impl Repositories {
    /// Create repositories pre-populated with seed data.
    pub fn seeded() -> Self {
        Self {
            users: UserRepo::seeded(),
            posts: PostRepo::seeded(),
        }
    }
}
