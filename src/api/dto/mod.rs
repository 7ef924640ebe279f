//! Request and response DTOs for the API surface.

mod health;
mod post;
mod user;

pub use health::{CacheInfo, CacheStatsResponse, HealthResponse, ServiceHealth, ServicesStatus};
pub use post::{CreatePostRequest, PostResponse};
pub use user::{UpdateUserRequest, UserResponse};
