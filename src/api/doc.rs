//! OpenAPI documentation definitions.

use utoipa::OpenApi;

use crate::api::dto;
use crate::cache::CacheStats;

pub const HEALTH_TAG: &str = "health";
pub const USERS_TAG: &str = "users";
pub const POSTS_TAG: &str = "posts";

/// OpenAPI document for the DevMate API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "DevMate API",
        description = "Developer social platform API with a Redis-backed response cache"
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::health::cache_stats,
        crate::api::handlers::health::reset_cache_stats,
        crate::api::handlers::users::get_user,
        crate::api::handlers::users::update_user,
        crate::api::handlers::posts::get_feed,
        crate::api::handlers::posts::get_trending,
        crate::api::handlers::posts::create_post,
        crate::api::handlers::posts::like_post,
    ),
    components(schemas(
        dto::HealthResponse,
        dto::ServicesStatus,
        dto::ServiceHealth,
        dto::CacheStatsResponse,
        dto::CacheInfo,
        CacheStats,
        dto::UserResponse,
        dto::UpdateUserRequest,
        dto::PostResponse,
        dto::CreatePostRequest,
    )),
    tags(
        (name = HEALTH_TAG, description = "Health and cache diagnostics"),
        (name = USERS_TAG, description = "User profiles"),
        (name = POSTS_TAG, description = "News feed and trending")
    )
)]
pub struct ApiDoc;
