//! News feed and trending request handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};

use crate::api::doc::POSTS_TAG;
use crate::api::dto::{CreatePostRequest, PostResponse};
use crate::api::middleware::{
    AuthUser, CachePolicy, InvalidationRules, cache_response, invalidate_cache, require_auth,
};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Feed responses change often, trending tolerates more staleness.
const FEED_TTL: u64 = 60;
const TRENDING_TTL: u64 = 120;

/// Number of posts returned by the trending endpoint.
const TRENDING_LIMIT: usize = 10;

/// Creates feed routes.
///
/// Routes:
/// - GET /          - News feed (cached 60s)
/// - POST /         - Create a post (invalidates)
/// - POST /{id}/like - Like a post (invalidates)
/// - GET /trending  - Most liked posts (cached 120s)
pub fn post_routes(state: &AppState) -> Router<AppState> {
    let feed_cache = (state.clone(), CachePolicy::new(FEED_TTL));
    let trending_cache = (state.clone(), CachePolicy::new(TRENDING_TTL));
    let invalidation = (
        state.clone(),
        InvalidationRules::new(["resp:/api/posts*"]),
    );

    let feed = Router::new()
        .route("/", get(get_feed).post(create_post))
        .route("/{id}/like", post(like_post))
        .layer(middleware::from_fn_with_state(invalidation, invalidate_cache))
        .layer(middleware::from_fn_with_state(feed_cache, cache_response));

    let trending = Router::new()
        .route("/trending", get(get_trending))
        .layer(middleware::from_fn_with_state(trending_cache, cache_response));

    feed.merge(trending)
}

/// GET /api/posts - News feed, newest first.
#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "Feed posts", body = [PostResponse])
    ),
    tag = POSTS_TAG
)]
pub async fn get_feed(State(state): State<AppState>) -> Json<Vec<PostResponse>> {
    let posts = state.repos.posts.feed().await;
    Json(posts.into_iter().map(PostResponse::from).collect())
}

/// GET /api/posts/trending - Most liked posts.
#[utoipa::path(
    get,
    path = "/api/posts/trending",
    responses(
        (status = 200, description = "Trending posts", body = [PostResponse])
    ),
    tag = POSTS_TAG
)]
pub async fn get_trending(State(state): State<AppState>) -> Json<Vec<PostResponse>> {
    let posts = state.repos.posts.trending(TRENDING_LIMIT).await;
    Json(posts.into_iter().map(PostResponse::from).collect())
}

/// POST /api/posts - Create a post as the authenticated user.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Created post", body = PostResponse),
        (status = 400, description = "Empty content"),
        (status = 401, description = "Authentication required")
    ),
    tag = POSTS_TAG
)]
pub async fn create_post(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(payload): Json<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<PostResponse>)> {
    let principal = require_auth(user.as_ref().map(|Extension(u)| u))?;

    if payload.content.trim().is_empty() {
        return Err(AppError::Validation {
            field: "content".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let created = state
        .repos
        .posts
        .create(
            principal.user_id,
            principal.username,
            payload.content,
            payload.tags,
        )
        .await;

    Ok((StatusCode::CREATED, Json(PostResponse::from(created))))
}

/// POST /api/posts/{id}/like - Like a post.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Updated post", body = PostResponse),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "No such post")
    ),
    tag = POSTS_TAG
)]
pub async fn like_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: Option<Extension<AuthUser>>,
) -> AppResult<Json<PostResponse>> {
    require_auth(user.as_ref().map(|Extension(u)| u))?;

    let post = state
        .repos
        .posts
        .like(id)
        .await
        .ok_or_else(|| AppError::NotFound {
            entity: "post".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(PostResponse::from(post)))
}
