//! User profile request handlers.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Extension, Json, Router, middleware};

use crate::api::doc::USERS_TAG;
use crate::api::dto::{UpdateUserRequest, UserResponse};
use crate::api::middleware::{
    AuthUser, CachePolicy, InvalidationRules, cache_response, invalidate_cache, require_auth,
};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Creates user profile routes.
///
/// Reads are cached with the configured default TTL; successful writes purge
/// every cached user response.
///
/// Routes:
/// - GET /{id}  - Fetch a profile (cached)
/// - PUT /{id}  - Update own profile (invalidates)
pub fn user_routes(state: &AppState) -> Router<AppState> {
    let cache = (
        state.clone(),
        CachePolicy::new(state.cache.default_ttl()),
    );
    let invalidation = (
        state.clone(),
        InvalidationRules::new(["resp:/api/users*"]),
    );

    Router::new()
        .route("/{id}", get(get_user).put(update_user))
        .layer(middleware::from_fn_with_state(invalidation, invalidate_cache))
        .layer(middleware::from_fn_with_state(cache, cache_response))
}

/// GET /api/users/{id} - Fetch a user profile.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "No such user")
    ),
    tag = USERS_TAG
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .repos
        .users
        .find(id)
        .await
        .ok_or_else(|| AppError::NotFound {
            entity: "user".to_string(),
            id: id.to_string(),
        })?;
    Ok(Json(UserResponse::from(user)))
}

/// PUT /api/users/{id} - Update the authenticated user's own profile.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Cannot update another user's profile"),
        (status = 404, description = "No such user")
    ),
    tag = USERS_TAG
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: Option<Extension<AuthUser>>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let principal = require_auth(user.as_ref().map(|Extension(u)| u))?;
    if principal.user_id != id {
        return Err(AppError::Forbidden {
            message: "Cannot update another user's profile".to_string(),
        });
    }

    let updated = state
        .repos
        .users
        .update(
            id,
            payload.display_name,
            payload.bio,
            payload.location,
            payload.skills,
        )
        .await
        .ok_or_else(|| AppError::NotFound {
            entity: "user".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(UserResponse::from(updated)))
}
