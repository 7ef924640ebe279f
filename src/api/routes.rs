//! Router configuration for the API.
//!
//! Centralized route registration and middleware composition.

use axum::response::Json;
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    logging_middleware, optional_auth_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Layers run outermost-last-added: request IDs are assigned first, then
/// logging, then (inside `/api`) optional auth so the cache middleware can
/// key by principal. The cache and invalidation layers live on the route
/// groups that configure them.
///
/// # Routes
/// - `/health`, `/cache-stats` - Diagnostics
/// - `/api/users`, `/api/posts` - Application endpoints
/// - `/api-docs/openapi.json` - OpenAPI document
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/users", handlers::users::user_routes(&state))
        .nest("/posts", handlers::posts::post_routes(&state))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    Router::new()
        .merge(handlers::health::health_routes())
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
