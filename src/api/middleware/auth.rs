//! JWT authentication middleware.
//!
//! The cache layer only ever reads the principal's identifier, so auth here
//! is deliberately small: a Bearer token is validated and the resulting
//! [`AuthUser`] is attached to the request extensions. Requests without a
//! valid token continue anonymously; handlers that require a principal call
//! [`require_auth`].

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_token};

/// Authenticated principal attached to request extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// User ID from JWT claims
    pub user_id: i64,
    /// Username from JWT claims
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub.parse().unwrap_or(0),
            username: claims.username,
        }
    }
}

/// Optional JWT authentication middleware.
///
/// A valid `Authorization: Bearer <token>` header attaches an [`AuthUser`]
/// extension; anything else leaves the request anonymous. Must run before
/// the cache middleware so cache keys see the principal.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(auth_header) = request.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(claims) = validate_token(token, &state.auth_config.jwt_secret)
    {
        request.extensions_mut().insert(AuthUser::from(claims));
    }

    next.run(request).await
}

/// Turn an optional extension into a required principal.
pub fn require_auth(user: Option<&AuthUser>) -> AppResult<AuthUser> {
    user.cloned().ok_or_else(|| AppError::Unauthorized {
        message: "Authentication required".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::Claims;

    #[test]
    fn auth_user_from_claims() {
        let claims = Claims {
            sub: "123".to_string(),
            username: "octocat".to_string(),
            iat: 0,
            exp: 9_999_999_999,
        };
        let user = AuthUser::from(claims);
        assert_eq!(user.user_id, 123);
        assert_eq!(user.username, "octocat");
    }

    #[test]
    fn require_auth_rejects_anonymous() {
        assert!(matches!(
            require_auth(None),
            Err(AppError::Unauthorized { .. })
        ));

        let user = AuthUser {
            user_id: 1,
            username: "octocat".to_string(),
        };
        assert_eq!(require_auth(Some(&user)).unwrap().user_id, 1);
    }
}
