// ABOUTME: Bearer-token authentication and role gating
// ABOUTME: Verifies the access token, injects AuthUser into the request, checks role allow-lists

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use pcbuilder_security::Role;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;

pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
pub const ADMIN_OR_VENDOR: &[Role] = &[Role::Admin, Role::Vendor];

/// Identity taken from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

fn bearer_token(parts: &axum::http::HeaderMap) -> Option<&str> {
    let value = parts.get(AUTHORIZATION)?.to_str().ok()?.trim();
    // A bare scheme word with no credentials counts as a missing header
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

/// Reject requests without a valid bearer token (401)
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(token) = bearer_token(request.headers()) else {
        warn!(path = %path, "Missing bearer token");
        return Err(AppError::Unauthorized("Authorization header is required".to_string()));
    };

    let claims = state.tokens.verify(token).map_err(|e| {
        warn!(path = %path, error = %e, "Token verification failed");
        AppError::from(e)
    })?;

    debug!(path = %path, user_id = %claims.sub, role = %claims.role, "Request authenticated");
    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Reject authenticated callers whose role is not in `allowed` (403).
/// Must run after `require_auth`.
pub async fn require_roles(
    allowed: &'static [Role],
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user) = request.extensions().get::<AuthUser>() else {
        return Err(AppError::Unauthorized("Authentication required".to_string()));
    };

    if !allowed.contains(&user.role) {
        warn!(user_id = %user.id, role = %user.role, path = %request.uri().path(), "Role not permitted");
        return Err(AppError::Forbidden(
            "You do not have permission to access this resource".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
