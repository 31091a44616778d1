// ABOUTME: HTTP request handlers for registration, login and the current identity
// ABOUTME: Public sign-up always yields the plain user role

use axum::extract::State;
use chrono::{DateTime, Utc};
use pcbuilder_security::{NewUser, Role, User};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AuthRequest>,
) -> ApiResult<ApiResponse<User>> {
    let user = state
        .users
        .create_user(NewUser {
            email: request.email,
            password: request.password,
            role: Role::User,
        })
        .await?;

    Ok(ApiResponse::created("User registered successfully", user))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AuthRequest>,
) -> ApiResult<ApiResponse<LoginResponse>> {
    let user = state.users.authenticate(&request.email, &request.password).await?;
    let issued = state.tokens.issue(&user.id, &user.email, user.role)?;

    info!(user_id = %user.id, role = %user.role, "User logged in");
    Ok(ApiResponse::ok(
        "Login successful",
        LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        },
    ))
}

pub async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<ApiResponse<User>> {
    let user = state.users.get_user(&user.id).await?;
    Ok(ApiResponse::ok("User fetched successfully", user))
}
