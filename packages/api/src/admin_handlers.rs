// ABOUTME: HTTP request handlers reserved for administrators
// ABOUTME: User listing without password hashes

use axum::extract::State;
use pcbuilder_security::User;
use serde::Serialize;

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub total: usize,
    pub users: Vec<User>,
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<ApiResponse<UserListResponse>> {
    let users = state.users.list_users().await?;
    Ok(ApiResponse::ok(
        "Users fetched successfully",
        UserListResponse {
            total: users.len(),
            users,
        },
    ))
}
