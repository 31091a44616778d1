// ABOUTME: HTTP request handlers for component operations
// ABOUTME: Filtered listing, facets, lookup, single and bulk creation, update and delete

use axum::{
    extract::{Path, State},
    http::{header::ACCEPT_LANGUAGE, HeaderMap, StatusCode},
};
use pcbuilder_components::{
    AvailableFilters, BulkCreateReport, ComponentCreateInput, ComponentPage, ComponentQuery,
    ComponentUpdateInput, ComponentWithRelations, Currency, DeleteMode, MAX_BULK_COMPONENTS,
};
use pcbuilder_security::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiResult, AppError};
use crate::extract::{ApiJson, ApiQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Paginated, filtered, sorted component search
pub async fn list_components(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ComponentQuery>,
) -> ApiResult<ApiResponse<ComponentPage>> {
    let (filter, pagination) = query.into_parts()?;
    let page = state.components.list_components(filter, pagination).await?;
    Ok(ApiResponse::ok("Components fetched successfully", page))
}

#[derive(Debug, Serialize)]
pub struct AllComponentsResponse {
    pub total: usize,
    pub components: Vec<ComponentWithRelations>,
}

pub async fn list_all_components(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<AllComponentsResponse>> {
    let components = state.components.all_components().await?;
    Ok(ApiResponse::ok(
        "Components fetched successfully",
        AllComponentsResponse {
            total: components.len(),
            components,
        },
    ))
}

/// Facets for the filter sidebar; prices follow the caller's Accept-Language
pub async fn available_filters(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<ApiResponse<AvailableFilters>> {
    let language = headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
    let currency = Currency::from_language(language);
    let filters = state.components.available_filters(currency).await?;
    Ok(ApiResponse::ok("Available filters fetched successfully", filters))
}

pub async fn get_component(
    State(state): State<AppState>,
    Path(component_id): Path<String>,
) -> ApiResult<ApiResponse<ComponentWithRelations>> {
    let component = state.components.get_component(&component_id).await?;
    Ok(ApiResponse::ok("Component fetched successfully", component))
}

pub async fn create_component(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(input): ApiJson<ComponentCreateInput>,
) -> ApiResult<ApiResponse<ComponentWithRelations>> {
    info!(user_id = %user.id, component_id = %input.id, "Creating component");
    let component = state.components.create_component(input).await?;
    Ok(ApiResponse::created("Component created successfully", component))
}

/// Items stay raw JSON so one malformed entry fails alone instead of the whole batch
#[derive(Debug, Deserialize)]
pub struct BulkCreateRequest {
    pub components: Vec<Value>,
}

/// 201 when every item was created, 207 when some were, 400 when none were
pub async fn bulk_create_components(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(request): ApiJson<BulkCreateRequest>,
) -> ApiResult<ApiResponse<BulkCreateReport>> {
    if request.components.is_empty() {
        return Err(AppError::validation("At least one component is required"));
    }
    if request.components.len() > MAX_BULK_COMPONENTS {
        return Err(AppError::validation(format!(
            "Maximum {} components can be created at once",
            MAX_BULK_COMPONENTS
        )));
    }

    info!(user_id = %user.id, count = request.components.len(), "Bulk creating components");
    let report = state.components.bulk_create_components(request.components).await?;

    let status = if report.none_succeeded() {
        StatusCode::BAD_REQUEST
    } else if report.all_succeeded() {
        StatusCode::CREATED
    } else {
        StatusCode::MULTI_STATUS
    };
    let message = format!(
        "Bulk creation completed: {} created, {} failed",
        report.total_created, report.total_failed
    );

    Ok(ApiResponse::with_status(status, message, Some(report)))
}

pub async fn update_component(
    State(state): State<AppState>,
    Path(component_id): Path<String>,
    ApiJson(input): ApiJson<ComponentUpdateInput>,
) -> ApiResult<ApiResponse<ComponentWithRelations>> {
    let component = state.components.update_component(&component_id, input).await?;
    Ok(ApiResponse::ok("Component updated successfully", component))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: String,
    pub mode: DeleteMode,
}

/// Administrators remove the row; vendors only deactivate it
pub async fn delete_component(
    State(state): State<AppState>,
    user: AuthUser,
    Path(component_id): Path<String>,
) -> ApiResult<ApiResponse<DeleteResponse>> {
    let mode = match user.role {
        Role::Admin => DeleteMode::Hard,
        _ => DeleteMode::Soft,
    };

    state.components.delete_component(&component_id, mode).await?;
    info!(user_id = %user.id, component_id = %component_id, mode = ?mode, "Component deleted");

    Ok(ApiResponse::ok(
        "Component deleted successfully",
        DeleteResponse {
            id: component_id,
            mode,
        },
    ))
}
