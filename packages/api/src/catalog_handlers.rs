// ABOUTME: HTTP request handlers for categories and brands
// ABOUTME: Public listing and lookup, administrator creation and sparse updates

use axum::extract::{Path, State};
use pcbuilder_catalog::{
    Brand, BrandCreateInput, BrandUpdateInput, Category, CategoryCreateInput, CategoryUpdateInput,
};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn list_categories(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<ApiResponse<Vec<Category>>> {
    let categories = state.categories.list_categories(params.include_inactive).await?;
    Ok(ApiResponse::ok("Categories fetched successfully", categories))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> ApiResult<ApiResponse<Category>> {
    let category = state.categories.get_category(&category_id).await?;
    Ok(ApiResponse::ok("Category fetched successfully", category))
}

pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CategoryCreateInput>,
) -> ApiResult<ApiResponse<Category>> {
    let category = state.categories.create_category(input).await?;
    Ok(ApiResponse::created("Category created successfully", category))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    ApiJson(input): ApiJson<CategoryUpdateInput>,
) -> ApiResult<ApiResponse<Category>> {
    let category = state.categories.update_category(&category_id, input).await?;
    Ok(ApiResponse::ok("Category updated successfully", category))
}

pub async fn list_brands(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<ApiResponse<Vec<Brand>>> {
    let brands = state.brands.list_brands(params.include_inactive).await?;
    Ok(ApiResponse::ok("Brands fetched successfully", brands))
}

pub async fn get_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<String>,
) -> ApiResult<ApiResponse<Brand>> {
    let brand = state.brands.get_brand(&brand_id).await?;
    Ok(ApiResponse::ok("Brand fetched successfully", brand))
}

pub async fn create_brand(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<BrandCreateInput>,
) -> ApiResult<ApiResponse<Brand>> {
    let brand = state.brands.create_brand(input).await?;
    Ok(ApiResponse::created("Brand created successfully", brand))
}

pub async fn update_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<String>,
    ApiJson(input): ApiJson<BrandUpdateInput>,
) -> ApiResult<ApiResponse<Brand>> {
    let brand = state.brands.update_brand(&brand_id, input).await?;
    Ok(ApiResponse::ok("Brand updated successfully", brand))
}
