// ABOUTME: HTTP request handlers for image upload and deletion
// ABOUTME: Reads multipart fields and delegates validation and storage to ImageService

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiResult, AppError};
use crate::extract::ApiJson;
use crate::images::{ImageError, UploadedImage, MAX_IMAGES_PER_UPLOAD};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Collect `(filename, bytes)` for every multipart field named `field_name`
async fn read_files(
    multipart: &mut Multipart,
    field_name: &str,
    limit: usize,
) -> ApiResult<Vec<(String, Vec<u8>)>> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        if files.len() == limit {
            return Err(ImageError::TooMany(limit).into());
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        files.push((filename, bytes.to_vec()));
    }
    Ok(files)
}

pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<ApiResponse<UploadedImage>> {
    let mut files = read_files(&mut multipart, "image", 1).await?;
    let Some((filename, bytes)) = files.pop() else {
        return Err(AppError::from(ImageError::Missing));
    };

    let uploaded = state.images.upload(&filename, &bytes).await?;
    Ok(ApiResponse::ok("Image uploaded successfully", uploaded))
}

#[derive(Debug, Serialize)]
pub struct MultipleUploadResponse {
    pub urls: Vec<String>,
    pub thumbnails: Vec<String>,
    pub count: usize,
}

pub async fn upload_multiple_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<ApiResponse<MultipleUploadResponse>> {
    let files = read_files(&mut multipart, "images", MAX_IMAGES_PER_UPLOAD).await?;
    if files.is_empty() {
        return Err(AppError::validation("No image files provided"));
    }

    let uploaded = state.images.upload_many(&files).await?;
    let (urls, thumbnails): (Vec<String>, Vec<String>) = uploaded
        .into_iter()
        .map(|image| (image.url, image.thumbnail))
        .unzip();

    Ok(ApiResponse::ok(
        "Images uploaded successfully",
        MultipleUploadResponse {
            count: urls.len(),
            urls,
            thumbnails,
        },
    ))
}

#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    pub image_url: String,
}

pub async fn delete_image(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DeleteImageRequest>,
) -> ApiResult<StatusCode> {
    if request.image_url.trim().is_empty() {
        return Err(AppError::validation("image_url is required"));
    }
    state.images.delete(request.image_url.trim()).await?;
    Ok(StatusCode::NO_CONTENT)
}
