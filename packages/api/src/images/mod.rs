// ABOUTME: Image upload collaborator
// ABOUTME: Validation and thumbnail URLs in ImageService, persistence behind the ImageStore trait

mod local;
mod service;

pub use local::LocalImageStore;
pub use service::{
    ImageService, UploadedImage, ALLOWED_EXTENSIONS, MAX_IMAGE_BYTES, MAX_IMAGES_PER_UPLOAD,
    THUMBNAIL_TRANSFORM,
};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("No image file provided")]
    Missing,

    #[error("Invalid file type: {0}")]
    InvalidExtension(String),

    #[error("File too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Maximum {0} images allowed")]
    TooMany(usize),

    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),

    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Image storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where validated image bytes end up
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `bytes` under a generated name with `extension`; returns the public URL
    async fn put(&self, bytes: &[u8], extension: &str) -> Result<String, ImageError>;

    /// Remove the image behind a URL previously returned by `put`
    async fn delete(&self, url: &str) -> Result<(), ImageError>;
}
