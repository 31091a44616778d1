// ABOUTME: Image validation and URL derivation
// ABOUTME: Checks extension and size before handing bytes to the configured store

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::{ImageError, ImageStore};

pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_IMAGES_PER_UPLOAD: usize = 10;
pub const THUMBNAIL_TRANSFORM: &str = "w_300,h_300,c_fit,q_auto,f_auto";

const UPLOAD_SEGMENT: &str = "/upload/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    pub url: String,
    pub thumbnail: String,
}

#[derive(Clone)]
pub struct ImageService {
    store: Arc<dyn ImageStore>,
}

impl ImageService {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    /// Lowercased extension of `filename` when it is an accepted image type
    pub fn validate(filename: &str, size: usize) -> Result<String, ImageError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ImageError::InvalidExtension(if extension.is_empty() {
                filename.to_string()
            } else {
                format!(".{}", extension)
            }));
        }
        if size > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge {
                size,
                max: MAX_IMAGE_BYTES,
            });
        }
        Ok(extension)
    }

    pub async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<UploadedImage, ImageError> {
        let extension = Self::validate(filename, bytes.len())?;
        let url = self.store.put(bytes, &extension).await?;
        info!(url = %url, size = bytes.len(), "Image uploaded");

        Ok(UploadedImage {
            thumbnail: thumbnail_url(&url),
            url,
        })
    }

    /// All files are validated before any is stored
    pub async fn upload_many(&self, files: &[(String, Vec<u8>)]) -> Result<Vec<UploadedImage>, ImageError> {
        if files.is_empty() {
            return Err(ImageError::Missing);
        }
        if files.len() > MAX_IMAGES_PER_UPLOAD {
            return Err(ImageError::TooMany(MAX_IMAGES_PER_UPLOAD));
        }
        for (filename, bytes) in files {
            Self::validate(filename, bytes.len())?;
        }

        let mut uploaded = Vec::with_capacity(files.len());
        for (filename, bytes) in files {
            uploaded.push(self.upload(filename, bytes).await?);
        }
        Ok(uploaded)
    }

    pub async fn delete(&self, url: &str) -> Result<(), ImageError> {
        self.store.delete(url).await?;
        info!(url = %url, "Image deleted");
        Ok(())
    }
}

/// Insert the thumbnail transformation right after `/upload/`; other URLs pass through
pub fn thumbnail_url(url: &str) -> String {
    match url.find(UPLOAD_SEGMENT) {
        Some(index) => {
            let split = index + UPLOAD_SEGMENT.len();
            format!("{}{}/{}", &url[..split], THUMBNAIL_TRANSFORM, &url[split..])
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_extensions() {
        assert_eq!(ImageService::validate("cpu.JPG", 10).unwrap(), "jpg");
        assert_eq!(ImageService::validate("board.png", 10).unwrap(), "png");
        assert!(matches!(
            ImageService::validate("notes.txt", 10),
            Err(ImageError::InvalidExtension(ext)) if ext == ".txt"
        ));
        assert!(matches!(
            ImageService::validate("noext", 10),
            Err(ImageError::InvalidExtension(_))
        ));
    }

    #[test]
    fn test_validate_size_limit() {
        assert!(ImageService::validate("a.gif", MAX_IMAGE_BYTES).is_ok());
        assert!(matches!(
            ImageService::validate("a.gif", MAX_IMAGE_BYTES + 1),
            Err(ImageError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_thumbnail_url() {
        assert_eq!(
            thumbnail_url("https://cdn.example.com/image/upload/v1/components/x.png"),
            "https://cdn.example.com/image/upload/w_300,h_300,c_fit,q_auto,f_auto/v1/components/x.png"
        );
        assert_eq!(thumbnail_url("https://example.com/x.png"), "https://example.com/x.png");
    }
}
