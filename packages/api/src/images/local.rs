// ABOUTME: Filesystem-backed image store
// ABOUTME: Writes files under a root directory and serves them from `<public_url>/upload/`

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::{ImageError, ImageStore};

const FOLDER: &str = "components";

#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    public_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_prefix(&self) -> String {
        format!("{}/upload/", self.public_url)
    }

    /// Map a public URL back to a file under the root, refusing anything that escapes it
    fn path_for_url(&self, url: &str) -> Result<PathBuf, ImageError> {
        let relative = url
            .strip_prefix(&self.url_prefix())
            .ok_or_else(|| ImageError::InvalidUrl(url.to_string()))?;

        let relative = Path::new(relative);
        let safe = !relative.as_os_str().is_empty()
            && relative.components().all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(ImageError::InvalidUrl(url.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(&self, bytes: &[u8], extension: &str) -> Result<String, ImageError> {
        let folder = self.root.join(FOLDER);
        tokio::fs::create_dir_all(&folder).await?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = folder.join(&filename);
        tokio::fs::write(&path, bytes).await?;

        debug!("Stored image at {}", path.display());
        Ok(format!("{}{}/{}", self.url_prefix(), FOLDER, filename))
    }

    async fn delete(&self, url: &str) -> Result<(), ImageError> {
        let path = self.path_for_url(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ImageError::NotFound(url.to_string()))
            }
            Err(e) => Err(ImageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_then_delete() {
        let dir = TempDir::new().unwrap();
        let store = LocalImageStore::new(dir.path(), "http://localhost:8080/");

        let url = store.put(b"fake-png", "png").await.unwrap();
        assert!(url.starts_with("http://localhost:8080/upload/components/"));
        assert!(url.ends_with(".png"));

        let path = store.path_for_url(&url).unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"fake-png");

        store.delete(&url).await.unwrap();
        assert!(!path.exists());
        assert!(matches!(store.delete(&url).await, Err(ImageError::NotFound(_))));
    }

    #[test]
    fn test_rejects_foreign_and_traversal_urls() {
        let store = LocalImageStore::new("/srv/uploads", "http://localhost:8080");
        assert!(matches!(
            store.path_for_url("https://elsewhere.com/upload/components/x.png"),
            Err(ImageError::InvalidUrl(_))
        ));
        assert!(matches!(
            store.path_for_url("http://localhost:8080/upload/../etc/passwd"),
            Err(ImageError::InvalidUrl(_))
        ));
        assert!(matches!(
            store.path_for_url("http://localhost:8080/upload/"),
            Err(ImageError::InvalidUrl(_))
        ));
    }
}
