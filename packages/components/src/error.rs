// ABOUTME: Error type for component reads and writes

use pcbuilder_specs::SpecError;
use pcbuilder_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid category ID: {0}")]
    InvalidCategory(String),

    #[error("Invalid brand ID: {0}")]
    InvalidBrand(String),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("Component '{0}' not found")]
    NotFound(String),

    #[error("Component with ID '{0}' already exists")]
    Duplicate(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ComponentError {
    /// Errors the caller can fix by changing the request
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ComponentError::Storage(_))
    }
}

impl From<sqlx::Error> for ComponentError {
    fn from(err: sqlx::Error) -> Self {
        ComponentError::Storage(StorageError::Sqlx(err))
    }
}

impl From<serde_json::Error> for ComponentError {
    fn from(err: serde_json::Error) -> Self {
        ComponentError::Storage(StorageError::Json(err))
    }
}
