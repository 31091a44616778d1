// ABOUTME: Category and brand management for the component catalog
// ABOUTME: Provides types and storage for the lookup tables components reference

pub mod error;
pub mod storage;
pub mod types;

// Re-export main types
pub use error::CatalogError;
pub use storage::{BrandStorage, CategoryStorage};
pub use types::{
    Brand, BrandCreateInput, BrandUpdateInput, Category, CategoryCreateInput, CategoryUpdateInput,
};
