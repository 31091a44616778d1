// ABOUTME: Shared application state handed to every handler
// ABOUTME: Storage services, token service and image service built over one SQLite pool

use std::sync::Arc;

use pcbuilder_catalog::{BrandStorage, CategoryStorage};
use pcbuilder_components::ComponentStorage;
use pcbuilder_security::{TokenService, UserStorage};
use sqlx::SqlitePool;

use crate::images::{ImageService, ImageStore};

#[derive(Clone)]
pub struct AppState {
    pub components: Arc<ComponentStorage>,
    pub categories: Arc<CategoryStorage>,
    pub brands: Arc<BrandStorage>,
    pub users: Arc<UserStorage>,
    pub tokens: Arc<TokenService>,
    pub images: ImageService,
}

impl AppState {
    pub fn new(pool: SqlitePool, tokens: TokenService, image_store: Arc<dyn ImageStore>) -> Self {
        Self {
            components: Arc::new(ComponentStorage::new(pool.clone())),
            categories: Arc::new(CategoryStorage::new(pool.clone())),
            brands: Arc::new(BrandStorage::new(pool.clone())),
            users: Arc::new(UserStorage::new(pool)),
            tokens: Arc::new(tokens),
            images: ImageService::new(image_store),
        }
    }
}
