// ABOUTME: HTTP API layer for the PC Builder backend providing REST endpoints and routing
// ABOUTME: Integration layer over the catalog, component and security packages

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    routing::{get, patch, post, put},
    Router,
};

pub mod admin_handlers;
pub mod auth;
pub mod auth_handlers;
pub mod catalog_handlers;
pub mod components_handlers;
pub mod error;
pub mod extract;
pub mod images;
pub mod images_handlers;
pub mod response;
pub mod state;

pub use error::{set_debug_errors, ApiResult, AppError};
pub use state::AppState;

use auth::{require_auth, require_roles, ADMIN_ONLY, ADMIN_OR_VENDOR};
use images::{MAX_IMAGES_PER_UPLOAD, MAX_IMAGE_BYTES};

/// Room for a full multi-image upload plus multipart framing
const IMAGE_BODY_LIMIT: usize = MAX_IMAGES_PER_UPLOAD * MAX_IMAGE_BYTES + 1024 * 1024;

async fn admin_gate(request: Request, next: Next) -> ApiResult<axum::response::Response> {
    require_roles(ADMIN_ONLY, request, next).await
}

async fn catalog_writer_gate(request: Request, next: Next) -> ApiResult<axum::response::Response> {
    require_roles(ADMIN_OR_VENDOR, request, next).await
}

/// Creates the components API router (nested under /api/components)
pub fn create_components_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(components_handlers::list_components))
        .route("/all", get(components_handlers::list_all_components))
        .route("/filters", get(components_handlers::available_filters))
        .route("/{id}", get(components_handlers::get_component));

    let protected = Router::new()
        .route("/", post(components_handlers::create_component))
        .route("/bulk", post(components_handlers::bulk_create_components))
        .route(
            "/{id}",
            put(components_handlers::update_component).delete(components_handlers::delete_component),
        )
        .route_layer(middleware::from_fn(catalog_writer_gate))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}

/// Creates the categories API router (nested under /api/categories)
pub fn create_categories_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(catalog_handlers::list_categories))
        .route("/{id}", get(catalog_handlers::get_category));

    let protected = Router::new()
        .route("/", post(catalog_handlers::create_category))
        .route("/{id}", patch(catalog_handlers::update_category))
        .route_layer(middleware::from_fn(admin_gate))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}

/// Creates the brands API router (nested under /api/brands)
pub fn create_brands_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(catalog_handlers::list_brands))
        .route("/{id}", get(catalog_handlers::get_brand));

    let protected = Router::new()
        .route("/", post(catalog_handlers::create_brand))
        .route("/{id}", patch(catalog_handlers::update_brand))
        .route_layer(middleware::from_fn(admin_gate))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}

/// Creates the auth API router (nested under /api/auth)
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(auth_handlers::me))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .merge(protected)
}

/// Creates the admin API router (nested under /api/admin)
pub fn create_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(admin_handlers::list_users))
        .route_layer(middleware::from_fn(admin_gate))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// Creates the images API router (nested under /api/images)
pub fn create_images_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/upload", post(images_handlers::upload_image))
        .route("/upload-multiple", post(images_handlers::upload_multiple_images))
        .route("/", axum::routing::delete(images_handlers::delete_image))
        .route_layer(middleware::from_fn(admin_gate))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
        .layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT))
}

/// Every `/api` route with state applied
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/components", create_components_router(state.clone()))
        .nest("/api/categories", create_categories_router(state.clone()))
        .nest("/api/brands", create_brands_router(state.clone()))
        .nest("/api/auth", create_auth_router(state.clone()))
        .nest("/api/admin", create_admin_router(state.clone()))
        .nest("/api/images", create_images_router(state.clone()))
        .with_state(state)
}
