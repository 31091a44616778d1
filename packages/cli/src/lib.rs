// ABOUTME: Server assembly for the PC Builder backend
// ABOUTME: Loads configuration, wires storage and services, layers middleware and serves HTTP

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use pcbuilder_api::{create_api_router, images::LocalImageStore, set_debug_errors, AppState};
use pcbuilder_security::TokenService;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod health;
pub mod middleware;

#[cfg(test)]
mod tests;

use config::{Config, ConfigError};
use middleware::{create_panic_handler, rate_limit_middleware, ClientRateLimiter};

const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed by an embedding process
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT_LANGUAGE])
        .max_age(Duration::from_secs(12 * 60 * 60));

    // Credentials cannot be combined with a wildcard origin
    if origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|_| ConfigError::InvalidOrigin(o.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layer.allow_origin(origins).allow_credentials(true))
}

/// Build the full application router with every middleware layer applied
pub fn create_app(
    config: &Config,
    state: AppState,
    limiter: &ClientRateLimiter,
) -> Result<Router, ConfigError> {
    let mut app = Router::new()
        .route("/health", get(health::health_check))
        .merge(create_api_router(state))
        .nest_service("/upload", ServeDir::new(&config.image_storage_dir));

    if config.rate_limit.enabled {
        app = app.layer(axum_middleware::from_fn_with_state(
            limiter.clone(),
            rate_limit_middleware,
        ));
    }

    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins)?)
        .layer(create_panic_handler());

    Ok(app)
}

async fn bootstrap_admin(config: &Config, state: &AppState) -> anyhow::Result<()> {
    let Some(admin) = &config.admin else {
        return Ok(());
    };
    let user = state
        .users
        .ensure_admin(&admin.email, &admin.password)
        .await
        .context("failed to bootstrap admin account")?;
    info!(email = %user.email, "Admin account ready");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    set_debug_errors(config.debug);
    info!(
        environment = %config.environment,
        production = config.is_production(),
        "Starting PC Builder API"
    );

    let pool = pcbuilder_storage::connect(&config.database_url, config.db_max_connections)
        .await
        .context("failed to open database")?;

    let tokens = TokenService::new(
        config.jwt_secret.clone(),
        chrono::Duration::hours(config.jwt_ttl_hours),
    )?;
    let image_store = Arc::new(LocalImageStore::new(
        config.image_storage_dir.clone(),
        config.image_public_url.clone(),
    ));
    let state = AppState::new(pool, tokens, image_store);

    bootstrap_admin(&config, &state).await?;

    let limiter = ClientRateLimiter::new(config.rate_limit.clone());
    if config.rate_limit.enabled {
        limiter.spawn_sweeper(SWEEP_INTERVAL);
    }

    let app = create_app(&config, state, &limiter)?;

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
