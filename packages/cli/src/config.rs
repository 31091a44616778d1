// ABOUTME: Server configuration loaded from the environment
// ABOUTME: Parses ports, limits, secrets and paths with defaults and typed errors

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use pcbuilder_config as keys;
use thiserror::Error;
use tracing::warn;

use crate::middleware::RateLimitConfig;

/// Used only outside production when JWT_SECRET is unset
const DEVELOPMENT_JWT_SECRET: &str = "pcbuilder-development-secret-change-me";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("JWT_SECRET must be set in production")]
    MissingJwtSecret,
    #[error("ADMIN_EMAIL and ADMIN_PASSWORD must be set together")]
    IncompleteAdmin,
    #[error("Invalid allowed origin: {0}")]
    InvalidOrigin(String),
}

#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    /// Attach raw error detail to error responses
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub image_storage_dir: PathBuf,
    pub image_public_url: String,
    pub admin: Option<AdminBootstrap>,
    pub rate_limit: RateLimitConfig,
    pub request_timeout_secs: u64,
}

fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match var(name) {
        Some(raw) => raw.parse::<T>().map_err(|_| ConfigError::InvalidNumber {
            var: name,
            value: raw,
        }),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = var(keys::ENVIRONMENT).unwrap_or_else(|| keys::DEFAULT_ENVIRONMENT.to_string());
        let production = environment.eq_ignore_ascii_case(keys::PRODUCTION_ENVIRONMENT);

        let port = parse_var(keys::PORT, keys::DEFAULT_PORT)?;
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let allowed_origins = var(keys::ALLOWED_ORIGINS)
            .unwrap_or_else(|| keys::DEFAULT_ALLOWED_ORIGIN.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let jwt_secret = match var(keys::JWT_SECRET) {
            Some(secret) => secret,
            None if production => return Err(ConfigError::MissingJwtSecret),
            None => {
                warn!("JWT_SECRET not set, using the development secret");
                DEVELOPMENT_JWT_SECRET.to_string()
            }
        };

        let admin = match (var(keys::ADMIN_EMAIL), var(keys::ADMIN_PASSWORD)) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteAdmin),
        };

        let image_public_url = var(keys::IMAGE_PUBLIC_URL)
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        let jwt_ttl_hours = parse_var(keys::JWT_TTL_HOURS, keys::DEFAULT_JWT_TTL_HOURS)?;
        if jwt_ttl_hours <= 0 {
            return Err(ConfigError::InvalidNumber {
                var: keys::JWT_TTL_HOURS,
                value: jwt_ttl_hours.to_string(),
            });
        }

        let rate_limit = RateLimitConfig {
            enabled: parse_var(keys::RATE_LIMIT_ENABLED, true)?,
            requests_per_minute: parse_var(keys::RATE_LIMIT_RPM, keys::DEFAULT_RATE_LIMIT_RPM)?,
            max_clients: parse_var(keys::RATE_LIMIT_MAX_CLIENTS, keys::DEFAULT_RATE_LIMIT_MAX_CLIENTS)?,
        };

        Ok(Config {
            debug: !production,
            environment,
            host: var(keys::HOST).unwrap_or_else(|| keys::DEFAULT_HOST.to_string()),
            port,
            allowed_origins,
            database_url: var(keys::DATABASE_URL).unwrap_or_else(|| keys::DEFAULT_DATABASE_URL.to_string()),
            db_max_connections: parse_var(keys::DB_MAX_CONNECTIONS, keys::DEFAULT_DB_MAX_CONNECTIONS)?,
            jwt_secret,
            jwt_ttl_hours,
            image_storage_dir: PathBuf::from(
                var(keys::IMAGE_STORAGE_DIR).unwrap_or_else(|| keys::DEFAULT_IMAGE_STORAGE_DIR.to_string()),
            ),
            image_public_url,
            admin,
            rate_limit,
            request_timeout_secs: parse_var(keys::REQUEST_TIMEOUT_SECS, keys::DEFAULT_REQUEST_TIMEOUT_SECS)?,
        })
    }

    pub fn is_production(&self) -> bool {
        !self.debug
    }
}
