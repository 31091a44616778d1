// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of every environment variable the backend reads

// Runtime Environment
pub const ENVIRONMENT: &str = "ENVIRONMENT";
pub const PRODUCTION_ENVIRONMENT: &str = "production";
pub const DEFAULT_ENVIRONMENT: &str = "development";

// Server Configuration
pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// CORS Configuration
pub const ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

// Database Configuration
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
pub const DEFAULT_DATABASE_URL: &str = "sqlite:pcbuilder.db";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

// Authentication
pub const JWT_SECRET: &str = "JWT_SECRET";
pub const JWT_TTL_HOURS: &str = "JWT_TTL_HOURS";
pub const DEFAULT_JWT_TTL_HOURS: i64 = 24;
pub const ADMIN_EMAIL: &str = "ADMIN_EMAIL";
pub const ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";

// Image Storage
pub const IMAGE_STORAGE_DIR: &str = "IMAGE_STORAGE_DIR";
pub const IMAGE_PUBLIC_URL: &str = "IMAGE_PUBLIC_URL";
pub const DEFAULT_IMAGE_STORAGE_DIR: &str = "uploads";

// Rate Limiting
pub const RATE_LIMIT_ENABLED: &str = "RATE_LIMIT_ENABLED";
pub const RATE_LIMIT_RPM: &str = "RATE_LIMIT_RPM";
pub const RATE_LIMIT_MAX_CLIENTS: &str = "RATE_LIMIT_MAX_CLIENTS";
pub const DEFAULT_RATE_LIMIT_RPM: u32 = 100;
pub const DEFAULT_RATE_LIMIT_MAX_CLIENTS: usize = 10_000;

// Logging
pub const RUST_LOG: &str = "RUST_LOG";
