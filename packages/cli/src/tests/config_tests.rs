use crate::config::{Config, ConfigError};
use rstest::rstest;
use serial_test::serial;
use std::env;

const VARS: &[&str] = &[
    "ENVIRONMENT",
    "HOST",
    "PORT",
    "ALLOWED_ORIGINS",
    "DATABASE_URL",
    "DB_MAX_CONNECTIONS",
    "JWT_SECRET",
    "JWT_TTL_HOURS",
    "ADMIN_EMAIL",
    "ADMIN_PASSWORD",
    "IMAGE_STORAGE_DIR",
    "IMAGE_PUBLIC_URL",
    "RATE_LIMIT_ENABLED",
    "RATE_LIMIT_RPM",
    "RATE_LIMIT_MAX_CLIENTS",
    "REQUEST_TIMEOUT_SECS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_config_from_env_defaults() {
    clear_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.environment, "development");
    assert!(config.debug);
    assert!(!config.is_production());
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8080);
    assert_eq!(config.allowed_origins, vec!["http://localhost:5173".to_string()]);
    assert_eq!(config.database_url, "sqlite:pcbuilder.db");
    assert_eq!(config.jwt_ttl_hours, 24);
    assert!(!config.jwt_secret.is_empty());
    assert_eq!(config.image_public_url, "http://localhost:8080");
    assert!(config.admin.is_none());
    assert!(config.rate_limit.enabled);
    assert_eq!(config.rate_limit.requests_per_minute, 100);
    assert_eq!(config.request_timeout_secs, 30);
}

#[test]
#[serial]
fn test_allowed_origins_are_split_and_trimmed() {
    clear_env();
    env::set_var("ALLOWED_ORIGINS", "https://shop.example.com, https://admin.example.com,,");

    let config = Config::from_env().unwrap();

    assert_eq!(
        config.allowed_origins,
        vec!["https://shop.example.com".to_string(), "https://admin.example.com".to_string()]
    );
    clear_env();
}

#[test]
#[serial]
fn test_production_requires_jwt_secret() {
    clear_env();
    env::set_var("ENVIRONMENT", "production");

    assert_eq!(Config::from_env().unwrap_err(), ConfigError::MissingJwtSecret);

    env::set_var("JWT_SECRET", "a-real-secret");
    let config = Config::from_env().unwrap();
    assert!(config.is_production());
    assert!(!config.debug);
    assert_eq!(config.jwt_secret, "a-real-secret");
    clear_env();
}

#[test]
#[serial]
fn test_admin_bootstrap_needs_both_values() {
    clear_env();
    env::set_var("ADMIN_EMAIL", "root@example.com");
    assert_eq!(Config::from_env().unwrap_err(), ConfigError::IncompleteAdmin);

    env::set_var("ADMIN_PASSWORD", "hunter22");
    let admin = Config::from_env().unwrap().admin.unwrap();
    assert_eq!(admin.email, "root@example.com");
    assert_eq!(admin.password, "hunter22");
    clear_env();
}

#[test]
#[serial]
fn test_port_zero() {
    clear_env();
    env::set_var("PORT", "0");

    assert_eq!(Config::from_env().unwrap_err(), ConfigError::PortOutOfRange(0));
    clear_env();
}

#[rstest]
#[case("1", 1)]
#[case("443", 443)]
#[case("65535", 65535)]
#[serial]
fn test_valid_port_numbers(#[case] port_str: &str, #[case] expected: u16) {
    clear_env();
    env::set_var("PORT", port_str);

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, expected);
    assert_eq!(config.image_public_url, format!("http://localhost:{}", expected));
    clear_env();
}

#[rstest]
#[case("PORT", "-1")]
#[case("PORT", "65536")]
#[case("PORT", "0x1234")]
#[case("RATE_LIMIT_RPM", "lots")]
#[case("RATE_LIMIT_ENABLED", "maybe")]
#[case("JWT_TTL_HOURS", "0")]
#[serial]
fn test_invalid_values(#[case] var: &str, #[case] value: &str) {
    clear_env();
    env::set_var(var, value);

    let err = Config::from_env().unwrap_err();

    assert!(matches!(err, ConfigError::InvalidNumber { .. }), "{:?}", err);
    assert!(err.to_string().contains(var));
    clear_env();
}

#[test]
fn test_config_error_display() {
    assert_eq!(
        ConfigError::PortOutOfRange(0).to_string(),
        "Port 0 is out of valid range (1-65535)"
    );
    assert_eq!(
        ConfigError::InvalidOrigin("bad".into()).to_string(),
        "Invalid allowed origin: bad"
    );
}
