use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_DATABASE_URL: &str = "sqlite://beauty_erp.db?mode=rwc";
const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
const DEV_DEFAULT_JWT_SECRET: &str = "development_only_jwt_secret_replace_me_in_production_0123456789";
const DEV_DEFAULT_JWT_REFRESH_SECRET: &str =
    "development_only_refresh_secret_replace_me_in_production_9876543210";

/// Application configuration shared by every service binary.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Port of the user service; the other services listen on the
    /// following ports (see [`AppConfig::service_port`]).
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,

    #[validate(length(min = 1))]
    pub database_url: String,

    #[serde(default = "default_db_max_connections")]
    #[validate(range(min = 1))]
    pub db_max_connections: u32,

    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// HS256 key for access tokens
    #[validate(length(min = 32), custom = "validate_jwt_secret")]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[validate(range(min = 60))]
    pub jwt_expiration: u64,

    #[validate(length(min = 32), custom = "validate_jwt_secret")]
    pub jwt_refresh_secret: String,

    #[validate(range(min = 60))]
    pub jwt_refresh_expiration: u64,

    #[serde(default = "default_rate_limit_window_secs")]
    #[validate(range(min = 1))]
    pub rate_limit_window_secs: u64,

    /// Requests allowed per client per window at the gateway
    #[serde(default = "default_rate_limit_max")]
    #[validate(range(min = 1))]
    pub rate_limit_max: u32,

    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    #[validate(length(min = 1))]
    pub environment: String,

    #[validate(url)]
    pub user_service_url: String,

    #[validate(url)]
    pub inventory_service_url: String,

    #[validate(url)]
    pub order_service_url: String,

    #[serde(default = "default_upstream_timeout_secs")]
    #[validate(range(min = 1))]
    pub upstream_timeout_secs: u64,
}

/// The processes this binary can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceRole {
    User,
    Inventory,
    Order,
    Gateway,
}

impl AppConfig {
    /// Built-in defaults with the development secrets; callers override
    /// fields as needed.
    pub fn new(database_url: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: database_url.into(),
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            auto_migrate: false,
            jwt_secret: DEV_DEFAULT_JWT_SECRET.to_string(),
            jwt_expiration: 3600,
            jwt_refresh_secret: DEV_DEFAULT_JWT_REFRESH_SECRET.to_string(),
            jwt_refresh_expiration: 604_800,
            rate_limit_window_secs: default_rate_limit_window_secs(),
            rate_limit_max: default_rate_limit_max(),
            log_level: default_log_level(),
            log_json: false,
            environment: environment.into(),
            user_service_url: "http://127.0.0.1:8080".to_string(),
            inventory_service_url: "http://127.0.0.1:8081".to_string(),
            order_service_url: "http://127.0.0.1:8082".to_string(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Listening port for a service: user, inventory and order take
    /// `port`, `port + 1` and `port + 2`; the gateway takes `port + 3`.
    pub fn service_port(&self, role: ServiceRole) -> u16 {
        let offset = match role {
            ServiceRole::User => 0,
            ServiceRole::Inventory => 1,
            ServiceRole::Order => 2,
            ServiceRole::Gateway => 3,
        };
        self.port.saturating_add(offset)
    }

    pub fn db_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.db_connect_timeout_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.db_min_connections > self.db_max_connections {
            let mut err = ValidationError::new("db_min_connections");
            err.message = Some("db_min_connections must not exceed db_max_connections".into());
            errors.add("db_min_connections", err);
        }

        if !self.is_development() {
            for (field, value, default) in [
                ("jwt_secret", &self.jwt_secret, DEV_DEFAULT_JWT_SECRET),
                (
                    "jwt_refresh_secret",
                    &self.jwt_refresh_secret,
                    DEV_DEFAULT_JWT_REFRESH_SECRET,
                ),
            ] {
                if value.trim() == default {
                    let mut err = ValidationError::new("jwt_secret_default_dev");
                    err.message = Some(
                        "The bundled development secret must not be used outside development"
                            .into(),
                    );
                    errors.add(field, err);
                }
            }
        }

        if self.jwt_secret == self.jwt_refresh_secret {
            let mut err = ValidationError::new("jwt_refresh_secret");
            err.message = Some("Refresh tokens must be signed with a separate secret".into());
            errors.add("jwt_refresh_secret", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_min_connections() -> u32 {
    1
}

fn default_db_connect_timeout_secs() -> u64 {
    8
}

fn default_rate_limit_window_secs() -> u64 {
    DEFAULT_RATE_LIMIT_WINDOW_SECS
}

fn default_rate_limit_max() -> u32 {
    DEFAULT_RATE_LIMIT_MAX
}

fn default_upstream_timeout_secs() -> u64 {
    30
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_jwt_secret(secret: &str) -> Result<(), ValidationError> {
    let trimmed = secret.trim();

    const DISALLOWED: [&str; 3] = ["your-secret-key", "default-secret-key", "changeme"];
    if DISALLOWED
        .iter()
        .any(|&bad| trimmed.eq_ignore_ascii_case(bad))
    {
        let mut err = ValidationError::new("jwt_secret");
        err.message = Some("JWT secret must be overridden with a secure random value".into());
        return Err(err);
    }

    if let Some(first) = trimmed.chars().next() {
        if trimmed.chars().all(|c| c == first) {
            let mut err = ValidationError::new("jwt_secret");
            err.message = Some("JWT secret cannot be a repeated character sequence".into());
            return Err(err);
        }
    }

    Ok(())
}

/// Initializes tracing using the provided log level as the default filter.
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("beauty_erp={},tower_http=debug,sea_orm=warn", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::new(filter_directive);
    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

fn base_builder() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Config::builder()
        .set_default("host", DEFAULT_HOST)?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("database_url", DEFAULT_DATABASE_URL)?
        .set_default("jwt_secret", DEV_DEFAULT_JWT_SECRET)?
        .set_default("jwt_expiration", 3600)?
        .set_default("jwt_refresh_secret", DEV_DEFAULT_JWT_REFRESH_SECRET)?
        .set_default("jwt_refresh_expiration", 604_800)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("user_service_url", "http://127.0.0.1:8080")?
        .set_default("inventory_service_url", "http://127.0.0.1:8081")?
        .set_default("order_service_url", "http://127.0.0.1:8082")
}

/// Builds and validates configuration from `dir/default.toml`, then
/// `dir/{run_env}.toml`, then `APP__*` environment variables.
pub fn load_config_from(dir: &Path, run_env: &str) -> Result<AppConfig, AppConfigError> {
    let default_file = dir.join("default");
    let env_file = dir.join(run_env);

    let config = base_builder()?
        .set_default("environment", run_env)?
        .add_source(File::with_name(&default_file.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_file.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration security validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    Ok(app_config)
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{RUN_ENV}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = load_config_from(Path::new(CONFIG_DIR), &run_env)?;
    info!("Configuration loaded successfully");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
        writeln!(file, "{}", content).unwrap();
    }

    #[test]
    fn defaults_apply_without_files() {
        let dir = TempDir::new().unwrap();
        let cfg = load_config_from(dir.path(), "development").unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.rate_limit_max, DEFAULT_RATE_LIMIT_MAX);
        assert_eq!(cfg.service_port(ServiceRole::Gateway), DEFAULT_PORT + 3);
        assert!(cfg.is_development());
    }

    #[test]
    fn environment_file_overrides_default_file() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "default.toml", "port = 9000\nlog_level = \"debug\"");
        write_config(&dir, "staging.toml", "port = 9100");

        let err = load_config_from(dir.path(), "staging").unwrap_err();
        // Development secrets are refused outside development.
        match err {
            AppConfigError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("jwt_secret"));
            }
            other => panic!("unexpected error: {other}"),
        }

        write_config(
            &dir,
            "staging.toml",
            "port = 9100\njwt_secret = \"staging_access_secret_with_enough_length_0001\"\njwt_refresh_secret = \"staging_refresh_secret_with_enough_length_0002\"",
        );
        let cfg = load_config_from(dir.path(), "staging").unwrap();
        assert_eq!(cfg.port, 9100);
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.environment, "staging");
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "default.toml", "jwt_secret = \"short\"");
        let result = load_config_from(dir.path(), "development");
        assert!(matches!(result, Err(AppConfigError::Validation(_))));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "default.toml", "log_level = \"loud\"");
        match load_config_from(dir.path(), "development") {
            Err(AppConfigError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("log_level"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn pool_bounds_are_checked() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            "default.toml",
            "db_max_connections = 2\ndb_min_connections = 5",
        );
        assert!(matches!(
            load_config_from(dir.path(), "development"),
            Err(AppConfigError::Validation(_))
        ));
    }
}
