//! Environment-backed application configuration.
//!
//! Reads `.env` via `dotenvy`, then the process environment. Every variable is
//! prefixed `APP_`; the full set is documented in `.env.example` at the
//! repository root. Secrets and the database URL have no defaults and must be
//! provided.

use std::env;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Deployment environment the application runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Invalid {
                var: "APP_ENV",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: AppEnvironment,
    pub host: String,
    pub port: u16,
    pub worker_count: usize,
    pub database_url: String,
    pub cors_allowed_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub refresh_token_secret: String,
    pub refresh_token_exp_days: i64,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            env: env_or("APP_ENV", "development").parse()?,
            host: env_or("APP_HOST", "127.0.0.1"),
            port: parse_or("APP_PORT", 8080)?,
            worker_count: parse_or("APP_WORKER_COUNT", default_worker_count())?,
            database_url: required("APP_DATABASE_URL")?,
            cors_allowed_origins: split_origins(&env_or("APP_CORS_ALLOWED_ORIGINS", "*")),
            jwt_secret: required("APP_JWT_SECRET")?,
            jwt_expiration_minutes: parse_or("APP_JWT_EXPIRATION_MINUTES", 15)?,
            refresh_token_secret: required("APP_REFRESH_TOKEN_SECRET")?,
            refresh_token_exp_days: parse_or("APP_REFRESH_TOKEN_EXP_DAYS", 7)?,
        })
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn env_or(var: &'static str, default: &str) -> String {
    env::var(var).unwrap_or_else(|_| default.to_string())
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::Missing(var))
}

fn parse_or<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated origin list, dropping empty segments.
fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
