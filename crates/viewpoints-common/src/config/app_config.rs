//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present).

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
    /// Base URL used for share links; derived from request headers when unset
    #[serde(default)]
    pub public_base_url: Option<String>,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations on startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

/// Identity-provider token settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 secret used to verify provider-issued session tokens
    pub jwt_secret: String,
    /// Expected `iss` claim, if the provider sets one
    #[serde(default)]
    pub jwt_issuer: Option<String>,
}

/// Anonymous session cookie settings
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_session_cookie_max_age_days")]
    pub cookie_max_age_days: i64,
    /// Voting sessions untouched for this long are dropped
    #[serde(default = "default_session_idle_timeout_minutes")]
    pub idle_timeout_minutes: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "viewpoints".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

fn default_session_cookie_name() -> String {
    "vp_session_id".to_string()
}

fn default_session_cookie_max_age_days() -> i64 {
    365
}

fn default_session_idle_timeout_minutes() -> u64 {
    30
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if a required key is missing or a value does not parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &'static str| -> Result<Option<u64>, ConfigError> {
            lookup(key)
                .map(|s| {
                    s.trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidValue(key, s))
                })
                .transpose()
        };

        let port = parsed("API_PORT")?.ok_or(ConfigError::MissingVar("API_PORT"))?;
        let port = u16::try_from(port)
            .map_err(|_| ConfigError::InvalidValue("API_PORT", port.to_string()))?;

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .as_deref()
                    .and_then(Environment::parse)
                    .unwrap_or_default(),
                public_base_url: lookup("PUBLIC_BASE_URL")
                    .map(|s| s.trim().trim_end_matches('/').to_string())
                    .filter(|s| !s.is_empty()),
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parsed("DATABASE_MAX_CONNECTIONS")?
                    .map_or_else(default_max_connections, |v| v as u32),
                min_connections: parsed("DATABASE_MIN_CONNECTIONS")?
                    .map_or_else(default_min_connections, |v| v as u32),
                run_migrations: lookup("DATABASE_RUN_MIGRATIONS")
                    .map_or_else(default_run_migrations, |s| {
                        matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes")
                    }),
            },
            auth: AuthConfig {
                jwt_secret: lookup("AUTH_JWT_SECRET")
                    .ok_or(ConfigError::MissingVar("AUTH_JWT_SECRET"))?,
                jwt_issuer: lookup("AUTH_JWT_ISSUER").filter(|s| !s.is_empty()),
            },
            session: SessionConfig {
                cookie_name: lookup("SESSION_COOKIE_NAME")
                    .unwrap_or_else(default_session_cookie_name),
                cookie_max_age_days: parsed("SESSION_COOKIE_MAX_AGE_DAYS")?
                    .map_or_else(default_session_cookie_max_age_days, |v| v as i64),
                idle_timeout_minutes: parsed("SESSION_IDLE_TIMEOUT_MINUTES")?
                    .unwrap_or_else(default_session_idle_timeout_minutes)
                    .max(1),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parsed("RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .map_or_else(default_requests_per_second, |v| v as u32),
                burst: parsed("RATE_LIMIT_BURST")?.map_or_else(default_burst, |v| v as u32),
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
