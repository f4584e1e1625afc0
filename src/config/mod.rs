//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Output format for the console log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind the HTTP server to
    pub host: String,

    /// Server port
    pub port: u16,

    /// SQLite connection URL (e.g. `sqlite:./data/catalog.db` or `sqlite::memory:`)
    pub database_url: String,

    /// Maximum pool size
    pub database_max_connections: u32,

    /// JWT signing secret. When unset, a secret is generated once and kept in `auth_secrets`.
    pub jwt_secret: Option<String>,

    /// Access token lifetime in seconds
    pub access_token_lifetime: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_lifetime: i64,

    /// Bcrypt cost factor
    pub bcrypt_cost: u32,

    /// Whether catalog mutations require a valid bearer token
    pub require_auth: bool,

    /// Login created on startup if it does not exist yet
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Prefer DATABASE_PATH, fall back to DATABASE_URL
        let database_url = match lookup("DATABASE_PATH") {
            Some(path) if !path.starts_with("sqlite:") => format!("sqlite:{}", path),
            Some(url) => url,
            None => lookup("DATABASE_URL").unwrap_or_else(|| "sqlite:./data/catalog.db".to_string()),
        };

        let jwt_secret = lookup("JWT_SECRET")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("pretty") | Some("text") => LogFormat::Pretty,
            _ => LogFormat::Json,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            jwt_secret,

            access_token_lifetime: lookup("ACCESS_TOKEN_LIFETIME")
                .map(|s| s.parse())
                .transpose()
                .context("Invalid ACCESS_TOKEN_LIFETIME")?
                .unwrap_or(5 * 60),

            refresh_token_lifetime: lookup("REFRESH_TOKEN_LIFETIME")
                .map(|s| s.parse())
                .transpose()
                .context("Invalid REFRESH_TOKEN_LIFETIME")?
                .unwrap_or(7 * 24 * 60 * 60),

            bcrypt_cost: lookup("BCRYPT_COST")
                .and_then(|s| s.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),

            require_auth: lookup("REQUIRE_AUTH")
                .map(|v| parse_flag(&v))
                .transpose()
                .context("Invalid REQUIRE_AUTH")?
                .unwrap_or(true),

            admin_username: lookup("ADMIN_USERNAME").filter(|s| !s.is_empty()),
            admin_password: lookup("ADMIN_PASSWORD").filter(|s| !s.is_empty()),

            log_format,
        })
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a boolean switch, case-insensitive
fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected true/false, got {:?}", other),
    }
}
