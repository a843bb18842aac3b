//! Process configuration, read from `B16_*` environment variables.

use std::collections::HashMap;
use std::net::SocketAddr;

use b16_auth::token::DEFAULT_ISSUER;
use b16_auth::JwtIssuerConfig;
use b16_observability::LogFormat;
use chrono::Duration;
use thiserror::Error;

pub const BIND_ADDR: &str = "B16_BIND_ADDR";
pub const TOKEN_SECRET: &str = "B16_TOKEN_SECRET";
pub const TOKEN_ISSUER: &str = "B16_TOKEN_ISSUER";
pub const TOKEN_TTL_SECS: &str = "B16_TOKEN_TTL_SECS";
pub const BASIC_AUTH_USERS: &str = "B16_BASIC_AUTH_USERS";
pub const BASIC_AUTH_HASHED: &str = "B16_BASIC_AUTH_HASHED";
pub const LOG_FORMAT: &str = "B16_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            reason: reason.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub issuer: String,
    pub lifetime: Duration,
}

impl core::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

#[derive(Clone)]
pub struct BasicAuthSettings {
    /// username → password, or username → bcrypt hash when `hashed` is set.
    pub users: HashMap<String, String>,
    pub hashed: bool,
}

impl core::fmt::Debug for BasicAuthSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut users: Vec<&str> = self.users.keys().map(String::as_str).collect();
        users.sort_unstable();
        f.debug_struct("BasicAuthSettings")
            .field("users", &users)
            .field("hashed", &self.hashed)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub token: TokenSettings,
    pub basic_auth: BasicAuthSettings,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get(BIND_ADDR)
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid(BIND_ADDR, e))?;

        let secret = get(TOKEN_SECRET).ok_or(ConfigError::Missing(TOKEN_SECRET))?;
        let issuer = get(TOKEN_ISSUER).unwrap_or_else(|| DEFAULT_ISSUER.to_string());
        let lifetime = match get(TOKEN_TTL_SECS) {
            Some(raw) => parse_ttl(&raw)?,
            None => Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        };

        let users = get(BASIC_AUTH_USERS).ok_or(ConfigError::Missing(BASIC_AUTH_USERS))?;
        let users: HashMap<String, String> =
            serde_json::from_str(&users).map_err(|e| ConfigError::invalid(BASIC_AUTH_USERS, e))?;
        let hashed = match get(BASIC_AUTH_HASHED) {
            Some(raw) => parse_bool(BASIC_AUTH_HASHED, &raw)?,
            None => false,
        };

        let log_format = match get(LOG_FORMAT) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid(LOG_FORMAT, e))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            token: TokenSettings {
                secret,
                issuer,
                lifetime,
            },
            basic_auth: BasicAuthSettings { users, hashed },
            log_format,
        })
    }

    pub fn issuer_config(&self) -> JwtIssuerConfig {
        JwtIssuerConfig::new(self.token.secret.as_bytes())
            .with_issuer(self.token.issuer.clone())
            .with_lifetime(self.token.lifetime)
    }
}

fn parse_ttl(raw: &str) -> Result<Duration, ConfigError> {
    let secs = raw
        .trim()
        .parse::<i64>()
        .map_err(|e| ConfigError::invalid(TOKEN_TTL_SECS, e))?;
    if secs <= 0 {
        return Err(ConfigError::invalid(TOKEN_TTL_SECS, "must be a positive number of seconds"));
    }
    Duration::try_seconds(secs).ok_or_else(|| ConfigError::invalid(TOKEN_TTL_SECS, "out of range"))
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::invalid(key, format!("expected a boolean, got '{other}'"))),
    }
}
