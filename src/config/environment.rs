// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, database, identity, generation and history settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/pierre_coach.db";
/// Default OpenAI-compatible endpoint
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Default chat model for plan generation
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
/// Upper bound on a single generation call
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;
/// Audience claim issued by the hosted identity service
pub const DEFAULT_JWT_AUDIENCE: &str = "authenticated";
/// Identifier returned by the preview identity
pub const DEFAULT_PREVIEW_USER_ID: &str = "0000-preview-user";

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Deployed service
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        let path_str = path_str.strip_prefix("//").unwrap_or(path_str);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(DEFAULT_DATABASE_URL)
    }
}

/// How bearer tokens are verified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityMode {
    /// Verify HS256 tokens locally with the shared secret
    #[default]
    Jwt,
    /// Ask the identity service who the token belongs to
    Remote,
    /// Fixed preview identity; only in `dev-identity` builds outside production
    Stub,
}

impl IdentityMode {
    /// Parse from the `IDENTITY_MODE` value
    ///
    /// # Errors
    ///
    /// Returns an error for unknown modes
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "jwt" => Ok(Self::Jwt),
            "remote" => Ok(Self::Remote),
            "stub" => Ok(Self::Stub),
            other => Err(anyhow::anyhow!(
                "Invalid IDENTITY_MODE '{other}', expected jwt, remote or stub"
            )),
        }
    }
}

impl fmt::Display for IdentityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt => write!(f, "jwt"),
            Self::Remote => write!(f, "remote"),
            Self::Stub => write!(f, "stub"),
        }
    }
}

/// Identity verification settings
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Verification strategy
    pub mode: IdentityMode,
    /// Shared HS256 secret for `jwt` mode
    pub jwt_secret: Option<String>,
    /// Expected `aud` claim
    pub jwt_audience: String,
    /// Identity service base URL for `remote` mode
    pub service_url: Option<String>,
    /// API key sent alongside the bearer token in `remote` mode
    pub service_api_key: Option<String>,
    /// Subject returned in `stub` mode
    pub preview_user_id: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            mode: IdentityMode::default(),
            jwt_secret: None,
            jwt_audience: DEFAULT_JWT_AUDIENCE.to_owned(),
            service_url: None,
            service_api_key: None,
            preview_user_id: DEFAULT_PREVIEW_USER_ID.to_owned(),
        }
    }
}

/// Text-generation service settings
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// API key for the OpenAI-compatible endpoint
    pub api_key: Option<String>,
    /// Endpoint base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Bound on a single generation call
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_owned(),
            model: DEFAULT_OPENAI_MODEL.to_owned(),
            temperature: 0.7,
            timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
        }
    }
}

/// Exertion history window used as prompt context
#[derive(Debug, Clone, Copy)]
pub struct HistoryConfig {
    /// Days of exercise log considered
    pub lookback_days: u32,
    /// Maximum number of exercises reported
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            lookback_days: 56,
            limit: 30,
        }
    }
}

/// Server configuration loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database location
    pub database_url: DatabaseUrl,
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
    /// Identity verification
    pub identity: IdentityConfig,
    /// Text generation
    pub generation: GenerationConfig,
    /// History aggregation
    pub history: HistoryConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a value fails to parse or the combination is invalid
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            database_url: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL)),
            cors_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
            identity: IdentityConfig {
                mode: IdentityMode::parse(&env_var_or("IDENTITY_MODE", "jwt"))?,
                jwt_secret: env_var_opt("IDENTITY_JWT_SECRET"),
                jwt_audience: env_var_or("IDENTITY_JWT_AUDIENCE", DEFAULT_JWT_AUDIENCE),
                service_url: env_var_opt("IDENTITY_SERVICE_URL"),
                service_api_key: env_var_opt("IDENTITY_SERVICE_API_KEY"),
                preview_user_id: env_var_or("DEV_PREVIEW_USER_ID", DEFAULT_PREVIEW_USER_ID),
            },
            generation: GenerationConfig {
                api_key: env_var_opt("OPENAI_API_KEY"),
                base_url: env_var_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
                model: env_var_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
                temperature: env_var_or("GENERATION_TEMPERATURE", "0.7")
                    .parse()
                    .context("Invalid GENERATION_TEMPERATURE value")?,
                timeout: Duration::from_secs(
                    env_var_or(
                        "GENERATION_TIMEOUT_SECS",
                        &DEFAULT_GENERATION_TIMEOUT_SECS.to_string(),
                    )
                    .parse()
                    .context("Invalid GENERATION_TIMEOUT_SECS value")?,
                ),
            },
            history: HistoryConfig {
                lookback_days: env_var_or("HISTORY_LOOKBACK_DAYS", "56")
                    .parse()
                    .context("Invalid HISTORY_LOOKBACK_DAYS value")?,
                limit: env_var_or("HISTORY_LIMIT", "30")
                    .parse()
                    .context("Invalid HISTORY_LIMIT value")?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error when the identity mode cannot run in this build or environment
    pub fn validate(&self) -> Result<()> {
        match self.identity.mode {
            IdentityMode::Jwt if self.identity.jwt_secret.is_none() => {
                return Err(anyhow::anyhow!(
                    "IDENTITY_MODE=jwt requires IDENTITY_JWT_SECRET"
                ));
            }
            IdentityMode::Remote if self.identity.service_url.is_none() => {
                return Err(anyhow::anyhow!(
                    "IDENTITY_MODE=remote requires IDENTITY_SERVICE_URL"
                ));
            }
            IdentityMode::Stub => {
                if self.environment.is_production() {
                    return Err(anyhow::anyhow!(
                        "IDENTITY_MODE=stub is not allowed when ENVIRONMENT=production"
                    ));
                }
                if !cfg!(feature = "dev-identity") {
                    return Err(anyhow::anyhow!(
                        "IDENTITY_MODE=stub requires a build with the dev-identity feature"
                    ));
                }
            }
            _ => {}
        }

        if self.generation.timeout.is_zero() {
            return Err(anyhow::anyhow!("GENERATION_TIMEOUT_SECS must be positive"));
        }

        if self.generation.api_key.is_none() {
            warn!("OPENAI_API_KEY is not set; plan generation requests will fail");
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Pierre Coach Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Identity Mode: {}\n\
             - Generation Model: {} ({})\n\
             - Generation Timeout: {}s\n\
             - Generation API Key: {}\n\
             - History Window: {} days, top {}\n\
             - CORS Origins: {}",
            self.http_port,
            self.environment,
            if self.database_url.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.identity.mode,
            self.generation.model,
            self.generation.base_url,
            self.generation.timeout.as_secs(),
            if self.generation.api_key.is_some() {
                "Configured"
            } else {
                "Missing"
            },
            self.history.lookback_days,
            self.history.limit,
            self.cors_origins.join(", "),
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Get a non-empty environment variable
fn env_var_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse comma-separated origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    origins_str
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        assert_eq!(DatabaseUrl::parse_url("sqlite::memory:"), DatabaseUrl::Memory);
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/coach.db").to_connection_string(),
            "sqlite:./data/coach.db"
        );
        assert_eq!(
            DatabaseUrl::parse_url("coach.db"),
            DatabaseUrl::SQLite {
                path: PathBuf::from("coach.db")
            }
        );
    }

    #[test]
    fn test_identity_mode_parsing() {
        assert_eq!(IdentityMode::parse("JWT").unwrap(), IdentityMode::Jwt);
        assert_eq!(IdentityMode::parse("remote").unwrap(), IdentityMode::Remote);
        assert!(IdentityMode::parse("hostname").is_err());
    }

    #[test]
    fn test_stub_identity_rejected_in_production() {
        let config = ServerConfig {
            environment: Environment::Production,
            identity: IdentityConfig {
                mode: IdentityMode::Stub,
                ..IdentityConfig::default()
            },
            ..ServerConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("production"));
    }

    #[test]
    fn test_jwt_mode_requires_secret() {
        let config = ServerConfig::default();
        assert!(config.validate().is_err());

        let config = ServerConfig {
            identity: IdentityConfig {
                jwt_secret: Some("secret".to_owned()),
                ..IdentityConfig::default()
            },
            ..ServerConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("https://a.example, https://b.example,"),
            vec!["https://a.example", "https://b.example"]
        );
    }
}
