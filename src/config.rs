//! Configuration management for the Wikode suggestion engine
//!
//! Strongly-typed configuration read from environment variables, with a `.env`
//! file honoured in development.
//!
//! # Example
//! ```no_run
//! use wikode::Config;
//! let config = Config::from_env().expect("failed to load config");
//! println!("Suggestion limit: {}", config.suggestion.limit);
//! ```

use crate::error::{Error, Result};
use std::time::Duration;
use tracing::info;

/// Default number of articles in a suggestion list
pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// Largest accepted suggestion list size
pub const MAX_SUGGESTION_LIMIT: usize = 100;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Suggestion engine configuration
    pub suggestion: SuggestionConfig,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum connections in pool
    pub max_connections: u32,
    /// Minimum connections to keep open
    pub min_connections: u32,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Idle timeout for connections
    pub idle_timeout: Duration,
    /// Maximum lifetime for connections
    pub max_lifetime: Duration,
    /// Enable statement caching
    pub statement_cache_size: usize,
}

/// Suggestion engine configuration
#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    /// Size of the suggestion list; the waterfall stops once it is reached
    pub limit: usize,
    /// Seed for the random fallback. `None` draws from OS entropy.
    pub random_seed: Option<u64>,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUGGESTION_LIMIT,
            random_seed: None,
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_unchecked()?.validated()
    }

    /// Read environment variables without validating them, so callers can
    /// apply overrides before calling [`Config::validated`]
    pub fn from_env_unchecked() -> Result<Self> {
        // Try to load .env file (ignore if not found)
        dotenvy::dotenv().ok();

        Ok(Self {
            database: DatabaseConfig::from_env()?,
            suggestion: SuggestionConfig::from_env()?,
        })
    }

    /// Validate and log the summary of the final configuration
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        self.log_summary();
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            return Err(Error::InvalidConfig {
                key: "DATABASE_URL",
                message: "database URL cannot be empty".into(),
            });
        }

        if self.database.max_connections < self.database.min_connections {
            return Err(Error::InvalidConfig {
                key: "DB_MAX_CONNECTIONS",
                message: "max_connections must be >= min_connections".into(),
            });
        }

        if self.suggestion.limit == 0 {
            return Err(Error::InvalidConfig {
                key: "SUGGESTION_LIMIT",
                message: "suggestion limit must be at least 1".into(),
            });
        }

        if self.suggestion.limit > MAX_SUGGESTION_LIMIT {
            return Err(Error::InvalidConfig {
                key: "SUGGESTION_LIMIT",
                message: format!("suggestion limit must be at most {}", MAX_SUGGESTION_LIMIT)
                    .into(),
            });
        }

        Ok(())
    }

    /// Log configuration summary (without sensitive data)
    fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  Database:");
        info!("    URL: {}", mask_url(&self.database.url));
        info!(
            "    Pool Size: {}-{}",
            self.database.min_connections, self.database.max_connections
        );
        info!("  Suggestions:");
        info!("    Limit: {}", self.suggestion.limit);
        match self.suggestion.random_seed {
            Some(seed) => info!("    Random seed: {}", seed),
            None => info!("    Random seed: entropy"),
        }
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self> {
        let url = get_env("DATABASE_URL").unwrap_or_else(|_| {
            let user = std::env::var("USER").unwrap_or_else(|_| "postgres".to_string());
            format!("postgres://{}@localhost/wikode", user)
        });

        Ok(Self {
            url,
            max_connections: get_env_or("DB_MAX_CONNECTIONS", "10").parse().unwrap_or(10),
            min_connections: get_env_or("DB_MIN_CONNECTIONS", "1").parse().unwrap_or(1),
            connect_timeout: Duration::from_secs(
                get_env_or("DB_CONNECT_TIMEOUT_SECS", "30")
                    .parse()
                    .unwrap_or(30),
            ),
            idle_timeout: Duration::from_secs(
                get_env_or("DB_IDLE_TIMEOUT_SECS", "600")
                    .parse()
                    .unwrap_or(600),
            ),
            max_lifetime: Duration::from_secs(
                get_env_or("DB_MAX_LIFETIME_SECS", "3600")
                    .parse()
                    .unwrap_or(3600),
            ),
            statement_cache_size: get_env_or("DB_STATEMENT_CACHE_SIZE", "100")
                .parse()
                .unwrap_or(100),
        })
    }
}

impl SuggestionConfig {
    fn from_env() -> Result<Self> {
        let limit = match std::env::var("SUGGESTION_LIMIT") {
            Ok(_) => get_env_parsed("SUGGESTION_LIMIT")?,
            Err(_) => DEFAULT_SUGGESTION_LIMIT,
        };

        let random_seed = match std::env::var("SUGGESTION_RANDOM_SEED") {
            Ok(s) if !s.trim().is_empty() => Some(get_env_parsed("SUGGESTION_RANDOM_SEED")?),
            _ => None,
        };

        Ok(Self { limit, random_seed })
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get required environment variable
fn get_env(key: &'static str) -> Result<String> {
    std::env::var(key).map_err(|_| Error::MissingEnvVar { var: key })
}

/// Get environment variable with default
fn get_env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get and parse environment variable
fn get_env_parsed<T: std::str::FromStr>(key: &'static str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    let value = get_env(key)?;
    value.trim().parse().map_err(|e: T::Err| Error::InvalidConfig {
        key,
        message: format!("Invalid value '{}': {}", value, e).into(),
    })
}

/// Mask sensitive parts of URL
fn mask_url(url: &str) -> String {
    let start = url.find("://").map_or(0, |i| i + 3);
    // The last '@' ends the userinfo; earlier ones belong to the password
    if let Some(at_pos) = url[start..].rfind('@').map(|i| start + i) {
        if let Some(colon_pos) = url[start..at_pos].find(':').map(|i| start + i) {
            return format!("{}****{}", &url[..=colon_pos], &url[at_pos..]);
        }
    }
    url.to_string()
}
