//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// "development" or "production"
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ServerConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_access_ttl_minutes")]
    pub access_ttl_minutes: i64,
    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: i64,
}

impl AuthConfig {
    /// Whether the secret was left at the built-in development default
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == default_jwt_secret()
    }
}

/// Minimum allowed TTL for presigned URLs (60 seconds)
const MIN_PRESIGN_TTL_SECS: u64 = 60;

/// Maximum allowed TTL for presigned URLs (86400 seconds = 24 hours),
/// aligned with the S3 maximum presigned URL validity
const MAX_PRESIGN_TTL_SECS: u64 = 86400;

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Use a real S3-compatible backend; when false, mock URLs are served
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub allow_http: bool,
    /// Base URL for mock/fallback material URLs
    #[serde(default = "default_fallback_base")]
    pub fallback_base: String,
    /// Time-to-live for presigned URLs in seconds
    #[serde(default = "default_presign_ttl_secs")]
    pub presign_ttl_secs: u64,
}

impl StorageConfig {
    /// Validate the configured TTL, clamping to [60, 86400] seconds and
    /// logging a warning if adjusted.
    pub fn validated_ttl_secs(&self) -> u64 {
        if self.presign_ttl_secs < MIN_PRESIGN_TTL_SECS {
            warn!(
                "presign_ttl_secs {} is below minimum {}, using minimum",
                self.presign_ttl_secs, MIN_PRESIGN_TTL_SECS
            );
            MIN_PRESIGN_TTL_SECS
        } else if self.presign_ttl_secs > MAX_PRESIGN_TTL_SECS {
            warn!(
                "presign_ttl_secs {} exceeds maximum {}, using maximum",
                self.presign_ttl_secs, MAX_PRESIGN_TTL_SECS
            );
            MAX_PRESIGN_TTL_SECS
        } else {
            self.presign_ttl_secs
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_db_path() -> String {
    "./data/learnhub.db".to_string()
}

fn default_jwt_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_access_ttl_minutes() -> i64 {
    30
}

fn default_refresh_ttl_days() -> i64 {
    7
}

fn default_bucket() -> String {
    "learnhub-materials".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_fallback_base() -> String {
    "http://localhost:8080/static".to_string()
}

fn default_presign_ttl_secs() -> u64 {
    600 // 10 minutes
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            environment: default_environment(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_ttl_minutes: default_access_ttl_minutes(),
            refresh_ttl_days: default_refresh_ttl_days(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bucket: default_bucket(),
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            allow_http: false,
            fallback_base: default_fallback_base(),
            presign_ttl_secs: default_presign_ttl_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }
}
