//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Environment variable {0} is not set; upstream API keys have no default")]
    MissingCredential(String),
}

/// Upstream API credential. Never printed.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(<redacted>)")
    }
}

/// Upstream game-statistics API configuration.
///
/// `identity_url` may use `{region}`, `{name}` and `{tag}`; `rank_url` may use
/// `{region}` and `{puuid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_identity_url")]
    pub identity_url: String,

    #[serde(default = "default_rank_url")]
    pub rank_url: String,

    /// Environment variable holding the identity API key
    #[serde(default = "default_identity_key_env")]
    pub identity_key_env: String,

    /// Header the identity key is sent in; only identity requests carry it
    #[serde(default = "default_identity_key_header")]
    pub identity_key_header: String,

    /// Environment variable holding the rank API key
    #[serde(default = "default_rank_key_env")]
    pub rank_key_env: String,

    /// Header the rank key is sent in; only rank requests carry it
    #[serde(default = "default_rank_key_header")]
    pub rank_key_header: String,

    /// Region used for identity lookups
    #[serde(default = "default_identity_region")]
    pub identity_region: String,

    /// Default region used for rank lookups
    #[serde(default = "default_rank_region")]
    pub rank_region: String,

    #[serde(default = "default_allowed_regions")]
    pub allowed_regions: Vec<String>,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Fail lookups whose rank payload matches no known shape
    #[serde(default)]
    pub strict_shapes: bool,
}

fn default_identity_url() -> String {
    "https://{region}.api.riotgames.com/riot/account/v1/accounts/by-riot-id/{name}/{tag}"
        .to_string()
}

fn default_rank_url() -> String {
    "https://api.henrikdev.xyz/valorant/v2/by-puuid/mmr/{region}/{puuid}".to_string()
}

fn default_identity_key_env() -> String {
    "RIOT_API_KEY".to_string()
}

fn default_identity_key_header() -> String {
    "X-Riot-Token".to_string()
}

fn default_rank_key_env() -> String {
    "HENRIK_API_KEY".to_string()
}

fn default_rank_key_header() -> String {
    "Authorization".to_string()
}

fn default_identity_region() -> String {
    "europe".to_string()
}

fn default_rank_region() -> String {
    "eu".to_string()
}

fn default_allowed_regions() -> Vec<String> {
    ["americas", "asia", "europe", "ap", "br", "eu", "kr", "latam", "na"]
        .iter()
        .map(|r| r.to_string())
        .collect()
}

fn default_timeout() -> u64 {
    12
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            identity_url: default_identity_url(),
            rank_url: default_rank_url(),
            identity_key_env: default_identity_key_env(),
            identity_key_header: default_identity_key_header(),
            rank_key_env: default_rank_key_env(),
            rank_key_header: default_rank_key_header(),
            identity_region: default_identity_region(),
            rank_region: default_rank_region(),
            allowed_regions: default_allowed_regions(),
            timeout_seconds: default_timeout(),
            strict_shapes: false,
        }
    }
}

fn key_from_env(name: &str) -> Result<ApiKey, ConfigError> {
    match std::env::var(name) {
        Ok(key) if !key.trim().is_empty() => Ok(ApiKey::new(key.trim())),
        _ => Err(ConfigError::MissingCredential(name.to_string())),
    }
}

impl UpstreamConfig {
    /// Read the identity API key from `identity_key_env`.
    pub fn identity_key(&self) -> Result<ApiKey, ConfigError> {
        key_from_env(&self.identity_key_env)
    }

    /// Read the rank API key from `rank_key_env`.
    pub fn rank_key(&self) -> Result<ApiKey, ConfigError> {
        key_from_env(&self.rank_key_env)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Domain verification file served at `/riot.txt`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file at the given path; built-in defaults were used
    Defaults(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "config file {}", path.display()),
            ConfigSource::Defaults(path) => {
                write!(f, "built-in defaults (no config at {})", path.display())
            }
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub verification: VerificationConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            verification: VerificationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to built-in defaults.
    ///
    /// Runs before logging is set up, so the caller reports the returned
    /// `ConfigSource` once it can.
    pub fn load_or_default(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        if path.exists() {
            let config = Self::from_file(path)?;
            Ok((config, ConfigSource::File(path.to_path_buf())))
        } else {
            let config = Self::default();
            config.validate()?;
            Ok((config, ConfigSource::Defaults(path.to_path_buf())))
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let upstream = &self.upstream;

        if upstream.timeout_seconds == 0 || upstream.timeout_seconds > 60 {
            return Err(ConfigError::ValidationError(
                "Upstream timeout must be between 1 and 60 seconds".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        for (field, value) in [
            ("identity_key_env", &upstream.identity_key_env),
            ("identity_key_header", &upstream.identity_key_header),
            ("rank_key_env", &upstream.rank_key_env),
            ("rank_key_header", &upstream.rank_key_header),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }

        if upstream.allowed_regions.is_empty() {
            return Err(ConfigError::ValidationError(
                "allowed_regions must list at least one region".to_string(),
            ));
        }

        for (field, region) in [
            ("identity_region", &upstream.identity_region),
            ("rank_region", &upstream.rank_region),
        ] {
            if !upstream
                .allowed_regions
                .iter()
                .any(|r| r.eq_ignore_ascii_case(region))
            {
                return Err(ConfigError::ValidationError(format!(
                    "{} \"{}\" is not in allowed_regions",
                    field, region
                )));
            }
        }

        for placeholder in ["{name}", "{tag}"] {
            if !upstream.identity_url.contains(placeholder) {
                return Err(ConfigError::ValidationError(format!(
                    "identity_url must contain {}",
                    placeholder
                )));
            }
        }

        if !upstream.rank_url.contains("{puuid}") {
            return Err(ConfigError::ValidationError(
                "rank_url must contain {puuid}".to_string(),
            ));
        }

        Ok(())
    }
}
