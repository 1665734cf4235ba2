use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;
use duration_serde::duration;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// JSON file mapping root token list URLs to display metadata
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,
}

/// Outbound request behaviour for token lists and logo images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_document_timeout", with = "duration")]
    pub document_timeout: Duration,
    #[serde(default = "default_resource_timeout", with = "duration")]
    pub resource_timeout: Duration,
    /// Upper bound on in-flight document fetches for one lookup
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Gateway prefix used to fetch `ipfs://` logo URIs
    #[serde(default = "default_ipfs_gateway")]
    pub ipfs_gateway: String,
}

/// Freshness windows and capacities of the in-memory caches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_document_ttl", with = "duration")]
    pub document_ttl: Duration,
    #[serde(default = "default_resource_ttl", with = "duration")]
    pub resource_ttl: Duration,
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,
    #[serde(default = "default_max_resources")]
    pub max_resources: usize,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_registry_path() -> PathBuf {
    PathBuf::from(DEFAULT_REGISTRY_PATH)
}

// Fetch defaults
fn default_document_timeout() -> Duration {
    Duration::from_secs(DEFAULT_DOCUMENT_TIMEOUT_SECS)
}

fn default_resource_timeout() -> Duration {
    Duration::from_secs(DEFAULT_RESOURCE_TIMEOUT_SECS)
}

fn default_max_concurrent_fetches() -> usize {
    DEFAULT_MAX_CONCURRENT_FETCHES
}

fn default_user_agent() -> String {
    format!("btkn-info/{}", env!("CARGO_PKG_VERSION"))
}

fn default_ipfs_gateway() -> String {
    DEFAULT_IPFS_GATEWAY.to_string()
}

// Cache defaults
fn default_document_ttl() -> Duration {
    Duration::from_secs(DEFAULT_DOCUMENT_TTL_SECS)
}

fn default_resource_ttl() -> Duration {
    Duration::from_secs(DEFAULT_RESOURCE_TTL_SECS)
}

fn default_max_documents() -> usize {
    DEFAULT_MAX_DOCUMENTS
}

fn default_max_resources() -> usize {
    DEFAULT_MAX_RESOURCES
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            document_timeout: default_document_timeout(),
            resource_timeout: default_resource_timeout(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            user_agent: default_user_agent(),
            ipfs_gateway: default_ipfs_gateway(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            document_ttl: default_document_ttl(),
            resource_ttl: default_resource_ttl(),
            max_documents: default_max_documents(),
            max_resources: default_max_resources(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            registry: RegistryConfig::default(),
            fetch: FetchConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_file(&config_file)
    }

    /// Layer defaults, the TOML file and `BTKN_INFO_*` environment variables
    ///
    /// A missing file is created with the default values.
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if !Path::new(config_file).exists() {
            let contents = toml::to_string_pretty(&Self::default())?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
        }

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the resolver unusable
    pub fn validate(&self) -> AppResult<()> {
        if self.fetch.max_concurrent_fetches == 0 {
            return Err(AppError::configuration(
                "fetch.max_concurrent_fetches must be greater than zero",
            ));
        }
        if self.fetch.document_timeout.is_zero() || self.fetch.resource_timeout.is_zero() {
            return Err(AppError::configuration("fetch timeouts must be non-zero"));
        }
        if self.cache.max_documents == 0 || self.cache.max_resources == 0 {
            return Err(AppError::configuration(
                "cache capacities must be greater than zero",
            ));
        }
        if !(self.fetch.ipfs_gateway.starts_with("http://")
            || self.fetch.ipfs_gateway.starts_with("https://"))
        {
            return Err(AppError::configuration(format!(
                "fetch.ipfs_gateway must be an http(s) URL, got '{}'",
                self.fetch.ipfs_gateway
            )));
        }
        Ok(())
    }
}
