/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// Registry defaults
pub const DEFAULT_REGISTRY_PATH: &str = "./token-lists.json";

// Fetch defaults
pub const DEFAULT_DOCUMENT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RESOURCE_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 16;
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

// Cache defaults
pub const DEFAULT_DOCUMENT_TTL_SECS: u64 = 60 * 60; // 1 hour
pub const DEFAULT_RESOURCE_TTL_SECS: u64 = 24 * 60 * 60; // 24 hours
pub const DEFAULT_MAX_DOCUMENTS: usize = 1024;
pub const DEFAULT_MAX_RESOURCES: usize = 2048;

// Environment override prefix (nested keys separated by `__`)
pub const ENV_PREFIX: &str = "BTKN_INFO_";
