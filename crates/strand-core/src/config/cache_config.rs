use serde::{Deserialize, Serialize};

use super::defaults;

/// Result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: u64,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_CACHE_ENABLED,
            max_entries: defaults::DEFAULT_CACHE_MAX_ENTRIES,
            ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
        }
    }
}
