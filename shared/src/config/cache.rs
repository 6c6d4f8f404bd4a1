//! Verification store configuration module

use serde::{Deserialize, Serialize};

/// Backend holding verification codes and send-rate markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Shared Redis instance (required when running more than one replica)
    Redis,
    /// Process-local store, for development without Redis
    Memory,
}

/// Verification store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Store backend
    #[serde(default = "default_backend")]
    pub backend: CacheBackend,

    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Response timeout in seconds
    pub response_timeout: u64,

    /// Optional prefix prepended to every key as `{prefix}:{key}`
    #[serde(default)]
    pub key_prefix: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            response_timeout: 5,
            key_prefix: None,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// In-memory configuration for development and tests
    pub fn memory() -> Self {
        Self {
            backend: CacheBackend::Memory,
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, key),
            _ => key.to_string(),
        }
    }
}

fn default_backend() -> CacheBackend {
    CacheBackend::Redis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.backend, CacheBackend::Redis);
        assert!(config.key_prefix.is_none());
    }

    #[test]
    fn test_cache_config_with_prefix() {
        let config = CacheConfig::new("redis://cache:6379").with_prefix("otp");
        assert_eq!(config.make_key("sms:verify:+8613800001111"), "otp:sms:verify:+8613800001111");
    }

    #[test]
    fn test_cache_key_without_prefix() {
        let config = CacheConfig::memory();
        assert_eq!(config.backend, CacheBackend::Memory);
        assert_eq!(config.make_key("sms:limit:123"), "sms:limit:123");
        assert_eq!(config.with_prefix("").make_key("sms:limit:123"), "sms:limit:123");
    }
}
