//! Redis-backed verification store
//!
//! Keys are namespaced by the optional cache key prefix, so several services can
//! share one Redis database:
//! - `{prefix}:sms:verify:{phone}` - Stores the live verification code
//! - `{prefix}:sms:limit:{phone}` - Send-rate marker

use async_trait::async_trait;
use sv_core::services::verification::VerificationStore;

use crate::cache::RedisClient;

/// Verification store on a shared Redis instance
///
/// Every operation maps to a single Redis command or script, so concurrent
/// requests across replicas see one consistent view.
#[derive(Clone)]
pub struct RedisVerificationStore {
    /// Redis client for cache operations
    redis_client: RedisClient,
}

impl RedisVerificationStore {
    /// Create a new verification store
    ///
    /// # Example
    /// ```no_run
    /// use sv_infra::cache::{CacheConfig, RedisClient, RedisVerificationStore};
    ///
    /// async fn create_store() -> Result<RedisVerificationStore, Box<dyn std::error::Error>> {
    ///     let client = RedisClient::new(CacheConfig::new("redis://localhost:6379")).await?;
    ///     Ok(RedisVerificationStore::new(client))
    /// }
    /// ```
    pub fn new(redis_client: RedisClient) -> Self {
        Self { redis_client }
    }

    fn key(&self, key: &str) -> String {
        self.redis_client.config().make_key(key)
    }
}

#[async_trait]
impl VerificationStore for RedisVerificationStore {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), String> {
        self.redis_client
            .set_with_expiry(&self.key(key), value, ttl_seconds)
            .await
            .map_err(|e| e.to_string())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool, String> {
        self.redis_client
            .set_nx_with_expiry(&self.key(key), value, ttl_seconds)
            .await
            .map_err(|e| e.to_string())
    }

    async fn exists(&self, key: &str) -> Result<bool, String> {
        self.redis_client
            .exists(&self.key(key))
            .await
            .map_err(|e| e.to_string())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.redis_client
            .get(&self.key(key))
            .await
            .map_err(|e| e.to_string())
    }

    async fn ttl(&self, key: &str) -> Result<Option<u64>, String> {
        self.redis_client
            .ttl(&self.key(key))
            .await
            .map_err(|e| e.to_string())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String> {
        self.redis_client
            .delete_if_equals(&self.key(key), expected)
            .await
            .map_err(|e| e.to_string())
    }

    async fn health_check(&self) -> Result<(), String> {
        match self.redis_client.health_check().await {
            Ok(true) => Ok(()),
            Ok(false) => Err("Unexpected PING response".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }
}
