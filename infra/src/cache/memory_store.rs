//! In-process verification store
//!
//! Holds codes and send markers in a mutex-guarded map with lazy expiry. State
//! is private to one process, so this backend only suits single-instance
//! development setups and tests. Expiry follows the tokio clock.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use sv_core::services::verification::VerificationStore;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::CacheConfig;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Verification store kept in process memory
#[derive(Debug)]
pub struct MemoryVerificationStore {
    entries: Mutex<HashMap<String, Entry>>,
    namespace: CacheConfig,
}

impl Default for MemoryVerificationStore {
    fn default() -> Self {
        Self::with_config(&CacheConfig::memory())
    }
}

impl MemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that namespaces keys like the Redis store does
    pub fn with_config(config: &CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            namespace: config.clone(),
        }
    }

    /// Entries held in the map, expired ones not yet pruned included
    #[cfg(test)]
    pub(crate) fn stored_entries(&self) -> usize {
        self.lock().len()
    }

    fn key(&self, key: &str) -> String {
        self.namespace.make_key(key)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // A panic while holding the lock cannot leave an entry half-written
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lock the map with expired entries already removed
    fn lock_pruned(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        if entries.len() != before {
            debug!("Pruned {} expired verification entries", before - entries.len());
        }
        entries
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.lock()
            .get(&self.key(key))
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone())
    }
}

#[async_trait]
impl VerificationStore for MemoryVerificationStore {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), String> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
        };
        self.lock_pruned().insert(self.key(key), entry);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool, String> {
        let mut entries = self.lock_pruned();
        let key = self.key(key);
        if entries.contains_key(&key) {
            return Ok(false);
        }
        entries.insert(
            key,
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
            },
        );
        Ok(true)
    }

    async fn exists(&self, key: &str) -> Result<bool, String> {
        Ok(self.live_value(key).is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.live_value(key))
    }

    async fn ttl(&self, key: &str) -> Result<Option<u64>, String> {
        let now = Instant::now();
        Ok(self
            .lock()
            .get(&self.key(key))
            .filter(|e| e.is_live(now))
            .map(|e| (e.expires_at - now).as_secs()))
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String> {
        let mut entries = self.lock_pruned();
        let key = self.key(key);
        match entries.get(&key) {
            Some(entry) if entry.value == expected => {
                entries.remove(&key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
