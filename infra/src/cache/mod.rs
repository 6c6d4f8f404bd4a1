//! Cache module for verification state
//!
//! This module provides the verification store implementations: a Redis-backed
//! store for shared deployments and an in-process store for development.

pub mod memory_store;
pub mod redis_client;
pub mod verification_cache;


pub use memory_store::MemoryVerificationStore;
pub use redis_client::RedisClient;
pub use verification_cache::RedisVerificationStore;

// Re-export commonly used types
pub use sv_shared::config::CacheConfig;
