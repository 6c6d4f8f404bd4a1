//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the SMS verification service.
//! It provides concrete implementations of the core traits:
//!
//! - **Cache**: Redis-backed and in-memory verification stores
//! - **SMS**: Alibaba Cloud SMS client and a logging mock sender

/// Cache module - Redis client and verification stores
pub mod cache;

/// SMS service module - External SMS providers
pub mod sms;

pub use cache::{MemoryVerificationStore, RedisClient, RedisVerificationStore};
pub use sms::{create_notification_sender, AliyunSmsSender, MockSmsSender};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),
}
