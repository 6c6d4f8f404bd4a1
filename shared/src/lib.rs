//! Shared utilities and common types for the SMS verification server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and the layered configuration loader
//! - The JSON response envelope returned by every endpoint
//! - Utility functions (phone masking for logs)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheBackend, CacheConfig, ConfigLoadError, Environment, LogFormat,
    LoggingConfig, ServerConfig, SmsConfig, SmsProvider, VerificationConfig,
};
pub use types::{ApiResponse, HealthResponse, HealthStatus, Language, ServiceHealth};
pub use utils::phone;
