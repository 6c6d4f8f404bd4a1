//! Traits for store, SMS, and code generation integration

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

/// Opaque provider acknowledgement, passed through to callers unchanged
pub type ProviderResponse = Value;

/// Shared key-value store with per-key expiry
///
/// Implementations must be safe for concurrent use from many requests and
/// many service replicas. Errors are returned as plain messages; the service
/// maps them to `VerificationError::StoreUnavailable`.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Store a value with an expiry, replacing any previous value and expiry
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), String>;

    /// Store a value with an expiry only when the key is absent
    ///
    /// Returns `true` when this call created the key. Exactly one of several
    /// concurrent callers observes `true`.
    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool, String>;

    /// Check if a live key exists
    async fn exists(&self, key: &str) -> Result<bool, String>;

    /// Read a live value
    async fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Remaining lifetime of a live key in seconds
    async fn ttl(&self, key: &str) -> Result<Option<u64>, String>;

    /// Delete a key only if it still holds `expected`
    ///
    /// Returns `true` when this call removed the value. Exactly one of several
    /// concurrent callers observes `true` for the same stored value.
    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String>;

    /// Check store connectivity
    async fn health_check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Templated SMS to deliver through a provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmsMessage {
    pub phone_number: String,
    pub sign_name: String,
    pub template_code: String,
    pub template_param: Value,
}

impl SmsMessage {
    /// Build the verification message; the template receives `{"code": "<code>"}`
    pub fn verification(phone_number: &str, sign_name: &str, template_code: &str, code: &str) -> Self {
        Self {
            phone_number: phone_number.to_string(),
            sign_name: sign_name.to_string(),
            template_code: template_code.to_string(),
            template_param: json!({ "code": code }),
        }
    }
}

/// Trait for SMS provider integration
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver a templated SMS, returning the provider's acknowledgement
    async fn send(&self, message: &SmsMessage) -> Result<ProviderResponse, String>;

    /// Provider name for logs and health reports
    fn provider_name(&self) -> &str;

    /// Check provider readiness without sending anything
    async fn is_available(&self) -> bool {
        true
    }
}

/// Source of verification codes
pub trait CodeGenerator: Send + Sync {
    /// Produce a fresh code
    fn generate(&self) -> String;
}
