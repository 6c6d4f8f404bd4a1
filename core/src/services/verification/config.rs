//! Configuration for the verification service

use std::time::Duration;

use sv_shared::VerificationConfig;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Seconds a stored code stays valid
    pub code_ttl_seconds: u64,
    /// Minimum seconds between two issuances for the same phone
    pub rate_limit_seconds: u64,
    /// Upper bound on a single store round trip
    pub store_timeout: Duration,
    /// Upper bound on a single SMS provider call
    pub dispatch_timeout: Duration,
    /// Sign name used when the request does not carry one
    pub default_sign_name: String,
    /// Template code used when the request does not carry one
    pub default_template_code: String,
    /// Namespace for stored codes (`{prefix}:{phone}`)
    pub code_key_prefix: String,
    /// Namespace for send markers (`{prefix}:{phone}`)
    pub limit_key_prefix: String,
}

impl VerificationServiceConfig {
    /// Key holding the live code for a phone number
    pub fn code_key(&self, phone: &str) -> String {
        format!("{}:{}", self.code_key_prefix, phone)
    }

    /// Key holding the send marker for a phone number
    pub fn limit_key(&self, phone: &str) -> String {
        format!("{}:{}", self.limit_key_prefix, phone)
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            code_ttl_seconds: config.code_ttl_seconds,
            rate_limit_seconds: config.rate_limit_seconds,
            store_timeout: Duration::from_millis(config.store_timeout_ms),
            dispatch_timeout: Duration::from_millis(config.dispatch_timeout_ms),
            default_sign_name: config.default_sign_name.clone(),
            default_template_code: config.default_template_code.clone(),
            code_key_prefix: config.code_key_prefix.clone(),
            limit_key_prefix: config.limit_key_prefix.clone(),
        }
    }
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self::from(&VerificationConfig::default())
    }
}
