//! Verification code lifecycle configuration

use serde::{Deserialize, Serialize};

/// Lifetimes, throttling window and collaborator timeouts for verification codes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Seconds a verification code stays valid
    #[serde(default = "default_code_ttl_seconds")]
    pub code_ttl_seconds: u64,

    /// Seconds during which a phone number cannot request another code
    #[serde(default = "default_rate_limit_seconds")]
    pub rate_limit_seconds: u64,

    /// Upper bound for a single store round trip, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Upper bound for a single SMS dispatch, in milliseconds
    #[serde(default = "default_dispatch_timeout_ms")]
    pub dispatch_timeout_ms: u64,

    /// Sign name used when the caller does not supply one
    #[serde(default = "default_sign_name")]
    pub default_sign_name: String,

    /// Template code used when the caller does not supply one
    #[serde(default = "default_template_code")]
    pub default_template_code: String,

    /// Key namespace for stored codes
    #[serde(default = "default_code_key_prefix")]
    pub code_key_prefix: String,

    /// Key namespace for send-rate markers
    #[serde(default = "default_limit_key_prefix")]
    pub limit_key_prefix: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: default_code_ttl_seconds(),
            rate_limit_seconds: default_rate_limit_seconds(),
            store_timeout_ms: default_store_timeout_ms(),
            dispatch_timeout_ms: default_dispatch_timeout_ms(),
            default_sign_name: default_sign_name(),
            default_template_code: default_template_code(),
            code_key_prefix: default_code_key_prefix(),
            limit_key_prefix: default_limit_key_prefix(),
        }
    }
}

impl VerificationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.code_ttl_seconds == 0 {
            return Err("verification.code_ttl_seconds must be greater than 0".to_string());
        }
        if self.rate_limit_seconds == 0 {
            return Err("verification.rate_limit_seconds must be greater than 0".to_string());
        }
        if self.store_timeout_ms == 0 || self.dispatch_timeout_ms == 0 {
            return Err("verification timeouts must be greater than 0".to_string());
        }
        if self.code_key_prefix == self.limit_key_prefix {
            return Err("verification key prefixes must differ".to_string());
        }
        Ok(())
    }
}

fn default_code_ttl_seconds() -> u64 {
    300 // 5 minutes
}

fn default_rate_limit_seconds() -> u64 {
    60
}

fn default_store_timeout_ms() -> u64 {
    3000
}

fn default_dispatch_timeout_ms() -> u64 {
    10_000
}

fn default_sign_name() -> String {
    String::from("SMS Verify")
}

fn default_template_code() -> String {
    String::from("SMS_306490979")
}

fn default_code_key_prefix() -> String {
    String::from("sms:verify")
}

fn default_limit_key_prefix() -> String {
    String::from("sms:limit")
}
