//! SMS provider configuration module

use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variable holding the Alibaba Cloud access key id
pub const ALIBABA_ACCESS_KEY_ID_ENV: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";

/// Environment variable holding the Alibaba Cloud access key secret
pub const ALIBABA_ACCESS_KEY_SECRET_ENV: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";

/// SMS provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Alibaba Cloud Short Message Service
    Aliyun,
    /// Logs messages instead of sending them
    Mock,
}

impl fmt::Display for SmsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmsProvider::Aliyun => write!(f, "aliyun"),
            SmsProvider::Mock => write!(f, "mock"),
        }
    }
}

/// SMS service configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// SMS service provider
    pub provider: SmsProvider,

    /// API access key id
    #[serde(default)]
    pub access_key_id: String,

    /// API access key secret
    #[serde(default)]
    pub access_key_secret: String,

    /// Provider endpoint host, or a full URL for local testing
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Provider region
    #[serde(default = "default_region_id")]
    pub region_id: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::Mock,
            access_key_id: String::new(),
            access_key_secret: String::new(),
            endpoint: default_endpoint(),
            region_id: default_region_id(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// Keeps the secret out of logs when the whole configuration is printed.
impl fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsConfig")
            .field("provider", &self.provider)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"****")
            .field("endpoint", &self.endpoint)
            .field("region_id", &self.region_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl SmsConfig {
    /// Aliyun provider with default endpoint; credentials still need to be supplied
    pub fn aliyun() -> Self {
        Self {
            provider: SmsProvider::Aliyun,
            ..Default::default()
        }
    }

    /// Fill missing credentials from the standard Alibaba Cloud variables
    pub fn apply_credential_env(&mut self) {
        if self.access_key_id.is_empty() {
            if let Ok(id) = std::env::var(ALIBABA_ACCESS_KEY_ID_ENV) {
                self.access_key_id = id;
            }
        }
        if self.access_key_secret.is_empty() {
            if let Ok(secret) = std::env::var(ALIBABA_ACCESS_KEY_SECRET_ENV) {
                self.access_key_secret = secret;
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.provider == SmsProvider::Aliyun
            && (self.access_key_id.is_empty() || self.access_key_secret.is_empty())
        {
            return Err(format!(
                "sms.provider = aliyun requires credentials ({} / {})",
                ALIBABA_ACCESS_KEY_ID_ENV, ALIBABA_ACCESS_KEY_SECRET_ENV
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err("sms.request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    String::from("dysmsapi.aliyuncs.com")
}

fn default_region_id() -> String {
    String::from("cn-hangzhou")
}

fn default_request_timeout_secs() -> u64 {
    10
}
