//! Verification code entity for SMS-based phone verification.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Smallest code the generator may produce
pub const CODE_MIN: u32 = 1000;

/// Largest code the generator may produce
pub const CODE_MAX: u32 = 9999;

/// A verification code that has been stored and handed to the SMS provider
///
/// The store is the source of truth for whether the code is still live; this
/// entity only records what was issued and the deadlines computed at issue time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCode {
    /// Phone number the code was sent to, exactly as supplied by the caller
    pub phone: String,

    /// The 4-digit verification code
    pub code: String,

    /// Timestamp when the code was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp after which the store no longer holds the code
    pub expires_at: DateTime<Utc>,

    /// Timestamp after which another code may be requested for this phone
    pub resend_available_at: DateTime<Utc>,
}

impl IssuedCode {
    /// Record a freshly issued code
    ///
    /// # Arguments
    ///
    /// * `phone` - The phone number, used verbatim as the store key
    /// * `code` - The generated code
    /// * `code_ttl_seconds` - Lifetime of the stored code
    /// * `rate_limit_seconds` - Lifetime of the per-phone send marker
    pub fn new(phone: String, code: String, code_ttl_seconds: u64, rate_limit_seconds: u64) -> Self {
        let now = Utc::now();

        Self {
            phone,
            code,
            issued_at: now,
            expires_at: now + seconds(code_ttl_seconds),
            resend_available_at: now + seconds(rate_limit_seconds),
        }
    }
}

fn seconds(value: u64) -> Duration {
    Duration::seconds(i64::try_from(value).unwrap_or(i64::MAX / 1000))
}
