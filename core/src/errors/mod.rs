//! Domain-specific error types and error handling.

use thiserror::Error;

/// Failures of the verification workflow
///
/// Client errors (bad input, throttling, wrong or expired code) are expected
/// outcomes and carry no internal detail. Infrastructure errors carry a message
/// for logs only; the API layer never echoes it to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Phone number is required")]
    MissingPhoneNumber,

    #[error("Phone number and code are required")]
    MissingInput,

    #[error("Too many requests, retry after {retry_after_seconds:?} seconds")]
    RateLimited { retry_after_seconds: Option<u64> },

    #[error("Verification code has expired or was never issued")]
    CodeExpired,

    #[error("Verification code does not match")]
    CodeMismatch,

    #[error("SMS dispatch failed: {message}")]
    DispatchFailed { message: String },

    #[error("Verification store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Operation timed out: {operation}")]
    Timeout { operation: &'static str },
}

impl VerificationError {
    /// Stable machine-readable identifier, used as the `error` field of API responses
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::MissingPhoneNumber => "missing_phone_number",
            VerificationError::MissingInput => "missing_input",
            VerificationError::RateLimited { .. } => "rate_limited",
            VerificationError::CodeExpired => "code_expired",
            VerificationError::CodeMismatch => "code_mismatch",
            VerificationError::DispatchFailed { .. } => "sms_dispatch_failed",
            VerificationError::StoreUnavailable { .. } => "store_unavailable",
            VerificationError::Timeout { .. } => "timeout",
        }
    }

    /// Whether the caller caused the failure and can fix it by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            VerificationError::MissingPhoneNumber
                | VerificationError::MissingInput
                | VerificationError::RateLimited { .. }
                | VerificationError::CodeExpired
                | VerificationError::CodeMismatch
        )
    }

    /// Whether retrying the same request later may succeed without caller changes
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VerificationError::RateLimited { .. }
                | VerificationError::StoreUnavailable { .. }
                | VerificationError::Timeout { .. }
        )
    }
}

pub type VerificationResult<T> = Result<T, VerificationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = vec![
            VerificationError::MissingPhoneNumber,
            VerificationError::MissingInput,
            VerificationError::RateLimited { retry_after_seconds: Some(42) },
            VerificationError::CodeExpired,
            VerificationError::CodeMismatch,
            VerificationError::DispatchFailed { message: "x".to_string() },
            VerificationError::StoreUnavailable { message: "x".to_string() },
            VerificationError::Timeout { operation: "store_code" },
        ];

        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_error_classification() {
        assert!(VerificationError::CodeMismatch.is_client_error());
        assert!(!VerificationError::CodeMismatch.is_transient());

        let limited = VerificationError::RateLimited { retry_after_seconds: None };
        assert!(limited.is_client_error());
        assert!(limited.is_transient());

        let store = VerificationError::StoreUnavailable { message: "refused".to_string() };
        assert!(!store.is_client_error());
        assert!(store.is_transient());

        let dispatch = VerificationError::DispatchFailed { message: "isv.BUSINESS_LIMIT_CONTROL".to_string() };
        assert!(!dispatch.is_client_error());
        assert!(!dispatch.is_transient());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            VerificationError::Timeout { operation: "sms_dispatch" }.to_string(),
            "Operation timed out: sms_dispatch"
        );
        assert_eq!(
            VerificationError::DispatchFailed { message: "quota".to_string() }.to_string(),
            "SMS dispatch failed: quota"
        );
    }
}
