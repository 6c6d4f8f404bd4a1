//! Main verification service implementation

use std::future::Future;
use std::sync::Arc;

use constant_time_eq::constant_time_eq;
use sv_shared::utils::phone::mask_phone_number;
use tokio::time::timeout;

use crate::domain::entities::verification_code::IssuedCode;
use crate::errors::{VerificationError, VerificationResult};

use super::config::VerificationServiceConfig;
use super::generator::RandomCodeGenerator;
use super::traits::{CodeGenerator, NotificationSender, SmsMessage, VerificationStore};
use super::types::{CodeStatus, IssueOutcome};

/// Value stored under the send marker; only its presence matters
const RATE_LIMIT_MARKER: &str = "1";

/// Issues and verifies SMS codes on top of a shared store
///
/// Holds no per-request state of its own, so a single instance is shared by
/// every worker and any number of replicas can point at the same store.
pub struct VerificationManager<S: ?Sized, N: ?Sized> {
    /// Shared store holding codes and send markers
    store: Arc<S>,
    /// SMS provider
    sender: Arc<N>,
    /// Code source
    generator: Arc<dyn CodeGenerator>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<S, N> VerificationManager<S, N>
where
    S: VerificationStore + ?Sized,
    N: NotificationSender + ?Sized,
{
    /// Create a new verification manager using the CSPRNG code generator
    ///
    /// # Arguments
    ///
    /// * `store` - Verification store implementation
    /// * `sender` - SMS provider implementation
    /// * `config` - Service configuration
    pub fn new(store: Arc<S>, sender: Arc<N>, config: VerificationServiceConfig) -> Self {
        Self {
            store,
            sender,
            generator: Arc::new(RandomCodeGenerator),
            config,
        }
    }

    /// Replace the code generator
    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a verification code to a phone number
    ///
    /// This method:
    /// 1. Claims the per-phone send marker (fails with `RateLimited` if held)
    /// 2. Generates a code and stores it, replacing any earlier code
    /// 3. Sends the code through the SMS provider
    ///
    /// A failed send leaves both the code and the marker in place, so the
    /// caller is throttled even when delivery did not happen.
    ///
    /// # Arguments
    ///
    /// * `phone` - Destination phone number, used verbatim; blank counts as missing
    /// * `sign_name` - SMS sign name; the configured default when absent or blank
    /// * `template_code` - SMS template; the configured default when absent or blank
    pub async fn issue_code(
        &self,
        phone: &str,
        sign_name: Option<&str>,
        template_code: Option<&str>,
    ) -> VerificationResult<IssueOutcome> {
        if is_blank(phone) {
            return Err(VerificationError::MissingPhoneNumber);
        }
        let masked_phone = mask_phone_number(phone);

        // The marker write doubles as the throttle check so concurrent requests
        // for one phone cannot both pass
        let limit_key = self.config.limit_key(phone);
        let claimed = self
            .store_call(
                "claim_send_marker",
                self.store
                    .set_if_absent(&limit_key, RATE_LIMIT_MARKER, self.config.rate_limit_seconds),
            )
            .await?;

        if !claimed {
            let retry_after_seconds = self.remaining_marker_seconds(&limit_key).await;
            tracing::warn!(
                phone = %masked_phone,
                retry_after_seconds = ?retry_after_seconds,
                event = "rate_limit_exceeded",
                "Verification code request rate limit exceeded"
            );
            return Err(VerificationError::RateLimited { retry_after_seconds });
        }

        let code = self.generator.generate();
        self.store_call(
            "store_code",
            self.store.set_with_expiry(
                &self.config.code_key(phone),
                &code,
                self.config.code_ttl_seconds,
            ),
        )
        .await?;

        let issued = IssuedCode::new(
            phone.to_string(),
            code,
            self.config.code_ttl_seconds,
            self.config.rate_limit_seconds,
        );

        tracing::info!(
            phone = %masked_phone,
            expires_at = %issued.expires_at,
            event = "otp_generated",
            "Verification code generated"
        );

        let message = SmsMessage::verification(
            phone,
            non_blank(sign_name).unwrap_or(&self.config.default_sign_name),
            non_blank(template_code).unwrap_or(&self.config.default_template_code),
            &issued.code,
        );

        let provider_response = match timeout(self.config.dispatch_timeout, self.sender.send(&message)).await {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => {
                tracing::error!(
                    phone = %masked_phone,
                    provider = self.sender.provider_name(),
                    error = %error,
                    event = "sms_dispatch_failed",
                    "Failed to send verification SMS"
                );
                return Err(VerificationError::DispatchFailed { message: error });
            }
            Err(_) => {
                tracing::error!(
                    phone = %masked_phone,
                    provider = self.sender.provider_name(),
                    timeout_ms = self.config.dispatch_timeout.as_millis() as u64,
                    event = "sms_dispatch_timeout",
                    "SMS provider did not answer in time"
                );
                return Err(VerificationError::Timeout { operation: "sms_dispatch" });
            }
        };

        tracing::info!(
            phone = %masked_phone,
            provider = self.sender.provider_name(),
            event = "otp_sent",
            "Verification code sent"
        );

        // The marker was created by this call, so its full window is what remains
        Ok(IssueOutcome {
            issued,
            provider_response,
            code_valid_for_seconds: self.config.code_ttl_seconds,
            resend_after_seconds: self.config.rate_limit_seconds,
        })
    }

    /// Verify a submitted code and consume it on success
    ///
    /// Both inputs are used verbatim and the comparison is exact and
    /// constant-time, so a padded code does not match. A matching code is removed
    /// atomically, so of several concurrent correct submissions exactly one
    /// succeeds and the rest see `CodeExpired`. A wrong code leaves the stored
    /// code untouched.
    ///
    /// # Arguments
    ///
    /// * `phone` - Phone number the code was issued to
    /// * `submitted` - Code entered by the user
    pub async fn verify_code(&self, phone: &str, submitted: &str) -> VerificationResult<()> {
        if is_blank(phone) || is_blank(submitted) {
            return Err(VerificationError::MissingInput);
        }
        let masked_phone = mask_phone_number(phone);

        let code_key = self.config.code_key(phone);
        let stored = match self.store_call("load_code", self.store.get(&code_key)).await? {
            Some(stored) => stored,
            None => {
                tracing::info!(
                    phone = %masked_phone,
                    event = "otp_expired",
                    "No live verification code for phone"
                );
                return Err(VerificationError::CodeExpired);
            }
        };

        if !constant_time_eq(stored.as_bytes(), submitted.as_bytes()) {
            tracing::warn!(
                phone = %masked_phone,
                event = "otp_mismatch",
                "Submitted verification code does not match"
            );
            return Err(VerificationError::CodeMismatch);
        }

        let consumed = self
            .store_call("consume_code", self.store.delete_if_equals(&code_key, &stored))
            .await?;

        if !consumed {
            // Another request consumed or replaced the code after it was read
            tracing::warn!(
                phone = %masked_phone,
                event = "otp_consumed_concurrently",
                "Verification code was consumed by a concurrent request"
            );
            return Err(VerificationError::CodeExpired);
        }

        tracing::info!(
            phone = %masked_phone,
            event = "otp_verified",
            "Verification code verified"
        );

        Ok(())
    }

    /// Report whether a code is pending and when another may be requested
    ///
    /// Read-only: never creates, extends, or removes keys.
    pub async fn status(&self, phone: &str) -> VerificationResult<CodeStatus> {
        if is_blank(phone) {
            return Err(VerificationError::MissingPhoneNumber);
        }

        let code_key = self.config.code_key(phone);
        let code_active = self.store_call("code_exists", self.store.exists(&code_key)).await?;
        let code_expires_in = if code_active {
            self.store_call("code_ttl", self.store.ttl(&code_key)).await?
        } else {
            None
        };
        let resend_available_in = self
            .store_call("marker_ttl", self.store.ttl(&self.config.limit_key(phone)))
            .await?;

        Ok(CodeStatus {
            code_active,
            code_expires_in,
            resend_available_in,
        })
    }

    /// Remaining marker lifetime, best effort: a failed lookup yields `None`
    async fn remaining_marker_seconds(&self, limit_key: &str) -> Option<u64> {
        match self.store_call("marker_ttl", self.store.ttl(limit_key)).await {
            Ok(ttl) => ttl,
            Err(e) => {
                tracing::debug!(error = %e, "Could not read send marker TTL");
                None
            }
        }
    }

    /// Run one store operation under the configured store timeout
    async fn store_call<T, F>(&self, operation: &'static str, call: F) -> VerificationResult<T>
    where
        F: Future<Output = Result<T, String>>,
    {
        match timeout(self.config.store_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(message)) => {
                tracing::error!(
                    operation = operation,
                    error = %message,
                    event = "store_unavailable",
                    "Verification store operation failed"
                );
                Err(VerificationError::StoreUnavailable { message })
            }
            Err(_) => {
                tracing::error!(
                    operation = operation,
                    timeout_ms = self.config.store_timeout.as_millis() as u64,
                    event = "store_timeout",
                    "Verification store operation timed out"
                );
                Err(VerificationError::Timeout { operation })
            }
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
