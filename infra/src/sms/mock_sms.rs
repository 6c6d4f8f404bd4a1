//! Mock SMS Service Implementation
//!
//! A mock sender for development and testing. It logs messages instead of
//! sending them, code included, so a developer can complete the flow locally.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use sv_core::services::verification::{NotificationSender, ProviderResponse, SmsMessage};
use sv_shared::utils::phone::mask_phone_number;
use tracing::{info, warn};
use uuid::Uuid;

/// Mock SMS sender for development and testing
///
/// This implementation:
/// - Logs SMS messages instead of delivering them
/// - Answers with an Aliyun-shaped acknowledgement
/// - Tracks message count for testing
#[derive(Clone, Default)]
pub struct MockSmsSender {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: Arc<AtomicBool>,
}

impl MockSmsSender {
    /// Create a new mock SMS sender
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }
}

#[async_trait]
impl NotificationSender for MockSmsSender {
    async fn send(&self, message: &SmsMessage) -> Result<ProviderResponse, String> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                "Mock SMS: simulating failure for {}",
                mask_phone_number(&message.phone_number)
            );
            return Err("isv.MOCK_FAILURE: simulated SMS failure".to_string());
        }

        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        let biz_id = format!("mock-{}", Uuid::new_v4());

        info!(
            phone = %mask_phone_number(&message.phone_number),
            sign_name = %message.sign_name,
            template_code = %message.template_code,
            template_param = %message.template_param,
            message_count = count,
            "Mock SMS sent"
        );

        Ok(json!({
            "Code": "OK",
            "Message": "OK",
            "BizId": biz_id,
            "RequestId": Uuid::new_v4().to_string(),
        }))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
