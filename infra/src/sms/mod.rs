//! SMS Service Module
//!
//! This module provides the notification senders used to deliver verification
//! codes:
//!
//! - **Aliyun**: Alibaba Cloud Short Message Service over the signed RPC API
//! - **Mock**: Logs messages for development

use std::sync::Arc;

use sv_core::services::verification::NotificationSender;
use sv_shared::{SmsConfig, SmsProvider};

use crate::InfrastructureError;

pub mod aliyun;
pub mod mock_sms;

// Re-export commonly used types
pub use aliyun::AliyunSmsSender;
pub use mock_sms::MockSmsSender;

#[cfg(test)]
mod tests;

/// Create a notification sender based on configuration
///
/// # Arguments
///
/// * `config` - SMS configuration containing provider settings
///
/// # Returns
///
/// A shared sender, or an error when the selected provider cannot be initialized
pub fn create_notification_sender(
    config: &SmsConfig,
) -> Result<Arc<dyn NotificationSender>, InfrastructureError> {
    match config.provider {
        SmsProvider::Mock => {
            tracing::warn!("Using mock SMS sender: codes are logged, not delivered");
            Ok(Arc::new(MockSmsSender::new()))
        }
        SmsProvider::Aliyun => {
            let sender = AliyunSmsSender::new(config.clone()).map_err(|e| {
                tracing::error!("Failed to initialize Aliyun SMS sender: {}", e);
                e
            })?;
            Ok(Arc::new(sender))
        }
    }
}
