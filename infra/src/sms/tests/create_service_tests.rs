//! Unit tests for SMS sender creation

use crate::sms::create_notification_sender;
use sv_shared::{SmsConfig, SmsProvider};

#[test]
fn test_create_mock_sender() {
    let sender = create_notification_sender(&SmsConfig::default()).unwrap();
    assert_eq!(sender.provider_name(), "mock");
}

#[test]
fn test_create_aliyun_sender() {
    let config = SmsConfig {
        access_key_id: "id".to_string(),
        access_key_secret: "secret".to_string(),
        ..SmsConfig::aliyun()
    };

    let sender = create_notification_sender(&config).unwrap();
    assert_eq!(sender.provider_name(), "aliyun");
}

#[test]
fn test_aliyun_without_credentials_is_rejected() {
    let config = SmsConfig::aliyun();
    assert_eq!(config.provider, SmsProvider::Aliyun);

    assert!(create_notification_sender(&config).is_err());
}
