use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::mocks::{MockSender, MockStore, SequenceGenerator};
use crate::errors::VerificationError;
use crate::services::verification::{VerificationManager, VerificationServiceConfig};

const PHONE: &str = "+8613800001111";
const CODE_KEY: &str = "sms:verify:+8613800001111";
const LIMIT_KEY: &str = "sms:limit:+8613800001111";

fn manager_with(
    store: MockStore,
    sender: MockSender,
    codes: &[&str],
) -> (VerificationManager<MockStore, MockSender>, Arc<MockStore>, Arc<MockSender>) {
    let store = Arc::new(store);
    let sender = Arc::new(sender);
    let manager = VerificationManager::new(store.clone(), sender.clone(), VerificationServiceConfig::default())
        .with_generator(Arc::new(SequenceGenerator::new(codes)));
    (manager, store, sender)
}

fn manager(codes: &[&str]) -> (VerificationManager<MockStore, MockSender>, Arc<MockStore>, Arc<MockSender>) {
    manager_with(MockStore::new(), MockSender::new(), codes)
}

#[tokio::test(start_paused = true)]
async fn test_issue_stores_code_and_marker_with_expiry() {
    let (manager, store, sender) = manager(&["4821"]);

    let outcome = manager.issue_code(PHONE, None, None).await.unwrap();

    assert_eq!(outcome.issued.code, "4821");
    assert_eq!(outcome.issued.phone, PHONE);
    assert_eq!(outcome.provider_response["Code"], "OK");

    assert_eq!(store.peek(CODE_KEY).as_deref(), Some("4821"));
    assert_eq!(store.remaining(CODE_KEY), Some(300));
    assert!(store.peek(LIMIT_KEY).is_some());
    assert_eq!(store.remaining(LIMIT_KEY), Some(60));

    let message = sender.last_message().unwrap();
    assert_eq!(message.phone_number, PHONE);
    assert_eq!(message.sign_name, "SMS Verify");
    assert_eq!(message.template_code, "SMS_306490979");
    assert_eq!(message.template_param, json!({ "code": "4821" }));
}

#[tokio::test(start_paused = true)]
async fn test_issue_then_verify_consumes_code() {
    let (manager, store, _) = manager(&["4821"]);

    manager.issue_code(PHONE, None, None).await.unwrap();

    assert_eq!(manager.verify_code(PHONE, "4821").await, Ok(()));
    assert!(store.peek(CODE_KEY).is_none());

    // Single use
    assert_eq!(
        manager.verify_code(PHONE, "4821").await,
        Err(VerificationError::CodeExpired)
    );
}

#[tokio::test(start_paused = true)]
async fn test_second_issue_within_window_is_rate_limited() {
    let (manager, store, sender) = manager(&["4821", "7777"]);

    manager.issue_code(PHONE, None, None).await.unwrap();

    let err = manager.issue_code(PHONE, None, None).await.unwrap_err();
    assert_eq!(err, VerificationError::RateLimited { retry_after_seconds: Some(60) });

    tokio::time::advance(Duration::from_secs(30)).await;
    let err = manager.issue_code(PHONE, None, None).await.unwrap_err();
    assert_eq!(err, VerificationError::RateLimited { retry_after_seconds: Some(30) });

    // Nothing was generated, stored, or sent for the rejected requests
    assert_eq!(sender.sent_count(), 1);
    assert_eq!(store.peek(CODE_KEY).as_deref(), Some("4821"));
}

#[tokio::test(start_paused = true)]
async fn test_issue_allowed_again_after_window() {
    let (manager, store, sender) = manager(&["4821", "7777"]);

    manager.issue_code(PHONE, None, None).await.unwrap();
    tokio::time::advance(Duration::from_secs(61)).await;

    let outcome = manager.issue_code(PHONE, None, None).await.unwrap();
    assert_eq!(outcome.issued.code, "7777");
    assert_eq!(sender.sent_count(), 2);

    // The newer code replaces the older one and gets a fresh lifetime
    assert_eq!(store.peek(CODE_KEY).as_deref(), Some("7777"));
    assert_eq!(store.remaining(CODE_KEY), Some(300));
    assert_eq!(
        manager.verify_code(PHONE, "4821").await,
        Err(VerificationError::CodeMismatch)
    );
    assert_eq!(manager.verify_code(PHONE, "7777").await, Ok(()));
}

#[tokio::test(start_paused = true)]
async fn test_code_expires_after_ttl() {
    let (manager, _, _) = manager(&["4821"]);

    manager.issue_code(PHONE, None, None).await.unwrap();

    tokio::time::advance(Duration::from_secs(299)).await;
    assert_eq!(
        manager.verify_code(PHONE, "0000").await,
        Err(VerificationError::CodeMismatch)
    );

    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(
        manager.verify_code(PHONE, "4821").await,
        Err(VerificationError::CodeExpired)
    );
}

#[tokio::test(start_paused = true)]
async fn test_wrong_code_does_not_consume() {
    let (manager, store, _) = manager(&["4821"]);

    manager.issue_code(PHONE, None, None).await.unwrap();

    assert_eq!(
        manager.verify_code(PHONE, "1234").await,
        Err(VerificationError::CodeMismatch)
    );
    assert_eq!(
        manager.verify_code(PHONE, "48210").await,
        Err(VerificationError::CodeMismatch)
    );
    assert_eq!(store.peek(CODE_KEY).as_deref(), Some("4821"));
    assert_eq!(store.remaining(CODE_KEY), Some(300));

    assert_eq!(manager.verify_code(PHONE, "4821").await, Ok(()));
}

#[tokio::test]
async fn test_verify_without_issued_code() {
    let (manager, _, _) = manager(&[]);

    assert_eq!(
        manager.verify_code(PHONE, "4821").await,
        Err(VerificationError::CodeExpired)
    );
}

#[tokio::test]
async fn test_missing_phone_touches_nothing() {
    let (manager, store, sender) = manager(&[]);

    for phone in ["", "   "] {
        assert_eq!(
            manager.issue_code(phone, None, None).await.unwrap_err(),
            VerificationError::MissingPhoneNumber
        );
    }

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    assert_eq!(sender.sent_count(), 0);
}

#[tokio::test]
async fn test_verify_missing_input_touches_nothing() {
    let (manager, store, _) = manager(&[]);

    assert_eq!(manager.verify_code("", "4821").await, Err(VerificationError::MissingInput));
    assert_eq!(manager.verify_code(PHONE, "").await, Err(VerificationError::MissingInput));
    assert_eq!(manager.verify_code(" ", " ").await, Err(VerificationError::MissingInput));

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_inputs_are_used_verbatim() {
    let (manager, store, _) = manager(&["4821"]);

    manager.issue_code(PHONE, None, None).await.unwrap();

    // Surrounding whitespace makes a different code, and the stored one survives
    assert_eq!(
        manager.verify_code(PHONE, " 4821\n").await,
        Err(VerificationError::CodeMismatch)
    );
    assert_eq!(store.peek(CODE_KEY).as_deref(), Some("4821"));

    // A padded phone number is a different key
    assert_eq!(
        manager.verify_code(" +8613800001111 ", "4821").await,
        Err(VerificationError::CodeExpired)
    );

    assert_eq!(manager.verify_code(PHONE, "4821").await, Ok(()));
}

#[tokio::test]
async fn test_blank_inputs_are_missing() {
    let (manager, store, sender) = manager(&["4821"]);

    assert_eq!(
        manager.issue_code(" \t", None, None).await.unwrap_err(),
        VerificationError::MissingPhoneNumber
    );
    assert_eq!(
        manager.verify_code(PHONE, "   ").await,
        Err(VerificationError::MissingInput)
    );
    assert_eq!(manager.status("").await, Err(VerificationError::MissingPhoneNumber));
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    assert_eq!(sender.sent_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_outcome_reports_configured_windows() {
    // Dispatch takes a while; the reported windows do not shrink with it
    let (manager, _, _) = manager_with(MockStore::new(), MockSender::slow(Duration::from_secs(2)), &["4821"]);

    let outcome = manager.issue_code(PHONE, None, None).await.unwrap();
    assert_eq!(outcome.resend_after_seconds, 60);
    assert_eq!(outcome.code_valid_for_seconds, 300);
}

#[tokio::test]
async fn test_custom_sign_and_template() {
    let (manager, _, sender) = manager(&["4821", "5555"]);

    manager
        .issue_code(PHONE, Some("My Shop"), Some("SMS_000001"))
        .await
        .unwrap();
    let message = sender.last_message().unwrap();
    assert_eq!(message.sign_name, "My Shop");
    assert_eq!(message.template_code, "SMS_000001");

    // Blank overrides fall back to the configured defaults
    manager.issue_code("13900002222", Some("  "), Some("")).await.unwrap();
    let message = sender.last_message().unwrap();
    assert_eq!(message.sign_name, "SMS Verify");
    assert_eq!(message.template_code, "SMS_306490979");
}

#[tokio::test]
async fn test_phones_are_throttled_independently() {
    let (manager, _, sender) = manager(&["1111", "2222"]);

    manager.issue_code("13800001111", None, None).await.unwrap();
    manager.issue_code("13900002222", None, None).await.unwrap();

    assert_eq!(sender.sent_count(), 2);
    assert_eq!(
        manager.verify_code("13900002222", "1111").await,
        Err(VerificationError::CodeMismatch)
    );
    assert_eq!(manager.verify_code("13900002222", "2222").await, Ok(()));
}

#[tokio::test]
async fn test_dispatch_failure_keeps_code_and_marker() {
    let (manager, store, _) = manager_with(MockStore::new(), MockSender::failing(), &["4821"]);

    let err = manager.issue_code(PHONE, None, None).await.unwrap_err();
    assert_eq!(
        err,
        VerificationError::DispatchFailed { message: "isv.BUSINESS_LIMIT_CONTROL".to_string() }
    );

    assert_eq!(store.peek(CODE_KEY).as_deref(), Some("4821"));
    assert!(store.peek(LIMIT_KEY).is_some());
    assert!(matches!(
        manager.issue_code(PHONE, None, None).await,
        Err(VerificationError::RateLimited { .. })
    ));
}

#[tokio::test]
async fn test_store_failure_is_reported() {
    let (manager, _, sender) = manager_with(MockStore::failing(), MockSender::new(), &["4821"]);

    assert!(matches!(
        manager.issue_code(PHONE, None, None).await,
        Err(VerificationError::StoreUnavailable { .. })
    ));
    assert!(matches!(
        manager.verify_code(PHONE, "4821").await,
        Err(VerificationError::StoreUnavailable { .. })
    ));
    assert_eq!(sender.sent_count(), 0);
}

#[tokio::test]
async fn test_failed_code_write_leaves_phone_throttled() {
    let (manager, store, sender) = manager_with(MockStore::failing_code_writes(), MockSender::new(), &["4821", "7777"]);

    assert!(matches!(
        manager.issue_code(PHONE, None, None).await,
        Err(VerificationError::StoreUnavailable { .. })
    ));
    assert!(store.peek(CODE_KEY).is_none());
    assert!(store.peek(LIMIT_KEY).is_some());
    assert_eq!(sender.sent_count(), 0);

    // The marker is not rolled back, so a retry waits out the window
    assert!(matches!(
        manager.issue_code(PHONE, None, None).await,
        Err(VerificationError::RateLimited { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_slow_store_times_out() {
    let (manager, _, sender) =
        manager_with(MockStore::slow(Duration::from_secs(5)), MockSender::new(), &["4821"]);

    assert_eq!(
        manager.issue_code(PHONE, None, None).await.unwrap_err(),
        VerificationError::Timeout { operation: "claim_send_marker" }
    );
    assert_eq!(
        manager.verify_code(PHONE, "4821").await,
        Err(VerificationError::Timeout { operation: "load_code" })
    );
    assert_eq!(sender.sent_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_times_out() {
    let (manager, store, _) =
        manager_with(MockStore::new(), MockSender::slow(Duration::from_secs(30)), &["4821"]);

    assert_eq!(
        manager.issue_code(PHONE, None, None).await.unwrap_err(),
        VerificationError::Timeout { operation: "sms_dispatch" }
    );
    assert_eq!(store.peek(CODE_KEY).as_deref(), Some("4821"));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_issue_admits_one() {
    // A store round trip suspends each call, so both claims are in flight together
    let (manager, store, sender) =
        manager_with(MockStore::slow(Duration::from_millis(1)), MockSender::new(), &["4821", "7777"]);

    let (first, second) = tokio::join!(
        manager.issue_code(PHONE, None, None),
        manager.issue_code(PHONE, None, None)
    );

    let successes = [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
    assert!(matches!(
        first.err().or(second.err()),
        Some(VerificationError::RateLimited { .. })
    ));
    assert_eq!(sender.sent_count(), 1);
    assert_eq!(store.peek(CODE_KEY).as_deref(), Some("4821"));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_verify_admits_one() {
    let (manager, store, _) =
        manager_with(MockStore::slow(Duration::from_millis(1)), MockSender::new(), &["4821"]);
    manager.issue_code(PHONE, None, None).await.unwrap();

    let (first, second) = tokio::join!(
        manager.verify_code(PHONE, "4821"),
        manager.verify_code(PHONE, "4821")
    );

    let mut results = vec![first, second];
    results.sort_by_key(|r| r.is_err());
    assert_eq!(results, vec![Ok(()), Err(VerificationError::CodeExpired)]);
    assert!(store.peek(CODE_KEY).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_status_reflects_store() {
    let (manager, store, _) = manager(&["4821"]);

    let status = manager.status(PHONE).await.unwrap();
    assert!(!status.code_active);
    assert_eq!(status.code_expires_in, None);
    assert_eq!(status.resend_available_in, None);

    manager.issue_code(PHONE, None, None).await.unwrap();
    tokio::time::advance(Duration::from_secs(10)).await;

    let writes_before = store.writes.load(Ordering::SeqCst);
    let status = manager.status(PHONE).await.unwrap();
    assert!(status.code_active);
    assert_eq!(status.code_expires_in, Some(290));
    assert_eq!(status.resend_available_in, Some(50));
    assert_eq!(store.writes.load(Ordering::SeqCst), writes_before);

    manager.verify_code(PHONE, "4821").await.unwrap();
    let status = manager.status(PHONE).await.unwrap();
    assert!(!status.code_active);
    assert_eq!(status.resend_available_in, Some(50));

    assert_eq!(manager.status(" ").await, Err(VerificationError::MissingPhoneNumber));
}
