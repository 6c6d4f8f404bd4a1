//! Shared fixtures for the HTTP tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use serde_json::json;
use sv_api::AppState;
use sv_core::services::verification::{
    CodeGenerator, NotificationSender, ProviderResponse, SmsMessage, VerificationServiceConfig,
    VerificationStore,
};
use sv_infra::MemoryVerificationStore;

pub const PHONE: &str = "+8613800001111";
pub const CODE: &str = "4821";

/// Sender that keeps every message it is asked to deliver
#[derive(Default)]
pub struct RecordingSender {
    messages: Mutex<Vec<SmsMessage>>,
    fail: AtomicBool,
}

impl RecordingSender {
    pub fn failing() -> Self {
        let sender = Self::default();
        sender.fail.store(true, Ordering::SeqCst);
        sender
    }

    pub fn sent(&self) -> Vec<SmsMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, message: &SmsMessage) -> Result<ProviderResponse, String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("isv.BUSINESS_LIMIT_CONTROL: provider down".to_string());
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(json!({ "statusCode": 200, "body": { "Code": "OK", "BizId": "test-biz-id" } }))
    }

    fn provider_name(&self) -> &str {
        "recording"
    }
}

/// Always produces the same code
pub struct FixedCode(pub &'static str);

impl CodeGenerator for FixedCode {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

/// Store whose every call fails, as if Redis were unreachable
pub struct UnreachableStore;

#[async_trait]
impl VerificationStore for UnreachableStore {
    async fn set_with_expiry(&self, _key: &str, _value: &str, _ttl_seconds: u64) -> Result<(), String> {
        Err("connection refused".to_string())
    }

    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl_seconds: u64) -> Result<bool, String> {
        Err("connection refused".to_string())
    }

    async fn exists(&self, _key: &str) -> Result<bool, String> {
        Err("connection refused".to_string())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, String> {
        Err("connection refused".to_string())
    }

    async fn ttl(&self, _key: &str) -> Result<Option<u64>, String> {
        Err("connection refused".to_string())
    }

    async fn delete_if_equals(&self, _key: &str, _expected: &str) -> Result<bool, String> {
        Err("connection refused".to_string())
    }

    async fn health_check(&self) -> Result<(), String> {
        Err("connection refused".to_string())
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub store: Arc<MemoryVerificationStore>,
    pub sender: Arc<RecordingSender>,
}

/// In-memory store, recording sender and the fixed code `4821`
pub fn context() -> TestContext {
    context_with_sender(RecordingSender::default())
}

pub fn context_with_sender(sender: RecordingSender) -> TestContext {
    let store = Arc::new(MemoryVerificationStore::new());
    let sender = Arc::new(sender);
    let state = web::Data::new(AppState::with_generator(
        store.clone(),
        sender.clone(),
        VerificationServiceConfig::default(),
        Arc::new(FixedCode(CODE)),
    ));

    TestContext { state, store, sender }
}

pub fn unreachable_store_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(
        Arc::new(UnreachableStore),
        Arc::new(RecordingSender::default()),
        VerificationServiceConfig::default(),
    ))
}
