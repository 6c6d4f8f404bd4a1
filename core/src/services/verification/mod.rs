//! Verification service module for SMS-based phone verification
//!
//! This module provides the verification code workflow:
//! - Per-phone send throttling backed by the shared store
//! - Code generation, storage, and delivery through an SMS provider
//! - Single-use code verification

mod config;
mod generator;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use generator::RandomCodeGenerator;
pub use service::VerificationManager;
pub use traits::{CodeGenerator, NotificationSender, ProviderResponse, SmsMessage, VerificationStore};
pub use types::{CodeStatus, IssueOutcome};
