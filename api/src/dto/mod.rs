//! Request bodies accepted by the API

pub mod sms;

pub use sms::{SendSmsRequest, StatusQuery, VerifySmsRequest};
