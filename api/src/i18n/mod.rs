//! Localized response messages (English and Chinese)

use actix_web::{http::header, HttpRequest};
use sv_shared::Language;

/// Every user-facing message the API can return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    CodeSent,
    Verified,
    StatusReported,
    MissingPhoneNumber,
    MissingInput,
    RateLimited { seconds: u64 },
    CodeExpired,
    CodeMismatch,
    DispatchFailed,
    StoreUnavailable,
    Timeout,
    InvalidBody,
    NotFound,
}

impl Message {
    /// Render the message in the requested language
    pub fn text(self, lang: Language) -> String {
        match (self, lang) {
            (Message::CodeSent, Language::English) => "Verification code sent successfully".into(),
            (Message::CodeSent, Language::Chinese) => "验证码发送成功".into(),
            (Message::Verified, Language::English) => "Verification successful".into(),
            (Message::Verified, Language::Chinese) => "验证成功".into(),
            (Message::StatusReported, Language::English) => "Verification status retrieved".into(),
            (Message::StatusReported, Language::Chinese) => "验证状态查询成功".into(),
            (Message::MissingPhoneNumber, Language::English) => "Phone number is required".into(),
            (Message::MissingPhoneNumber, Language::Chinese) => "手机号不能为空".into(),
            (Message::MissingInput, Language::English) => "Phone number and code are required".into(),
            (Message::MissingInput, Language::Chinese) => "手机号和验证码不能为空".into(),
            (Message::RateLimited { seconds }, Language::English) => {
                format!("Please wait {} seconds before trying again", seconds)
            }
            (Message::RateLimited { seconds }, Language::Chinese) => format!("请等待{}秒后再试", seconds),
            (Message::CodeExpired, Language::English) => "Verification code has expired".into(),
            (Message::CodeExpired, Language::Chinese) => "验证码已过期".into(),
            (Message::CodeMismatch, Language::English) => "Incorrect verification code".into(),
            (Message::CodeMismatch, Language::Chinese) => "验证码错误".into(),
            (Message::DispatchFailed, Language::English) => "Failed to send SMS, please try again later".into(),
            (Message::DispatchFailed, Language::Chinese) => "短信发送失败，请稍后重试".into(),
            (Message::StoreUnavailable, Language::English) => "Service temporarily unavailable".into(),
            (Message::StoreUnavailable, Language::Chinese) => "服务暂时不可用，请稍后重试".into(),
            (Message::Timeout, Language::English) => "The request timed out, please try again".into(),
            (Message::Timeout, Language::Chinese) => "请求超时，请稍后重试".into(),
            (Message::InvalidBody, Language::English) => "Invalid request body".into(),
            (Message::InvalidBody, Language::Chinese) => "请求格式无效".into(),
            (Message::NotFound, Language::English) => "The requested resource was not found".into(),
            (Message::NotFound, Language::Chinese) => "请求的资源不存在".into(),
        }
    }
}

/// Detect language preference from the Accept-Language header (English by default)
pub fn language_from_request(req: &HttpRequest) -> Language {
    req.headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}
