use serde::{Deserialize, Serialize};

/// Body of `POST /send-sms`
///
/// Every field is optional at the JSON level so a missing phone number is
/// reported as a domain error with a localized message, not a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendSmsRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub sign_name: Option<String>,
    #[serde(default)]
    pub template_code: Option<String>,
}

/// Body of `POST /verify-sms`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifySmsRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// Query string of `GET /sms-status`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub phone_number: Option<String>,
}
