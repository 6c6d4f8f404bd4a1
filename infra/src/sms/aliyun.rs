//! Alibaba Cloud SMS Service Implementation
//!
//! Sends templated messages through the Dysms `SendSms` RPC API (version
//! 2017-05-25). Requests are signed with the RPC signature scheme:
//!
//! 1. Every parameter is percent-encoded per RFC 3986 and the pairs are sorted by key
//! 2. `StringToSign = POST&%2F&percentEncode(canonicalQuery)`
//! 3. `Signature = base64(HMAC-SHA1(accessKeySecret + "&", StringToSign))`
//!
//! A response whose `Code` is not `OK` is reported as a failure carrying the
//! provider's code and message.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{json, Value};
use sha1::Sha1;
use std::collections::BTreeMap;
use std::time::Duration;
use sv_core::services::verification::{NotificationSender, ProviderResponse, SmsMessage};
use sv_shared::utils::phone::mask_phone_number;
use sv_shared::SmsConfig;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::InfrastructureError;

/// Dysms API version
const API_VERSION: &str = "2017-05-25";

/// Action name for single-recipient sends
const SEND_SMS_ACTION: &str = "SendSms";

/// Characters left unescaped by RFC 3986
const RFC3986_UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

type HmacSha1 = Hmac<Sha1>;

/// Alibaba Cloud SMS sender
pub struct AliyunSmsSender {
    client: reqwest::Client,
    config: SmsConfig,
    endpoint_url: String,
}

impl AliyunSmsSender {
    /// Create a new Aliyun SMS sender
    ///
    /// Fails when credentials are missing or the HTTP client cannot be built.
    pub fn new(config: SmsConfig) -> Result<Self, InfrastructureError> {
        if config.access_key_id.is_empty() || config.access_key_secret.is_empty() {
            return Err(InfrastructureError::Config(
                "Aliyun SMS requires an access key id and secret".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let endpoint_url = endpoint_url(&config.endpoint);

        info!(
            "Aliyun SMS sender initialized (endpoint: {}, region: {})",
            endpoint_url, config.region_id
        );

        Ok(Self {
            client,
            config,
            endpoint_url,
        })
    }

    /// Build the signed parameter set for one `SendSms` call
    fn signed_params(
        &self,
        message: &SmsMessage,
        nonce: &str,
        timestamp: &str,
    ) -> Result<BTreeMap<&'static str, String>, InfrastructureError> {
        let template_param = serde_json::to_string(&message.template_param)
            .map_err(|e| InfrastructureError::Sms(format!("Invalid template parameters: {}", e)))?;

        let mut params = BTreeMap::new();
        params.insert("AccessKeyId", self.config.access_key_id.clone());
        params.insert("Action", SEND_SMS_ACTION.to_string());
        params.insert("Format", "JSON".to_string());
        params.insert("PhoneNumbers", message.phone_number.clone());
        params.insert("RegionId", self.config.region_id.clone());
        params.insert("SignName", message.sign_name.clone());
        params.insert("SignatureMethod", "HMAC-SHA1".to_string());
        params.insert("SignatureNonce", nonce.to_string());
        params.insert("SignatureVersion", "1.0".to_string());
        params.insert("TemplateCode", message.template_code.clone());
        params.insert("TemplateParam", template_param);
        params.insert("Timestamp", timestamp.to_string());
        params.insert("Version", API_VERSION.to_string());

        let signature = sign(&params, &self.config.access_key_secret)?;
        params.insert("Signature", signature);
        Ok(params)
    }

    /// Send one message and interpret the provider's answer
    async fn send_sms(&self, message: &SmsMessage) -> Result<Value, InfrastructureError> {
        let nonce = Uuid::new_v4().to_string();
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let params = self.signed_params(message, &nonce, &timestamp)?;

        debug!(
            "Sending SMS to {} via Aliyun (template: {})",
            mask_phone_number(&message.phone_number),
            message.template_code
        );

        let response = self.client.post(&self.endpoint_url).form(&params).send().await?;
        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            InfrastructureError::Sms(format!("Unreadable provider response (HTTP {}): {}", status, e))
        })?;

        let code = body.get("Code").and_then(Value::as_str).unwrap_or_default();
        if code != "OK" {
            let provider_message = body
                .get("Message")
                .and_then(Value::as_str)
                .unwrap_or("no message");
            let code = if code.is_empty() { status.as_str() } else { code };
            error!(
                "Aliyun rejected SMS to {}: {} ({})",
                mask_phone_number(&message.phone_number),
                code,
                provider_message
            );
            return Err(InfrastructureError::Sms(format!("{}: {}", code, provider_message)));
        }

        let biz_id = body.get("BizId").and_then(Value::as_str).unwrap_or("-");
        info!(
            "SMS sent successfully to {} with BizId: {}",
            mask_phone_number(&message.phone_number),
            biz_id
        );

        Ok(json!({ "statusCode": status.as_u16(), "body": body }))
    }
}

#[async_trait]
impl NotificationSender for AliyunSmsSender {
    async fn send(&self, message: &SmsMessage) -> Result<ProviderResponse, String> {
        self.send_sms(message).await.map_err(|e| e.to_string())
    }

    fn provider_name(&self) -> &str {
        "aliyun"
    }
}

/// Resolve the configured endpoint to a request URL
///
/// A bare host gets `https://` and a root path; a full URL is used verbatim.
pub(crate) fn endpoint_url(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{}/", endpoint.trim_end_matches('/'))
    }
}

/// Percent-encode per RFC 3986 (space as `%20`, `~` kept)
pub(crate) fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, RFC3986_UNRESERVED).to_string()
}

/// Sorted, encoded `key=value` pairs joined with `&`
pub(crate) fn canonical_query(params: &BTreeMap<&str, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// RPC signature over a parameter set that does not yet contain `Signature`
pub(crate) fn sign(params: &BTreeMap<&str, String>, access_key_secret: &str) -> Result<String, InfrastructureError> {
    let string_to_sign = format!(
        "POST&{}&{}",
        percent_encode("/"),
        percent_encode(&canonical_query(params))
    );

    let mut mac = HmacSha1::new_from_slice(format!("{}&", access_key_secret).as_bytes())
        .map_err(|e| InfrastructureError::Sms(format!("Invalid signing key: {}", e)))?;
    mac.update(string_to_sign.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
