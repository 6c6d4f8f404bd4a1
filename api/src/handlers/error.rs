use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use sv_core::errors::VerificationError;
use sv_shared::{ApiResponse, Language};
use tracing::Level;

use crate::i18n::{language_from_request, Message};

/// HTTP status for each verification failure
pub fn status_for(error: &VerificationError) -> StatusCode {
    match error {
        VerificationError::MissingPhoneNumber
        | VerificationError::MissingInput
        | VerificationError::CodeExpired
        | VerificationError::CodeMismatch => StatusCode::BAD_REQUEST,
        VerificationError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        VerificationError::DispatchFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        VerificationError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        VerificationError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Severity of a failed request in the logs
///
/// Caller mistakes are routine, transient infrastructure faults are worth a
/// warning, anything else is an error.
pub fn log_level_for(error: &VerificationError) -> Level {
    if error.is_client_error() {
        Level::INFO
    } else if error.is_transient() {
        Level::WARN
    } else {
        Level::ERROR
    }
}

fn log_failure(error: &VerificationError) {
    let level = log_level_for(error);
    if level == Level::INFO {
        tracing::info!(error_code = error.code(), "Request rejected");
    } else if level == Level::WARN {
        tracing::warn!(error_code = error.code(), error = %error, "Request failed, may succeed on retry");
    } else {
        tracing::error!(error_code = error.code(), error = %error, "Request failed");
    }
}

/// Convert a verification failure into the JSON envelope
///
/// Internal details (store and provider messages) stay in the logs; the body
/// only carries the error code and a localized message. `rate_limit_window`
/// is reported when the remaining throttle time could not be read.
pub fn verification_error_response(
    error: &VerificationError,
    lang: Language,
    rate_limit_window: u64,
) -> HttpResponse {
    log_failure(error);

    let message = match error {
        VerificationError::MissingPhoneNumber => Message::MissingPhoneNumber,
        VerificationError::MissingInput => Message::MissingInput,
        VerificationError::RateLimited { retry_after_seconds } => Message::RateLimited {
            seconds: retry_after_seconds.unwrap_or(rate_limit_window),
        },
        VerificationError::CodeExpired => Message::CodeExpired,
        VerificationError::CodeMismatch => Message::CodeMismatch,
        VerificationError::DispatchFailed { .. } => Message::DispatchFailed,
        VerificationError::StoreUnavailable { .. } => Message::StoreUnavailable,
        VerificationError::Timeout { .. } => Message::Timeout,
    };

    let mut body = ApiResponse::error(error.code(), message.text(lang));
    let mut response = HttpResponse::build(status_for(error));

    if let VerificationError::RateLimited { retry_after_seconds } = error {
        let seconds = retry_after_seconds.unwrap_or(rate_limit_window);
        body = body.with_retry_after(Some(seconds));
        response.insert_header((header::RETRY_AFTER, seconds.to_string()));
    }

    response.json(body)
}

/// Reject malformed JSON bodies with the standard envelope instead of actix's plain text
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let lang = language_from_request(req);
    tracing::warn!(path = req.path(), error = %err, "Rejected malformed request body");

    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error("invalid_body", Message::InvalidBody.text(lang)));
    InternalError::from_response(err, response).into()
}

/// Default 404 handler
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    let lang = language_from_request(&req);
    HttpResponse::NotFound().json(ApiResponse::error("not_found", Message::NotFound.text(lang)))
}
