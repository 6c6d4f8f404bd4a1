use actix_web::{web, HttpRequest, HttpResponse};
use sv_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::SendSmsRequest;
use crate::handlers::verification_error_response;
use crate::i18n::{language_from_request, Message};

/// Handler for POST /send-sms
///
/// # Request Body
///
/// ```json
/// { "phone_number": "+8613800001111", "sign_name": "optional", "template_code": "optional" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "Verification code sent successfully",
///     "response": { "statusCode": 200, "body": { "Code": "OK", "BizId": "..." } },
///     "retry_after": 60
/// }
/// ```
///
/// ## Errors
/// 400 missing phone, 429 throttled (with `Retry-After`), 500 provider failure,
/// 503 store unavailable, 504 timeout
pub async fn send_sms(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<SendSmsRequest>,
) -> HttpResponse {
    let lang = language_from_request(&req);
    let request = body.into_inner();

    let result = state
        .verification
        .issue_code(
            request.phone_number.as_deref().unwrap_or_default(),
            request.sign_name.as_deref(),
            request.template_code.as_deref(),
        )
        .await;

    match result {
        Ok(outcome) => {
            let retry_after = outcome.resend_after_seconds;
            HttpResponse::Ok().json(
                ApiResponse::success(Message::CodeSent.text(lang))
                    .with_response(outcome.provider_response)
                    .with_retry_after(Some(retry_after)),
            )
        }
        Err(error) => {
            verification_error_response(&error, lang, state.verification.config().rate_limit_seconds)
        }
    }
}
