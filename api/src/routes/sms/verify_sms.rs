use actix_web::{web, HttpRequest, HttpResponse};
use sv_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::VerifySmsRequest;
use crate::handlers::verification_error_response;
use crate::i18n::{language_from_request, Message};

/// Handler for POST /verify-sms
///
/// # Request Body
///
/// ```json
/// { "phone_number": "+8613800001111", "code": "4821" }
/// ```
///
/// A successful verification consumes the code. Wrong and expired codes are
/// both 400 and are told apart by `error` (`code_mismatch` / `code_expired`).
pub async fn verify_sms(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<VerifySmsRequest>,
) -> HttpResponse {
    let lang = language_from_request(&req);
    let request = body.into_inner();

    let result = state
        .verification
        .verify_code(
            request.phone_number.as_deref().unwrap_or_default(),
            request.code.as_deref().unwrap_or_default(),
        )
        .await;

    match result {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success(Message::Verified.text(lang))),
        Err(error) => {
            verification_error_response(&error, lang, state.verification.config().rate_limit_seconds)
        }
    }
}
