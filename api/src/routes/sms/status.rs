use actix_web::{web, HttpRequest, HttpResponse};
use sv_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::StatusQuery;
use crate::handlers::verification_error_response;
use crate::i18n::{language_from_request, Message};

/// Handler for GET /sms-status?phone_number=...
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "Verification status retrieved",
///     "response": { "code_active": true, "code_expires_in": 287, "resend_available_in": 47 }
/// }
/// ```
///
/// Read-only: asking for the status never issues, extends or consumes a code.
pub async fn sms_status(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<StatusQuery>,
) -> HttpResponse {
    let lang = language_from_request(&req);

    let result = state
        .verification
        .status(query.phone_number.as_deref().unwrap_or_default())
        .await;

    match result {
        Ok(status) => match serde_json::to_value(status) {
            Ok(report) => HttpResponse::Ok()
                .json(ApiResponse::success(Message::StatusReported.text(lang)).with_response(report)),
            Err(e) => {
                tracing::error!(error = %e, "Could not serialize verification status");
                HttpResponse::InternalServerError().finish()
            }
        },
        Err(error) => {
            verification_error_response(&error, lang, state.verification.config().rate_limit_seconds)
        }
    }
}
