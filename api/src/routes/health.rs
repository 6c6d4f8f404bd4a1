use std::collections::HashMap;
use std::time::Instant;

use actix_web::{web, HttpResponse};
use sv_shared::{HealthResponse, HealthStatus, ServiceHealth};
use tokio::time::timeout;

use crate::app::AppState;

/// Handler for GET /health
///
/// Pings the verification store (bounded by the store timeout) and asks the
/// SMS sender whether it is ready. Responds 503 when the store is unreachable,
/// since neither endpoint can work without it.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let mut services = HashMap::new();

    let started = Instant::now();
    let store_result = timeout(state.verification.config().store_timeout, state.store.health_check()).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let store_health = match store_result {
        Ok(Ok(())) => ServiceHealth {
            status: HealthStatus::Healthy,
            message: None,
            response_time_ms: Some(elapsed_ms),
        },
        Ok(Err(error)) => {
            tracing::warn!(error = %error, "Verification store health check failed");
            ServiceHealth {
                status: HealthStatus::Unhealthy,
                message: Some("unreachable".to_string()),
                response_time_ms: Some(elapsed_ms),
            }
        }
        Err(_) => {
            tracing::warn!("Verification store health check timed out");
            ServiceHealth {
                status: HealthStatus::Unhealthy,
                message: Some("timeout".to_string()),
                response_time_ms: Some(elapsed_ms),
            }
        }
    };
    let store_healthy = store_health.status == HealthStatus::Healthy;
    services.insert("store".to_string(), store_health);

    let sms_status = if state.sender.is_available().await {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    };
    services.insert(
        "sms".to_string(),
        ServiceHealth {
            status: sms_status,
            message: Some(state.sender.provider_name().to_string()),
            response_time_ms: None,
        },
    );

    let health = HealthResponse::from_services(services, env!("CARGO_PKG_VERSION"));
    if store_healthy {
        HttpResponse::Ok().json(health)
    } else {
        HttpResponse::ServiceUnavailable().json(health)
    }
}
