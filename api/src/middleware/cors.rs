//! CORS middleware configuration for cross-origin requests.
//!
//! The service is typically called straight from a browser page, so CORS is on
//! for every route. With no configured origins (development) any origin is
//! accepted; otherwise only the listed origins are.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use sv_shared::config::server::CorsConfig;

/// Creates a CORS middleware instance from configuration.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        // Clients read this to schedule the next send
        .expose_headers(vec![header::RETRY_AFTER])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::info!("Configuring CORS to accept any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in config.allowed_origins.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            tracing::info!("Adding allowed origin: {}", origin);
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
