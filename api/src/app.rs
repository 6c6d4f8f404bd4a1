//! Application state and factory
//!
//! This module handles the initialization of the application state
//! and provides the factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error,
};
use sv_core::services::verification::{
    CodeGenerator, NotificationSender, RandomCodeGenerator, VerificationManager,
    VerificationServiceConfig, VerificationStore,
};
use sv_shared::ServerConfig;
use tracing_actix_web::TracingLogger;

use crate::handlers::{json_error_handler, not_found};
use crate::middleware::create_cors;
use crate::routes::{health::health_check, sms::send_sms, sms::sms_status, sms::verify_sms};

/// Verification manager over type-erased collaborators chosen at startup
pub type DynVerificationManager = VerificationManager<dyn VerificationStore, dyn NotificationSender>;

/// Application state that holds shared services
pub struct AppState {
    pub verification: Arc<DynVerificationManager>,
    /// Same store the manager uses; kept for health checks
    pub store: Arc<dyn VerificationStore>,
    /// Same sender the manager uses; kept for health checks
    pub sender: Arc<dyn NotificationSender>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn VerificationStore>,
        sender: Arc<dyn NotificationSender>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self::with_generator(store, sender, config, Arc::new(RandomCodeGenerator))
    }

    pub fn with_generator(
        store: Arc<dyn VerificationStore>,
        sender: Arc<dyn NotificationSender>,
        config: VerificationServiceConfig,
        generator: Arc<dyn CodeGenerator>,
    ) -> Self {
        let verification = Arc::new(
            VerificationManager::new(store.clone(), sender.clone(), config).with_generator(generator),
        );

        Self {
            verification,
            store,
            sender,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
    server: &ServerConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .limit(server.max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        // Add application state
        .app_data(app_state)
        .app_data(json_config)
        // Middleware: the last one registered runs first
        .wrap(create_cors(&server.cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .route("/send-sms", web::post().to(send_sms))
        .route("/verify-sms", web::post().to(verify_sms))
        .route("/sms-status", web::get().to(sms_status))
        // Default 404 handler
        .default_service(web::route().to(not_found))
}
