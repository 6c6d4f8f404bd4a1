use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use sv_api::{create_app, telemetry, AppState};
use sv_core::services::verification::{VerificationServiceConfig, VerificationStore};
use sv_infra::{create_notification_sender, MemoryVerificationStore, RedisClient, RedisVerificationStore};
use sv_shared::{AppConfig, CacheBackend, CacheConfig, SmsProvider};
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    telemetry::init_tracing(&config.logging)?;

    info!(environment = %config.environment, "Starting SMS verification server");

    let store = build_store(&config.cache).await?;
    let sender = create_notification_sender(&config.sms).context("failed to create SMS sender")?;
    info!(provider = sender.provider_name(), "SMS sender ready");
    if config.environment.is_production() && config.sms.provider == SmsProvider::Mock {
        warn!("Mock SMS sender configured in production; no messages will be delivered");
    }

    let state = web::Data::new(AppState::new(
        store,
        sender,
        VerificationServiceConfig::from(&config.verification),
    ));

    let bind_address = config.server.bind_address();
    let server_config = config.server.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), &server_config));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    info!(address = %bind_address, "Server listening");

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn build_store(config: &CacheConfig) -> anyhow::Result<Arc<dyn VerificationStore>> {
    match config.backend {
        CacheBackend::Redis => {
            let client = RedisClient::new(config.clone())
                .await
                .context("failed to connect to Redis")?;
            Ok(Arc::new(RedisVerificationStore::new(client)))
        }
        CacheBackend::Memory => {
            warn!("Using in-process verification store; codes are not shared between instances");
            Ok(Arc::new(MemoryVerificationStore::with_config(config)))
        }
    }
}
