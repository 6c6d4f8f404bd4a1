//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Verification store backend (Redis or in-memory)
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server binding
//! - `sms` - SMS provider credentials and defaults
//! - `verification` - Code lifetime, send throttling and timeouts
//!
//! Configuration is layered with the `config` crate: built-in defaults for the
//! detected environment, then optional `config/default` and `config/{environment}`
//! files, then `SMS_VERIFY__*` environment variables (`__` separates sections).

pub mod cache;
pub mod environment;
pub mod server;
pub mod sms;
pub mod verification;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use cache::{CacheBackend, CacheConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use sms::{SmsConfig, SmsProvider};
pub use verification::VerificationConfig;

/// Prefix for environment variable overrides, e.g. `SMS_VERIFY__SERVER__PORT=5001`
pub const ENV_PREFIX: &str = "SMS_VERIFY";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Verification store configuration
    pub cache: CacheConfig,

    /// SMS provider configuration
    pub sms: SmsConfig,

    /// Verification code lifecycle configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Built-in defaults for an environment
    pub fn for_environment(environment: Environment) -> Self {
        let sms = match environment {
            Environment::Development => SmsConfig::default(),
            Environment::Staging | Environment::Production => SmsConfig::aliyun(),
        };

        Self {
            environment,
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
            sms,
            verification: VerificationConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load configuration from defaults, config files and the process environment
    pub fn load() -> Result<Self, ConfigLoadError> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let builder = Self::builder_with_defaults(environment)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;
        app_config.sms.apply_credential_env();
        app_config.validate()?;
        Ok(app_config)
    }

    /// Layer a TOML document over the defaults of `environment`
    pub fn from_toml_str(environment: Environment, toml: &str) -> Result<Self, ConfigLoadError> {
        let builder = Self::builder_with_defaults(environment)?
            .add_source(File::from_str(toml, FileFormat::Toml));

        let app_config: AppConfig = builder.build()?.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn builder_with_defaults(
        environment: Environment,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigLoadError> {
        let defaults = Config::try_from(&Self::for_environment(environment))?;
        Ok(Config::builder().add_source(defaults))
    }

    /// Check cross-field invariants that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.verification.validate().map_err(ConfigLoadError::Invalid)?;
        self.sms.validate().map_err(ConfigLoadError::Invalid)?;

        if self.server.port == 0 {
            return Err(ConfigLoadError::Invalid("server.port must not be 0".to_string()));
        }

        Ok(())
    }
}
