//! Deployment environment and logging settings

use serde::{Deserialize, Serialize};
use std::{env, fmt, str::FromStr};

/// Variables consulted, in order, to pick the environment
const ENVIRONMENT_VARS: [&str; 3] = ["SMS_VERIFY_ENV", "ENVIRONMENT", "RUST_ENV"];

/// Deployment environment; selects the defaults layered under config files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local work: mock SMS sender, pretty logs
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }

    /// Read the environment from the process, falling back to development
    ///
    /// An unrecognised value also falls back instead of aborting startup.
    pub fn from_env() -> Self {
        ENVIRONMENT_VARS
            .iter()
            .find_map(|name| env::var(name).ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    #[default]
    Pretty,
    Compact,
}

/// Tracing subscriber settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Attach file and line to every event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Defaults for `environment`
    ///
    /// Development logs the verification flow at debug level but keeps the
    /// HTTP stack quiet; deployed environments emit JSON at info.
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self {
                level: "debug,actix_server=info,hyper=info,h2=info".to_string(),
                format: LogFormat::Pretty,
                source_location: true,
            },
            Environment::Staging | Environment::Production => Self {
                level: "info".to_string(),
                format: LogFormat::Json,
                source_location: false,
            },
        }
    }
}
