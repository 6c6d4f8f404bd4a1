//! Type definitions module
//!
//! - `language` - Language negotiation for localized messages
//! - `response` - API response envelope and health checks

pub mod language;
pub mod response;

pub use language::Language;
pub use response::{ApiResponse, HealthResponse, HealthStatus, ServiceHealth};
