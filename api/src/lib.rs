//! HTTP surface of the SMS verification service
//!
//! Exposes `POST /send-sms`, `POST /verify-sms`, and `GET /health` on top of the
//! core `VerificationManager`. Library exports exist so integration tests can
//! build the same application the binary serves.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
