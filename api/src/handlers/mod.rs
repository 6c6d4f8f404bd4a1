//! Error handlers mapping domain failures to HTTP responses

pub mod error;

pub use error::{json_error_handler, not_found, verification_error_response};
