//! # SMS Verify Core
//!
//! Domain layer of the SMS verification service: the verification code lifecycle,
//! per-phone send throttling, the error taxonomy, and the traits the infrastructure
//! layer implements (verification store, notification sender, code generator).
//!
//! The core holds no mutable in-process state. Every piece of shared state lives in
//! the injected [`VerificationStore`], so any number of replicas can serve requests.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
