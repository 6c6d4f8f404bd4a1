//! Domain entities representing core business objects.

pub mod verification_code;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use verification_code::{IssuedCode, CODE_MAX, CODE_MIN};
