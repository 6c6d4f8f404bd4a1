//! Verification code generation

use rand::{rngs::OsRng, Rng};

use crate::domain::entities::verification_code::{CODE_MAX, CODE_MIN};

use super::traits::CodeGenerator;

/// Uniform 4-digit codes from the operating system CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        OsRng.gen_range(CODE_MIN..=CODE_MAX).to_string()
    }
}
